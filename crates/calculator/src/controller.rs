use base::settings::TelegramUserId;
use order_api::entities::{
    CatalogId, ContainerCatalog, CreatedOrder, ServiceCatalog, ServiceRef, Warehouse,
};
use order_api::errors::error_message;
use order_api::fallback_services::{builtin_service_name, fallback_service_catalog};
use order_api::OrderApi;

use crate::entities::{DraftUpdate, OrderDraft, StatusMessage, Step, StepValidation};
use crate::pricing::{PricingSync, QuoteApplied, QuoteRequest, QuoteResponse};
use crate::summary::OrderSummary;
use crate::validators::{self, cargo, services, AddressCheck};

mod submission;

pub use submission::{build_order_request, SubmitOutcome};

pub const FILL_REQUIRED_FIELDS: &str = "Пожалуйста, заполните все обязательные поля";
pub const LOAD_FAILED: &str = "Не удалось загрузить данные. Пожалуйста, попробуйте позже.";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CalculatorState {
    /// Reference data is being loaded; no step is shown yet.
    Loading,
    LoadFailed(String),
    Ready,
    /// An order creation request is outstanding.
    Submitting,
    Success(CreatedOrder),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MarketplaceOption {
    pub id: CatalogId,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub warehouses: Vec<Warehouse>,
    pub containers: ContainerCatalog,
    pub services: ServiceCatalog,
    /// The service catalog is the built-in copy, the backend one failed to load.
    pub services_from_fallback: bool,
}

impl ReferenceData {
    pub fn warehouse(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses
            .iter()
            .find(|warehouse| warehouse.id.to_string() == id.trim())
    }

    pub fn marketplace_name(&self, id: &str) -> Option<&str> {
        self.warehouses
            .iter()
            .find(|warehouse| warehouse.marketplace.to_string() == id.trim())
            .map(|warehouse| warehouse.marketplace_name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn service_name(&self, service: &ServiceRef) -> String {
        self.services
            .find(service)
            .map(|offer| offer.name.clone())
            .or_else(|| builtin_service_name(service).map(str::to_string))
            .unwrap_or_else(|| service.to_string())
    }
}

/// The order form: owns the draft, the current step and the pricing state.
/// User operations never fail; problems become a status message.
pub struct Calculator {
    state: CalculatorState,
    step: Step,
    draft: OrderDraft,
    show_errors: bool,
    status: Option<StatusMessage>,
    reference: ReferenceData,
    pricing: PricingSync,
    telegram_user_id: TelegramUserId,
}

impl Calculator {
    pub fn new(telegram_user_id: TelegramUserId) -> Self {
        Self {
            state: CalculatorState::Loading,
            step: Step::Delivery,
            draft: OrderDraft::new(telegram_user_id),
            show_errors: false,
            status: None,
            reference: Default::default(),
            pricing: PricingSync::new(),
            telegram_user_id,
        }
    }

    /// Warehouses and the container catalog are required; the service
    /// catalog falls back to the built-in one.
    pub fn load_reference_data(&mut self, api: &impl OrderApi) {
        if self.state != CalculatorState::Loading {
            log::debug!("reference data is already loaded");
            return;
        }

        let required = api
            .get_warehouses()
            .and_then(|warehouses| Ok((warehouses, api.get_container_catalog()?)));

        let (warehouses, containers) = match required {
            Ok(loaded) => loaded,
            Err(err) => {
                log::error!("failed to load reference data: {:?}", err);
                self.state = CalculatorState::LoadFailed(LOAD_FAILED.to_string());
                return;
            }
        };

        let (services, services_from_fallback) = match api.get_service_catalog() {
            Ok(services) => (services, false),
            Err(err) => {
                log::warn!(
                    "failed to load the service catalog, the built-in one is used: {}",
                    error_message(&err)
                );
                (fallback_service_catalog(), true)
            }
        };

        log::debug!(
            "reference data loaded: {} warehouses, {} services",
            warehouses.len(),
            services.offers().count()
        );

        self.reference = ReferenceData {
            warehouses,
            containers,
            services,
            services_from_fallback,
        };
        self.state = CalculatorState::Ready;
        self.step = Step::Delivery;
    }

    fn accepts_edits(&self) -> bool {
        matches!(
            self.state,
            CalculatorState::Ready | CalculatorState::Submitting
        )
    }

    /// Merges `update` into the draft and returns the quote to request, if
    /// the pricing fields changed.
    pub fn merge_field(&mut self, update: DraftUpdate) -> Option<QuoteRequest> {
        if !self.accepts_edits() {
            log::debug!("edit ignored in state {:?}", self.state);
            return None;
        }

        self.draft.merge(update);
        self.refresh_derived();
        self.pricing.on_draft_changed(&mut self.draft)
    }

    /// Writes the derived cargo fields only when they differ, so that an
    /// unchanged selection leaves the draft untouched.
    fn refresh_derived(&mut self) {
        let derived = cargo::validate(&self.draft).derived.unwrap_or_default();

        if self.draft.derived != derived {
            log::debug!("derived cargo fields: {:?}", derived);
            self.draft.derived = derived;
        }
    }

    pub fn select_marketplace(&mut self, marketplace: &str) -> Option<QuoteRequest> {
        self.merge_field(DraftUpdate {
            marketplace: Some(marketplace.trim().to_string()),
            warehouse: Some(String::new()),
            ..Default::default()
        })
    }

    /// Checking stores the canonical form once; unchecking removes every
    /// representation of the service. The pickup address is left as is.
    pub fn toggle_service(&mut self, service: &ServiceRef, checked: bool) -> Option<QuoteRequest> {
        let mut selected = self.draft.additional_services.clone();

        if checked {
            if !self.draft.has_service(service) {
                selected.push(service.canonical());
            }
        } else {
            selected.retain(|selected| !selected.same_service(service));
        }

        self.merge_field(DraftUpdate::additional_services(selected))
    }

    pub fn current_step_validation(&self) -> StepValidation {
        validators::validate_step(
            self.step,
            &self.draft,
            &self.reference.services,
            AddressCheck::Browse,
        )
    }

    /// Advances when the current step is valid. The last step does not advance.
    pub fn go_next(&mut self) -> StepValidation {
        let validation = self.current_step_validation();

        if self.state != CalculatorState::Ready {
            log::debug!("step change ignored in state {:?}", self.state);
            return validation;
        }

        if !validation.is_valid {
            self.show_errors = true;
            self.status = Some(StatusMessage::error(FILL_REQUIRED_FIELDS));
            return validation;
        }

        if let Some(next) = self.step.next() {
            log::debug!("step {} -> {}", self.step, next);
            self.step = next;
            self.show_errors = false;
        }

        validation
    }

    /// Steps back without validation, stopping at the first step.
    pub fn go_back(&mut self) {
        if !self.accepts_edits() {
            return;
        }

        self.step = self.step.previous().unwrap_or(Step::Delivery);
        self.show_errors = false;
    }

    pub fn apply_quote(&mut self, response: QuoteResponse) -> QuoteApplied {
        self.pricing.apply(&mut self.draft, response)
    }

    /// Leaves the success screen for an empty form. Also resets a `Ready` form.
    pub fn new_order(&mut self) {
        if !matches!(
            self.state,
            CalculatorState::Ready | CalculatorState::Success(_)
        ) {
            log::debug!("new order ignored in state {:?}", self.state);
            return;
        }

        self.draft = OrderDraft::new(self.telegram_user_id);
        self.step = Step::Delivery;
        self.show_errors = false;
        self.status = None;
        self.pricing.reset();
        self.state = CalculatorState::Ready;
    }

    pub fn dismiss_status(&mut self) {
        self.status = None;
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn show_errors(&self) -> bool {
        self.show_errors
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn is_price_loading(&self) -> bool {
        self.pricing.is_loading()
    }

    pub fn show_address_field(&self) -> bool {
        services::requires_address(&self.draft, &self.reference.services)
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.reference
    }

    /// Unique marketplaces in catalog order.
    pub fn marketplaces(&self) -> Vec<MarketplaceOption> {
        let mut marketplaces: Vec<MarketplaceOption> = Vec::new();

        for warehouse in self.reference.warehouses.iter() {
            if marketplaces
                .iter()
                .all(|known| known.id != warehouse.marketplace)
            {
                marketplaces.push(MarketplaceOption {
                    id: warehouse.marketplace.clone(),
                    name: warehouse.marketplace_name.clone(),
                });
            }
        }

        marketplaces
    }

    pub fn warehouses_for(&self, marketplace: &str) -> Vec<&Warehouse> {
        self.reference
            .warehouses
            .iter()
            .filter(|warehouse| warehouse.marketplace.to_string() == marketplace.trim())
            .collect()
    }

    pub fn service_name(&self, service: &ServiceRef) -> String {
        self.reference.service_name(service)
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::new(&self.draft, &self.reference)
    }
}
