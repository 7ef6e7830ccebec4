use anyhow::Result;
use order_api::entities::order::{
    CustomBoxSizeBody, OrderCargo, OrderClientData, OrderDelivery,
};
use order_api::entities::{CatalogId, CreateOrderRequest, CreatedOrder, ServiceRef};
use order_api::errors::error_message;
use order_api::OrderApi;

use crate::controller::{Calculator, CalculatorState, FILL_REQUIRED_FIELDS};
use crate::entities::draft::{CUSTOM_BOX_SIZE, CUSTOM_PALLET_WEIGHT};
use crate::entities::{OrderDraft, StatusMessage, Step};
use crate::validators::cargo::derive_cargo;
use crate::validators::{self, services, AddressCheck};

pub const ORDER_FAILED: &str =
    "Произошла ошибка при создании заказа. Пожалуйста, попробуйте еще раз.";
pub const ADDRESS_REQUIRED: &str = "Для услуг забора груза необходимо указать адрес";
pub const ADDRESS_REJECTED: &str =
    "Сервер не принял заказ: укажите адрес забора груза для выбранных услуг";

const ADDRESS_MARKERS: [&str; 2] = ["адрес", "address"];

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// A submission is already outstanding or the form is not ready.
    Ignored,
    /// Rejected before any request was made.
    Rejected(StatusMessage),
    /// The request to send; its result goes to `finish_submit`.
    Dispatched(CreateOrderRequest),
}

fn canonical_services(services: &[ServiceRef]) -> Vec<ServiceRef> {
    let mut unique: Vec<ServiceRef> = Vec::with_capacity(services.len());

    for service in services.iter().map(ServiceRef::canonical) {
        if !unique.contains(&service) {
            unique.push(service);
        }
    }

    unique
}

/// Reshapes the draft into the create-order body.
pub fn build_order_request(draft: &OrderDraft) -> CreateOrderRequest {
    let custom_box_size = (draft.box_size() == Some(CUSTOM_BOX_SIZE)).then(|| CustomBoxSizeBody {
        length: draft.custom_box_size.length,
        width: draft.custom_box_size.width,
        height: draft.custom_box_size.height,
    });

    let custom_pallet_weight = if draft.pallet_weight() == Some(CUSTOM_PALLET_WEIGHT) {
        draft.custom_pallet_weight
    } else {
        None
    };

    CreateOrderRequest {
        delivery: OrderDelivery {
            warehouse: CatalogId::from_input(&draft.warehouse),
            marketplace: CatalogId::from_input(&draft.marketplace),
        },
        cargo_type: OrderCargo {
            selected_types: draft.selected_types.iter().copied().collect(),
            selected_box_sizes: draft.selected_box_sizes.clone(),
            selected_pallet_weights: draft.selected_pallet_weights.clone(),
            quantities: draft
                .selected_types
                .iter()
                .filter_map(|kind| draft.quantity_of(*kind).map(|quantity| (*kind, quantity)))
                .collect(),
            custom_box_size,
            custom_pallet_weight,
        },
        client_data: OrderClientData {
            client_name: draft.client_name.trim().to_string(),
            phone: draft.phone_number.trim().to_string(),
            company_name: draft.company.trim().to_string(),
            email: draft.email.trim().to_string(),
            cargo_value: draft.cargo_value.trim().to_string(),
            comments: draft.comments.clone(),
            telegram_user_id: draft.telegram_user_id,
        },
        additional_services: canonical_services(&draft.additional_services),
        pickup_address: draft.pickup_address.trim().to_string(),
    }
}

fn required_fields_present(draft: &OrderDraft) -> bool {
    derive_cargo(draft).cargo_type.is_some()
        && !draft.phone_number.trim().is_empty()
        && !draft.client_name.trim().is_empty()
}

fn mentions_address(message: &str) -> bool {
    let message = message.to_lowercase();
    ADDRESS_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

impl Calculator {
    fn reject(&mut self, step: Option<Step>, text: &str) -> SubmitOutcome {
        if let Some(step) = step {
            self.step = step;
        }
        self.show_errors = true;

        let status = StatusMessage::error(text);
        self.status = Some(status.clone());
        SubmitOutcome::Rejected(status)
    }

    /// Runs the submit-time checks over every step and, when they pass on the
    /// last step, enters `Submitting` and hands out the request to send.
    pub fn begin_submit(&mut self) -> SubmitOutcome {
        match self.state {
            CalculatorState::Ready => {}
            CalculatorState::Submitting => {
                log::debug!("submit ignored, an order is already being created");
                return SubmitOutcome::Ignored;
            }
            _ => {
                log::debug!("submit ignored in state {:?}", self.state);
                return SubmitOutcome::Ignored;
            }
        }

        let address = services::validate(&self.draft, &self.reference.services, AddressCheck::Submit);
        if !address.validation.is_valid {
            log::debug!("submit rejected: pickup address is missing");
            return self.reject(Some(Step::Services), ADDRESS_REQUIRED);
        }

        if !required_fields_present(&self.draft) {
            log::debug!("submit rejected: required fields are missing");
            return self.reject(None, FILL_REQUIRED_FIELDS);
        }

        let invalid_step = Step::ALL.iter().copied().find(|&step| {
            !validators::validate_step(
                step,
                &self.draft,
                &self.reference.services,
                AddressCheck::Submit,
            )
            .is_valid
        });
        if let Some(step) = invalid_step {
            log::debug!("submit rejected: step {} is invalid", step);
            return self.reject(Some(step), FILL_REQUIRED_FIELDS);
        }

        if !self.step.is_last() {
            log::debug!("submit ignored on step {}", self.step);
            return SubmitOutcome::Ignored;
        }

        self.state = CalculatorState::Submitting;
        self.status = None;

        SubmitOutcome::Dispatched(build_order_request(&self.draft))
    }

    pub fn finish_submit(&mut self, result: Result<CreatedOrder>) {
        if self.state != CalculatorState::Submitting {
            log::debug!("order result ignored in state {:?}", self.state);
            return;
        }

        match result {
            Ok(order) => {
                log::info!("order {} is created", order.id);
                self.status = Some(StatusMessage::success(format!(
                    "Заказ №{} успешно создан!",
                    order.id
                )));
                self.show_errors = false;
                self.state = CalculatorState::Success(order);
            }
            Err(err) => {
                log::error!("failed to create an order: {:?}", err);
                self.state = CalculatorState::Ready;

                if mentions_address(&error_message(&err)) {
                    self.reject(Some(Step::Services), ADDRESS_REJECTED);
                } else {
                    self.status = Some(StatusMessage::error(ORDER_FAILED));
                }
            }
        }
    }

    /// Synchronous submit: checks, sends at most one request and applies its result.
    pub fn submit(&mut self, api: &impl OrderApi) -> SubmitOutcome {
        let outcome = self.begin_submit();

        if let SubmitOutcome::Dispatched(request) = &outcome {
            let result = api.create_order(request);
            self.finish_submit(result);
        }

        outcome
    }
}
