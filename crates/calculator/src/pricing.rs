use anyhow::Result;
use order_api::entities::pricing::{QuoteCargo, QuoteDelivery, QuoteDimensions};
use order_api::entities::{CargoKind, CatalogId, PriceQuote, PriceQuoteRequest, ServiceRef};
use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{OrderDraft, Quantity};
use crate::validators::cargo::derive_cargo;

pub type QuoteGeneration = u64;

/// The fields a quote depends on. A quote is requested only when this
/// changes between two observations of the draft.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PricingKey {
    marketplace: String,
    warehouse: String,
    cargo_type: Option<CargoKind>,
    selected_types: BTreeSet<CargoKind>,
    quantities: BTreeMap<CargoKind, Quantity>,
    box_count: Option<Quantity>,
    pallet_count: Option<Quantity>,
    additional_services: Vec<ServiceRef>,
    container_type: Option<String>,
    pickup_address: String,
}

impl PricingKey {
    pub fn of(draft: &OrderDraft) -> Self {
        let derived = derive_cargo(draft);

        Self {
            marketplace: draft.marketplace.clone(),
            warehouse: draft.warehouse.clone(),
            cargo_type: derived.cargo_type,
            selected_types: draft.selected_types.clone(),
            quantities: draft.quantities.clone(),
            box_count: derived.box_count,
            pallet_count: derived.pallet_count,
            additional_services: draft.additional_services.clone(),
            container_type: derived.container_type,
            pickup_address: draft.pickup_address.clone(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct QuoteRequest {
    pub generation: QuoteGeneration,
    pub body: PriceQuoteRequest,
}

#[derive(Debug)]
pub struct QuoteResponse {
    pub generation: QuoteGeneration,
    pub result: Result<PriceQuote>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum QuoteApplied {
    Applied,
    Failed,
    /// A newer request was issued after this one; the response is dropped.
    Stale,
}

/// Marketplace and warehouse chosen, and at least one selected cargo type
/// with a positive quantity.
pub fn quote_preconditions_met(draft: &OrderDraft) -> bool {
    !draft.marketplace.trim().is_empty()
        && !draft.warehouse.trim().is_empty()
        && draft
            .selected_types
            .iter()
            .any(|kind| matches!(draft.quantity_of(*kind), Some(quantity) if quantity >= 1))
}

pub fn build_quote_request(draft: &OrderDraft) -> PriceQuoteRequest {
    let derived = derive_cargo(draft);

    PriceQuoteRequest {
        delivery: QuoteDelivery {
            warehouse_id: CatalogId::from_input(&draft.warehouse),
            marketplace: CatalogId::from_input(&draft.marketplace),
        },
        cargo: QuoteCargo {
            cargo_type: derived
                .cargo_type
                .map(|kind| kind.code().to_string())
                .unwrap_or_default(),
            container_type: derived.container_type.unwrap_or_default(),
            box_count: derived.box_count.unwrap_or_default(),
            pallet_count: derived.pallet_count.unwrap_or_default(),
            dimensions: QuoteDimensions {
                length: derived.length,
                width: derived.width,
                height: derived.height,
                weight: derived.weight,
            },
        },
        additional_services: draft.additional_services.clone(),
        pickup_address: draft.pickup_address.trim().to_string(),
    }
}

/// Tracks which quote the draft is waiting for. Only the most recently
/// issued generation may write the price.
#[derive(Debug, Default)]
pub struct PricingSync {
    last_key: Option<PricingKey>,
    latest_generation: QuoteGeneration,
    in_flight: Option<QuoteGeneration>,
}

impl PricingSync {
    pub fn new() -> Self {
        Default::default()
    }

    /// Compares the pricing fields with the previous observation. Returns a
    /// request to send when they changed and a quote can be computed; the
    /// current price stays in place until the response arrives.
    pub fn on_draft_changed(&mut self, draft: &mut OrderDraft) -> Option<QuoteRequest> {
        let key = PricingKey::of(draft);
        if self.last_key.as_ref() == Some(&key) {
            return None;
        }
        self.last_key = Some(key);

        self.latest_generation += 1;

        if !quote_preconditions_met(draft) {
            log::debug!(
                "quote preconditions are not met, price is cleared (generation {})",
                self.latest_generation
            );
            self.in_flight = None;
            draft.order_price = None;
            draft.price_details = None;
            return None;
        }

        log::debug!("requesting quote generation {}", self.latest_generation);
        self.in_flight = Some(self.latest_generation);

        Some(QuoteRequest {
            generation: self.latest_generation,
            body: build_quote_request(draft),
        })
    }

    pub fn apply(&mut self, draft: &mut OrderDraft, response: QuoteResponse) -> QuoteApplied {
        if self.in_flight != Some(response.generation) {
            log::debug!(
                "dropping stale quote generation {} (latest is {})",
                response.generation,
                self.latest_generation
            );
            return QuoteApplied::Stale;
        }
        self.in_flight = None;

        match response.result {
            Ok(quote) => {
                log::debug!(
                    "quote generation {}: {} {}",
                    response.generation,
                    quote.total_price,
                    quote.currency
                );
                draft.order_price = Some(quote.total_price);
                draft.price_details = Some(quote.details);
                QuoteApplied::Applied
            }
            Err(err) => {
                log::warn!(
                    "quote generation {} failed, price is unavailable: {:?}",
                    response.generation,
                    err
                );
                draft.order_price = None;
                draft.price_details = None;
                QuoteApplied::Failed
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn latest_generation(&self) -> QuoteGeneration {
        self.latest_generation
    }

    /// Forgets the observed draft and invalidates every request in flight.
    pub fn reset(&mut self) {
        self.last_key = None;
        self.in_flight = None;
        self.latest_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use order_api::entities::PriceDetails;
    use rust_decimal_macros::dec;

    fn priced_draft() -> OrderDraft {
        OrderDraft {
            marketplace: String::from("wildberries"),
            warehouse: String::from("W1"),
            selected_types: BTreeSet::from([CargoKind::Box]),
            quantities: BTreeMap::from([(CargoKind::Box, 3)]),
            selected_box_sizes: vec![String::from("60x40x40 см")],
            ..Default::default()
        }
    }

    fn quote(total: rust_decimal::Decimal) -> Result<PriceQuote> {
        Ok(PriceQuote {
            total_price: total,
            currency: String::from("RUB"),
            details: PriceDetails {
                delivery: Some(total),
                cargo: None,
                additional_services: None,
            },
        })
    }

    #[test]
    #[allow(non_snake_case)]
    fn on_draft_changed__marketplace_without_warehouse__should_not_request_quote() {
        let mut sync = PricingSync::new();
        let mut draft = OrderDraft {
            marketplace: String::from("wildberries"),
            order_price: Some(dec!(900)),
            ..Default::default()
        };

        let request = sync.on_draft_changed(&mut draft);

        assert!(request.is_none());
        assert_eq!(draft.order_price, None);
        assert!(!sync.is_loading());
    }

    #[test]
    #[allow(non_snake_case)]
    fn on_draft_changed__zero_quantity__should_not_request_quote() {
        let mut sync = PricingSync::new();
        let mut draft = priced_draft();
        draft.quantities.insert(CargoKind::Box, 0);

        assert!(sync.on_draft_changed(&mut draft).is_none());
    }

    #[test]
    #[allow(non_snake_case)]
    fn on_draft_changed__complete_draft__should_build_quote_body() {
        let mut sync = PricingSync::new();
        let mut draft = priced_draft();

        let request = sync.on_draft_changed(&mut draft).unwrap();

        assert_eq!(request.generation, 1);
        assert_eq!(
            request.body.delivery.warehouse_id,
            CatalogId::Text(String::from("W1"))
        );
        assert_eq!(request.body.cargo.cargo_type, "box");
        assert_eq!(request.body.cargo.box_count, 3);
        assert_eq!(request.body.cargo.pallet_count, 0);
        assert_eq!(request.body.cargo.container_type, "60x40x40 см");
        assert_eq!(request.body.cargo.dimensions.length, Some(dec!(60)));
        assert!(sync.is_loading());
    }

    #[test]
    #[allow(non_snake_case)]
    fn on_draft_changed__unrelated_field__should_not_request_again() {
        let mut sync = PricingSync::new();
        let mut draft = priced_draft();
        sync.on_draft_changed(&mut draft).unwrap();

        draft.client_name = String::from("Ivan");
        draft.comments = String::from("fragile");

        assert!(sync.on_draft_changed(&mut draft).is_none());
    }

    #[test]
    #[allow(non_snake_case)]
    fn on_draft_changed__new_request__should_keep_previous_price_while_loading() {
        let mut sync = PricingSync::new();
        let mut draft = priced_draft();
        let first = sync.on_draft_changed(&mut draft).unwrap();
        sync.apply(
            &mut draft,
            QuoteResponse {
                generation: first.generation,
                result: quote(dec!(1500)),
            },
        );

        draft.quantities.insert(CargoKind::Box, 5);
        let second = sync.on_draft_changed(&mut draft).unwrap();

        assert_eq!(second.generation, 2);
        assert_eq!(draft.order_price, Some(dec!(1500)));
        assert!(sync.is_loading());
    }

    #[test]
    #[allow(non_snake_case)]
    fn apply__older_response_after_newer_request__should_be_ignored() {
        let mut sync = PricingSync::new();
        let mut draft = priced_draft();
        let first = sync.on_draft_changed(&mut draft).unwrap();
        draft.quantities.insert(CargoKind::Box, 5);
        let second = sync.on_draft_changed(&mut draft).unwrap();

        let newer = sync.apply(
            &mut draft,
            QuoteResponse {
                generation: second.generation,
                result: quote(dec!(2500)),
            },
        );
        let older = sync.apply(
            &mut draft,
            QuoteResponse {
                generation: first.generation,
                result: quote(dec!(1500)),
            },
        );

        assert_eq!(newer, QuoteApplied::Applied);
        assert_eq!(older, QuoteApplied::Stale);
        assert_eq!(draft.order_price, Some(dec!(2500)));
    }

    #[test]
    #[allow(non_snake_case)]
    fn apply__failed_quote__should_clear_price_and_log_warning() {
        testing_logger::setup();

        let mut sync = PricingSync::new();
        let mut draft = priced_draft();
        draft.order_price = Some(dec!(1000));
        let request = sync.on_draft_changed(&mut draft).unwrap();

        let applied = sync.apply(
            &mut draft,
            QuoteResponse {
                generation: request.generation,
                result: Err(anyhow!("timed out")),
            },
        );

        assert_eq!(applied, QuoteApplied::Failed);
        assert_eq!(draft.order_price, None);
        assert_eq!(draft.price_details, None);
        assert!(!sync.is_loading());

        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|log| log.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("timed out"));
        });
    }

    #[test]
    #[allow(non_snake_case)]
    fn reset__in_flight_request__should_make_its_response_stale() {
        let mut sync = PricingSync::new();
        let mut draft = priced_draft();
        let request = sync.on_draft_changed(&mut draft).unwrap();

        sync.reset();
        let applied = sync.apply(
            &mut draft,
            QuoteResponse {
                generation: request.generation,
                result: quote(dec!(1500)),
            },
        );

        assert_eq!(applied, QuoteApplied::Stale);
        assert_eq!(draft.order_price, None);
    }
}
