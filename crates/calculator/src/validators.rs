use order_api::entities::ServiceCatalog;

use crate::entities::{OrderDraft, Step, StepValidation};

pub mod cargo;
pub mod contact;
pub mod delivery;
pub mod services;

pub use services::AddressCheck;

/// Runs the validator of `step`. Validators never fail: missing data is a field error.
pub fn validate_step(
    step: Step,
    draft: &OrderDraft,
    services: &ServiceCatalog,
    address_check: AddressCheck,
) -> StepValidation {
    match step {
        Step::Delivery => delivery::validate(draft),
        Step::Cargo => cargo::validate(draft).validation,
        Step::Services => services::validate(draft, services, address_check).validation,
        Step::Contact => contact::validate(draft),
    }
}
