use order_api::entities::ServiceCatalog;

use crate::entities::validation::FieldErrors;
use crate::entities::{FieldKey, OrderDraft, StepValidation};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AddressCheck {
    /// Moving between steps: the services step never blocks.
    Browse,
    /// Submitting: a location-requiring service needs a pickup address.
    Submit,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ServicesValidation {
    pub validation: StepValidation,
    pub show_address_field: bool,
}

pub fn requires_address(draft: &OrderDraft, catalog: &ServiceCatalog) -> bool {
    draft
        .additional_services
        .iter()
        .any(|service| catalog.requires_location(service))
}

pub fn validate(
    draft: &OrderDraft,
    catalog: &ServiceCatalog,
    address_check: AddressCheck,
) -> ServicesValidation {
    let show_address_field = requires_address(draft, catalog);
    let mut errors = FieldErrors::new();

    if address_check == AddressCheck::Submit
        && show_address_field
        && draft.pickup_address.trim().is_empty()
    {
        errors.insert(
            FieldKey::PickupAddress,
            String::from("Для услуг забора груза необходимо указать адрес"),
        );
    }

    ServicesValidation {
        validation: StepValidation::from_errors(errors),
        show_address_field,
    }
}
