use crate::entities::validation::FieldErrors;
use crate::entities::{FieldKey, OrderDraft, StepValidation};

pub fn validate(draft: &OrderDraft) -> StepValidation {
    let mut errors = FieldErrors::new();

    if draft.marketplace.trim().is_empty() {
        errors.insert(FieldKey::Marketplace, String::from("Выберите маркетплейс"));
    }

    if draft.warehouse.trim().is_empty() {
        errors.insert(FieldKey::Warehouse, String::from("Выберите склад"));
    }

    StepValidation::from_errors(errors)
}
