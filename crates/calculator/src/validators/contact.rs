use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::validation::FieldErrors;
use crate::entities::{FieldKey, OrderDraft, StepValidation};

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,15}$").expect("invalid phone regex pattern"));

/// Whitespace is not counted towards the length, so that
/// `+7 (999) 123-45-67` passes along with `+79991234567`.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_PATTERN.is_match(&compact)
}

pub fn validate(draft: &OrderDraft) -> StepValidation {
    let mut errors = FieldErrors::new();

    if draft.client_name.trim().is_empty() {
        errors.insert(
            FieldKey::ClientName,
            String::from("Укажите имя контактного лица"),
        );
    }

    if draft.phone_number.trim().is_empty() {
        errors.insert(FieldKey::PhoneNumber, String::from("Укажите номер телефона"));
    } else if !is_valid_phone(&draft.phone_number) {
        errors.insert(
            FieldKey::PhoneNumber,
            String::from("Неверный формат номера телефона"),
        );
    }

    StepValidation::from_errors(errors)
}
