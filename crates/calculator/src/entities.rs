pub mod draft;
pub mod step;
pub mod validation;

pub use draft::{CustomBoxSize, DerivedCargo, DraftUpdate, OrderDraft, Quantity};
pub use step::Step;
pub use validation::{FieldKey, StepValidation};

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// The toast shown to the user until dismissed or replaced.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn error(text: &str) -> Self {
        Self {
            severity: Severity::Error,
            text: text.to_string(),
        }
    }

    pub fn success(text: String) -> Self {
        Self {
            severity: Severity::Success,
            text,
        }
    }
}

impl Display for StatusMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let marker = match self.severity {
            Severity::Success => "✔",
            Severity::Info => "ℹ",
            Severity::Error => "✖",
        };

        write!(f, "{} {}", marker, self.text)
    }
}
