use order_api::entities::CargoKind;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FieldKey {
    Marketplace,
    Warehouse,
    SelectedTypes,
    Quantity(CargoKind),
    BoxSize,
    CustomLength,
    CustomWidth,
    CustomHeight,
    PalletWeight,
    CustomPalletWeight,
    PickupAddress,
    ClientName,
    PhoneNumber,
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKey::Marketplace => write!(f, "marketplace"),
            FieldKey::Warehouse => write!(f, "warehouse"),
            FieldKey::SelectedTypes => write!(f, "selectedTypes"),
            FieldKey::Quantity(kind) => write!(f, "quantities.{}", kind),
            FieldKey::BoxSize => write!(f, "selectedBoxSizes"),
            FieldKey::CustomLength => write!(f, "customBoxSize.length"),
            FieldKey::CustomWidth => write!(f, "customBoxSize.width"),
            FieldKey::CustomHeight => write!(f, "customBoxSize.height"),
            FieldKey::PalletWeight => write!(f, "selectedPalletWeights"),
            FieldKey::CustomPalletWeight => write!(f, "customPalletWeight"),
            FieldKey::PickupAddress => write!(f, "pickupAddress"),
            FieldKey::ClientName => write!(f, "clientName"),
            FieldKey::PhoneNumber => write!(f, "phoneNumber"),
        }
    }
}

pub type ErrorMessage = String;
pub type FieldErrors = BTreeMap<FieldKey, ErrorMessage>;

/// Field errors of one step. Recomputed on demand, never stored.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StepValidation {
    pub errors: FieldErrors,
    pub is_valid: bool,
}

impl StepValidation {
    pub fn valid() -> Self {
        Self::from_errors(Default::default())
    }

    pub fn from_errors(errors: FieldErrors) -> Self {
        let is_valid = errors.is_empty();
        Self { errors, is_valid }
    }

    pub fn error(&self, field: FieldKey) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}
