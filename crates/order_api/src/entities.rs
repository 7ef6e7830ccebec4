pub mod catalog;
pub mod order;
pub mod pricing;
pub mod service_ref;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use catalog::{CatalogOption, ContainerCatalog, ServiceCatalog, ServiceGroup, ServiceOffer, Warehouse};
pub use order::{CreateOrderRequest, CreatedOrder, OrderId};
pub use pricing::{PriceDetails, PriceQuote, PriceQuoteRequest};
pub use service_ref::{ServiceId, ServiceRef};

/// Backend identifiers arrive as numbers from the database but are
/// entered and shown as text.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogId {
    Number(u64),
    Text(String),
}

impl CatalogId {
    pub fn from_input(value: &str) -> Self {
        match value.trim().parse::<u64>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(value.trim().to_string()),
        }
    }
}

impl Default for CatalogId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogId::Number(number) => write!(f, "{}", number),
            CatalogId::Text(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum CargoKind {
    #[serde(rename = "Коробка")]
    Box,
    #[serde(rename = "Паллета")]
    Pallet,
}

pub const BOX_LABEL: &str = "Коробка";
pub const PALLET_LABEL: &str = "Паллета";

impl CargoKind {
    pub const ALL: [CargoKind; 2] = [CargoKind::Box, CargoKind::Pallet];

    pub fn label(&self) -> &'static str {
        match self {
            CargoKind::Box => BOX_LABEL,
            CargoKind::Pallet => PALLET_LABEL,
        }
    }

    /// The value of `cargo.cargo_type` in a price request.
    pub fn code(&self) -> &'static str {
        match self {
            CargoKind::Box => "box",
            CargoKind::Pallet => "pallet",
        }
    }
}

impl Display for CargoKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CargoKind {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            BOX_LABEL | "box" => Ok(Self::Box),
            PALLET_LABEL | "pallet" => Ok(Self::Pallet),
            _ => anyhow::bail!("Invalid cargo type: {}", input),
        }
    }
}
