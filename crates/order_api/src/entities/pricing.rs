use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::service_ref::ServiceRef;
use crate::entities::CatalogId;

pub type Price = Decimal;
pub type ContainerCount = u32;
pub type Dimension = Decimal;

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct QuoteDelivery {
    pub warehouse_id: CatalogId,
    pub marketplace: CatalogId,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct QuoteDimensions {
    pub length: Option<Dimension>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub weight: Option<Dimension>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct QuoteCargo {
    pub cargo_type: String,
    pub container_type: String,
    pub box_count: ContainerCount,
    pub pallet_count: ContainerCount,
    pub dimensions: QuoteDimensions,
}

/// Body of `POST /orders/calculate-price/`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PriceQuoteRequest {
    pub delivery: QuoteDelivery,
    pub cargo: QuoteCargo,
    pub additional_services: Vec<ServiceRef>,
    pub pickup_address: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PriceDetails {
    #[serde(default)]
    pub delivery: Option<Price>,
    #[serde(default)]
    pub cargo: Option<Price>,
    #[serde(default)]
    pub additional_services: Option<Price>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub total_price: Price,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub details: PriceDetails,
}
