use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::pricing::{ContainerCount, Dimension, Price};
use crate::entities::service_ref::ServiceRef;
use crate::entities::{CargoKind, CatalogId};

pub type OrderId = u64;

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct OrderDelivery {
    pub warehouse: CatalogId,
    pub marketplace: CatalogId,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CustomBoxSizeBody {
    pub length: Option<Dimension>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCargo {
    pub selected_types: Vec<CargoKind>,
    pub selected_box_sizes: Vec<String>,
    pub selected_pallet_weights: Vec<String>,
    pub quantities: BTreeMap<CargoKind, ContainerCount>,
    pub custom_box_size: Option<CustomBoxSizeBody>,
    pub custom_pallet_weight: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderClientData {
    pub client_name: String,
    pub phone: String,
    pub company_name: String,
    pub email: String,
    pub cargo_value: String,
    pub comments: String,
    #[serde(rename = "telegram_user_id")]
    pub telegram_user_id: i64,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub delivery: OrderDelivery,
    pub cargo_type: OrderCargo,
    pub client_data: OrderClientData,
    pub additional_services: Vec<ServiceRef>,
    pub pickup_address: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: OrderId,
    #[serde(rename = "deliveryDate", default)]
    pub delivery_date: Option<String>,
    #[serde(rename = "totalCost", alias = "cost", default)]
    pub total_cost: Option<Price>,
}
