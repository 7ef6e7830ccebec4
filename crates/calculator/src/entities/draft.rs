use base::settings::TelegramUserId;
use order_api::entities::pricing::{Dimension, Price};
use order_api::entities::{CargoKind, PriceDetails, ServiceRef};
use std::collections::{BTreeMap, BTreeSet};

pub type Quantity = u32;

/// Box size option that asks for custom dimensions.
pub const CUSTOM_BOX_SIZE: &str = "Другой размер";
/// Pallet weight option that asks for a custom weight.
pub const CUSTOM_PALLET_WEIGHT: &str = "Другой вес";

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CustomBoxSize {
    pub length: Option<Dimension>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

/// Convenience fields computed from the structured cargo selections.
/// Written from the output of the cargo validator.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DerivedCargo {
    pub cargo_type: Option<CargoKind>,
    pub box_count: Option<Quantity>,
    pub pallet_count: Option<Quantity>,
    pub length: Option<Dimension>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub weight: Option<Dimension>,
    pub container_type: Option<String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OrderDraft {
    pub marketplace: String,
    pub warehouse: String,

    pub selected_types: BTreeSet<CargoKind>,
    pub quantities: BTreeMap<CargoKind, Quantity>,
    pub selected_box_sizes: Vec<String>,
    pub custom_box_size: CustomBoxSize,
    pub selected_pallet_weights: Vec<String>,
    pub custom_pallet_weight: Option<Dimension>,
    pub derived: DerivedCargo,

    pub additional_services: Vec<ServiceRef>,
    pub pickup_address: String,

    pub client_name: String,
    pub phone_number: String,
    pub company: String,
    pub email: String,
    pub cargo_value: String,
    pub comments: String,
    pub telegram_user_id: TelegramUserId,

    pub order_price: Option<Price>,
    pub price_details: Option<PriceDetails>,
}

/// A partial draft: every `Some` field overwrites, every `None` field is left alone.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DraftUpdate {
    pub marketplace: Option<String>,
    pub warehouse: Option<String>,
    pub selected_types: Option<BTreeSet<CargoKind>>,
    pub quantities: Option<BTreeMap<CargoKind, Quantity>>,
    pub selected_box_sizes: Option<Vec<String>>,
    pub custom_box_size: Option<CustomBoxSize>,
    pub selected_pallet_weights: Option<Vec<String>>,
    pub custom_pallet_weight: Option<Option<Dimension>>,
    pub additional_services: Option<Vec<ServiceRef>>,
    pub pickup_address: Option<String>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub cargo_value: Option<String>,
    pub comments: Option<String>,
}

impl DraftUpdate {
    pub fn marketplace(marketplace: &str) -> Self {
        Self {
            marketplace: Some(marketplace.to_string()),
            ..Default::default()
        }
    }

    pub fn warehouse(warehouse: &str) -> Self {
        Self {
            warehouse: Some(warehouse.to_string()),
            ..Default::default()
        }
    }

    pub fn additional_services(services: Vec<ServiceRef>) -> Self {
        Self {
            additional_services: Some(services),
            ..Default::default()
        }
    }

    pub fn pickup_address(address: &str) -> Self {
        Self {
            pickup_address: Some(address.to_string()),
            ..Default::default()
        }
    }
}

fn merge_value<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl OrderDraft {
    pub fn new(telegram_user_id: TelegramUserId) -> Self {
        Self {
            telegram_user_id,
            ..Default::default()
        }
    }

    /// Shallow merge. A new marketplace without an explicit warehouse
    /// drops the warehouse, which belonged to the old marketplace.
    pub fn merge(&mut self, update: DraftUpdate) {
        if let Some(marketplace) = &update.marketplace {
            if *marketplace != self.marketplace && update.warehouse.is_none() {
                self.warehouse.clear();
            }
        }

        merge_value(&mut self.marketplace, update.marketplace);
        merge_value(&mut self.warehouse, update.warehouse);
        merge_value(&mut self.selected_types, update.selected_types);
        merge_value(&mut self.quantities, update.quantities);
        merge_value(&mut self.selected_box_sizes, update.selected_box_sizes);
        merge_value(&mut self.custom_box_size, update.custom_box_size);
        merge_value(
            &mut self.selected_pallet_weights,
            update.selected_pallet_weights,
        );
        merge_value(&mut self.custom_pallet_weight, update.custom_pallet_weight);

        // merged one by one so that an update of either keeps the other
        merge_value(&mut self.additional_services, update.additional_services);
        merge_value(&mut self.pickup_address, update.pickup_address);

        merge_value(&mut self.client_name, update.client_name);
        merge_value(&mut self.phone_number, update.phone_number);
        merge_value(&mut self.company, update.company);
        merge_value(&mut self.email, update.email);
        merge_value(&mut self.cargo_value, update.cargo_value);
        merge_value(&mut self.comments, update.comments);
    }

    pub fn box_size(&self) -> Option<&str> {
        self.selected_box_sizes
            .first()
            .map(String::as_str)
            .filter(|size| !size.trim().is_empty())
    }

    pub fn pallet_weight(&self) -> Option<&str> {
        self.selected_pallet_weights
            .first()
            .map(String::as_str)
            .filter(|weight| !weight.trim().is_empty())
    }

    /// Quantity of a selected type; unselected types count as absent.
    pub fn quantity_of(&self, kind: CargoKind) -> Option<Quantity> {
        if !self.selected_types.contains(&kind) {
            return None;
        }

        self.quantities.get(&kind).copied()
    }

    pub fn has_service(&self, service: &ServiceRef) -> bool {
        self.additional_services
            .iter()
            .any(|selected| selected.same_service(service))
    }
}
