use serde::{Deserialize, Serialize};

use crate::entities::service_ref::ServiceRef;
use crate::entities::CatalogId;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: CatalogId,
    pub name: String,
    pub marketplace: CatalogId,
    #[serde(default)]
    pub marketplace_name: String,
    #[serde(default)]
    pub city: CatalogId,
    #[serde(default)]
    pub city_name: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContainerCatalog {
    #[serde(default)]
    pub container_types: Vec<CatalogOption>,
    #[serde(default)]
    pub box_sizes: Vec<CatalogOption>,
    #[serde(default)]
    pub pallet_weights: Vec<CatalogOption>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffer {
    pub id: ServiceRef,
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub requires_location: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub title: String,
    pub services: Vec<ServiceOffer>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceCatalog {
    #[serde(rename = "serviceGroups", default)]
    pub service_groups: Vec<ServiceGroup>,
}

impl ServiceCatalog {
    pub fn offers(&self) -> impl Iterator<Item = &ServiceOffer> {
        self.service_groups
            .iter()
            .flat_map(|group| group.services.iter())
    }

    pub fn find(&self, service: &ServiceRef) -> Option<&ServiceOffer> {
        self.offers().find(|offer| offer.id.same_service(service))
    }

    /// The catalog flag, falling back to the slug/id heuristic for
    /// services the catalog does not flag.
    pub fn requires_location(&self, service: &ServiceRef) -> bool {
        self.offers()
            .any(|offer| offer.requires_location && offer.id.same_service(service))
            || service.looks_location_requiring()
    }
}
