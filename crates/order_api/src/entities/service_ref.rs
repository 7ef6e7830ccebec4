use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type ServiceId = u32;
pub type ServiceSlug = String;

/// Numeric ids of the city pickup services.
pub const PICKUP_SERVICE_IDS: [ServiceId; 4] = [1, 2, 3, 4];

const PICKUP_MARKER: &str = "pickup";

const SLUG_TO_ID: [(&str, ServiceId); 10] = [
    ("pickup_city_small", 1),
    ("pickup_city_large", 2),
    ("pickup_city_pallet_small", 3),
    ("pickup_city_pallet_large", 4),
    ("palletizing_small", 5),
    ("palletizing_large", 6),
    ("loader_20", 7),
    ("loader_40", 8),
    ("loader_60", 9),
    ("loader_61plus", 10),
];

/// An additional service as the frontend catalog names it (a slug) or as
/// the database knows it (a numeric id). Both may describe the same service.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceRef {
    Id(ServiceId),
    Slug(ServiceSlug),
}

impl ServiceRef {
    pub fn slug(slug: &str) -> Self {
        Self::Slug(slug.to_string())
    }

    /// Maps known slugs and numeric strings to ids. Slugs without a
    /// database counterpart stay slugs.
    pub fn canonical(&self) -> ServiceRef {
        match self {
            ServiceRef::Id(id) => ServiceRef::Id(*id),
            ServiceRef::Slug(slug) => {
                let slug = slug.trim();

                if let Ok(id) = slug.parse::<ServiceId>() {
                    return ServiceRef::Id(id);
                }

                SLUG_TO_ID
                    .iter()
                    .find(|(known, _)| *known == slug)
                    .map(|(_, id)| ServiceRef::Id(*id))
                    .unwrap_or_else(|| ServiceRef::Slug(slug.to_string()))
            }
        }
    }

    pub fn same_service(&self, other: &ServiceRef) -> bool {
        self.canonical() == other.canonical()
    }

    /// The catalog-independent guess: a slug mentioning pickup or one of
    /// the pickup ids.
    pub fn looks_location_requiring(&self) -> bool {
        if let ServiceRef::Slug(slug) = self {
            if slug.contains(PICKUP_MARKER) {
                return true;
            }
        }

        matches!(self.canonical(), ServiceRef::Id(id) if PICKUP_SERVICE_IDS.contains(&id))
    }
}

impl From<ServiceId> for ServiceRef {
    fn from(id: ServiceId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ServiceRef {
    fn from(slug: &str) -> Self {
        Self::slug(slug)
    }
}

impl FromStr for ServiceRef {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            anyhow::bail!("empty service reference");
        }

        Ok(match input.parse::<ServiceId>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::slug(input),
        })
    }
}

impl Display for ServiceRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceRef::Id(id) => write!(f, "{}", id),
            ServiceRef::Slug(slug) => write!(f, "{}", slug),
        }
    }
}
