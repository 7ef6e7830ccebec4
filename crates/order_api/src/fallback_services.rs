//! A mirror of the backend service catalog, used when
//! `/orders/additional-services/` is unavailable. It has to be kept in
//! sync with the backend by hand.

use crate::entities::{ServiceCatalog, ServiceGroup, ServiceOffer, ServiceRef};

struct MirrorOffer {
    slug: &'static str,
    name: &'static str,
    price: &'static str,
    requires_location: bool,
}

const fn offer(
    slug: &'static str,
    name: &'static str,
    price: &'static str,
    requires_location: bool,
) -> MirrorOffer {
    MirrorOffer {
        slug,
        name,
        price,
        requires_location,
    }
}

const PICKUP_OFFERS: [MirrorOffer; 6] = [
    offer("pickup_city_small", "Забор груза по городу (1-10 коробок)", "500 ₽", true),
    offer("pickup_city_large", "Забор груза по городу (11+ коробок)", "1000 ₽", true),
    offer("pickup_city_pallet_small", "Забор груза по городу (1 паллет до 500кг)", "1000 ₽", true),
    offer("pickup_city_pallet_large", "Забор груза по городу (1 паллет 500+ кг)", "1500 ₽", true),
    offer("pickup_suburban_20km", "Забор груза за городом до 20км", "2500 ₽", true),
    offer("pickup_suburban_50km", "Забор груза за городом 20-50км", "4000 ₽", true),
];

const PALLETIZING_OFFERS: [MirrorOffer; 2] = [
    offer("palletizing_small", "Паллетирование (1 паллет до 1 куба)", "400 ₽", false),
    offer("palletizing_large", "Паллетирование (1 паллет более 1 куба)", "500 ₽", false),
];

const LOADER_OFFERS: [MirrorOffer; 4] = [
    offer("loader_20", "Услуги грузчика (до 20 коробок)", "500 ₽", false),
    offer("loader_40", "Услуги грузчика (21-40 коробок)", "1000 ₽", false),
    offer("loader_60", "Услуги грузчика (41-60 коробок)", "1500 ₽", false),
    offer("loader_61plus", "Услуги грузчика (61+ коробок)", "2000 ₽", false),
];

/// Names of the database services, as the backend seeds them.
const DATABASE_SERVICE_NAMES: [&str; 10] = [
    "Забор груза (до 10 коробок)",
    "Забор груза (свыше 10 коробок)",
    "Забор груза (1 паллета до 500кг)",
    "Забор груза (1 паллета свыше 500кг)",
    "Паллетирование (до 1 куба)",
    "Паллетирование (свыше 1 куба)",
    "Услуги грузчика (до 20 коробок)",
    "Услуги грузчика (21-40 коробок)",
    "Услуги грузчика (41-60 коробок)",
    "Услуги грузчика (свыше 60 коробок)",
];

fn group(title: &str, offers: &[MirrorOffer]) -> ServiceGroup {
    ServiceGroup {
        title: title.to_string(),
        services: offers
            .iter()
            .map(|offer| ServiceOffer {
                id: ServiceRef::slug(offer.slug),
                name: offer.name.to_string(),
                price: offer.price.to_string(),
                requires_location: offer.requires_location,
            })
            .collect(),
    }
}

pub fn fallback_service_catalog() -> ServiceCatalog {
    ServiceCatalog {
        service_groups: vec![
            group("Забор груза", &PICKUP_OFFERS),
            group("Паллетирование", &PALLETIZING_OFFERS),
            group("Услуги грузчика", &LOADER_OFFERS),
        ],
    }
}

/// Name of a service known without asking the backend.
pub fn builtin_service_name(service: &ServiceRef) -> Option<&'static str> {
    match service {
        ServiceRef::Slug(slug) => PICKUP_OFFERS
            .iter()
            .chain(PALLETIZING_OFFERS.iter())
            .chain(LOADER_OFFERS.iter())
            .find(|offer| offer.slug == slug.trim())
            .map(|offer| offer.name)
            .or_else(|| match service.canonical() {
                ServiceRef::Id(id) => database_service_name(id),
                ServiceRef::Slug(_) => None,
            }),
        ServiceRef::Id(id) => database_service_name(*id),
    }
}

fn database_service_name(id: u32) -> Option<&'static str> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    DATABASE_SERVICE_NAMES.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_catalog_flags_every_pickup_service() {
        let catalog = fallback_service_catalog();

        let flagged = catalog
            .offers()
            .filter(|offer| offer.requires_location)
            .count();

        assert_eq!(flagged, PICKUP_OFFERS.len());
        assert!(catalog.requires_location(&ServiceRef::Id(2)));
        assert!(!catalog.requires_location(&ServiceRef::Id(6)));
    }

    #[test]
    fn builtin_names_cover_slugs_ids_and_numeric_strings() {
        assert_eq!(
            builtin_service_name(&ServiceRef::slug("loader_40")),
            Some("Услуги грузчика (21-40 коробок)")
        );
        assert_eq!(
            builtin_service_name(&ServiceRef::Id(1)),
            Some("Забор груза (до 10 коробок)")
        );
        assert_eq!(
            builtin_service_name(&ServiceRef::slug("5")),
            Some("Паллетирование (до 1 куба)")
        );
        assert_eq!(builtin_service_name(&ServiceRef::Id(11)), None);
        assert_eq!(builtin_service_name(&ServiceRef::Id(0)), None);
    }
}
