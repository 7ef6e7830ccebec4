use order_api::entities::pricing::{Dimension, Price};
use std::fmt::{Display, Formatter};

use crate::controller::ReferenceData;
use crate::entities::{OrderDraft, Quantity};

const NOT_SPECIFIED: &str = "Не указано";
const CALCULATING: &str = "Рассчитывается...";

/// Read-only view of the draft for the final review.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct OrderSummary {
    pub marketplace: Option<String>,
    pub warehouse: Option<String>,
    pub cargo_type: Option<String>,
    pub box_count: Option<Quantity>,
    pub pallet_count: Option<Quantity>,
    pub container_type: Option<String>,
    pub dimensions: Option<(Dimension, Dimension, Dimension)>,
    pub weight: Option<Dimension>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub services: Vec<String>,
    pub pickup_address: Option<String>,
    pub delivery_price: Option<Price>,
    pub cargo_price: Option<Price>,
    pub services_price: Option<Price>,
    pub total_price: Option<Price>,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl OrderSummary {
    pub fn new(draft: &OrderDraft, reference: &ReferenceData) -> Self {
        let derived = &draft.derived;
        let details = draft.price_details.clone().unwrap_or_default();

        let dimensions = match (derived.length, derived.width, derived.height) {
            (Some(length), Some(width), Some(height)) => Some((length, width, height)),
            _ => None,
        };

        Self {
            marketplace: non_blank(&draft.marketplace).map(|id| {
                reference
                    .marketplace_name(&id)
                    .map(str::to_string)
                    .unwrap_or(id)
            }),
            warehouse: non_blank(&draft.warehouse).map(|id| {
                reference
                    .warehouse(&id)
                    .map(|warehouse| warehouse.name.clone())
                    .unwrap_or(id)
            }),
            cargo_type: derived.cargo_type.map(|kind| kind.label().to_string()),
            box_count: derived.box_count,
            pallet_count: derived.pallet_count,
            container_type: derived.container_type.clone(),
            dimensions,
            weight: derived.weight,
            client_name: non_blank(&draft.client_name),
            phone_number: non_blank(&draft.phone_number),
            company: non_blank(&draft.company),
            email: non_blank(&draft.email),
            services: draft
                .additional_services
                .iter()
                .map(|service| reference.service_name(service))
                .collect(),
            pickup_address: non_blank(&draft.pickup_address),
            delivery_price: details.delivery,
            cargo_price: details.cargo,
            services_price: details.additional_services,
            total_price: draft.order_price,
        }
    }
}

struct OrNotSpecified<'a>(&'a Option<String>);

impl Display for OrNotSpecified<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_deref().unwrap_or(NOT_SPECIFIED))
    }
}

struct PriceLine(Option<Price>);

impl Display for PriceLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(price) => write!(f, "{} ₽", price),
            None => write!(f, "{}", CALCULATING),
        }
    }
}

impl Display for OrderSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Сводка заказа")?;

        writeln!(f, "Информация о доставке")?;
        writeln!(f, "  Маркетплейс: {}", OrNotSpecified(&self.marketplace))?;
        writeln!(f, "  Склад: {}", OrNotSpecified(&self.warehouse))?;

        writeln!(f, "Информация о грузе")?;
        writeln!(f, "  Тип груза: {}", OrNotSpecified(&self.cargo_type))?;
        if let Some(count) = self.box_count {
            writeln!(f, "  Количество коробок: {}", count)?;
        }
        if let Some(count) = self.pallet_count {
            writeln!(f, "  Количество паллет: {}", count)?;
        }
        if let Some(container_type) = &self.container_type {
            writeln!(f, "  Тип контейнера: {}", container_type)?;
        }
        if let Some((length, width, height)) = &self.dimensions {
            writeln!(f, "  Габариты (Д×Ш×В): {}×{}×{} см", length, width, height)?;
        }
        if let Some(weight) = &self.weight {
            writeln!(f, "  Вес: {} кг", weight)?;
        }

        writeln!(f, "Контактная информация")?;
        writeln!(f, "  Имя: {}", OrNotSpecified(&self.client_name))?;
        writeln!(f, "  Телефон: {}", OrNotSpecified(&self.phone_number))?;
        if let Some(company) = &self.company {
            writeln!(f, "  Компания: {}", company)?;
        }
        if let Some(email) = &self.email {
            writeln!(f, "  Email: {}", email)?;
        }

        if !self.services.is_empty() {
            writeln!(f, "Дополнительные услуги")?;
            for service in self.services.iter() {
                writeln!(f, "  {}: Выбрано", service)?;
            }
            if let Some(address) = &self.pickup_address {
                writeln!(f, "  Адрес забора груза: {}", address)?;
            }
        }

        writeln!(f, "Итого к оплате")?;
        writeln!(f, "  Стоимость доставки: {}", PriceLine(self.delivery_price))?;
        writeln!(f, "  Стоимость обработки груза: {}", PriceLine(self.cargo_price))?;
        if !self.services.is_empty() {
            writeln!(
                f,
                "  Стоимость дополнительных услуг: {}",
                PriceLine(self.services_price)
            )?;
        }
        write!(f, "  Общая стоимость: {}", PriceLine(self.total_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_api::entities::{CargoKind, CatalogId, PriceDetails, ServiceRef, Warehouse};
    use rust_decimal_macros::dec;

    fn reference() -> ReferenceData {
        ReferenceData {
            warehouses: vec![Warehouse {
                id: CatalogId::Number(3),
                name: String::from("Коледино"),
                marketplace: CatalogId::Number(1),
                marketplace_name: String::from("Wildberries"),
                city: CatalogId::Number(1),
                city_name: String::from("Москва"),
            }],
            ..Default::default()
        }
    }

    #[test]
    #[allow(non_snake_case)]
    fn display__empty_draft__should_show_placeholders() {
        let summary = OrderSummary::new(&OrderDraft::default(), &reference());

        let text = summary.to_string();

        assert!(text.contains("Маркетплейс: Не указано"));
        assert!(text.contains("Телефон: Не указано"));
        assert!(text.contains("Общая стоимость: Рассчитывается..."));
        assert!(!text.contains("Дополнительные услуги"));
    }

    #[test]
    #[allow(non_snake_case)]
    fn new__filled_draft__should_use_catalog_names_and_prices() {
        let mut draft = OrderDraft {
            marketplace: String::from("1"),
            warehouse: String::from("3"),
            client_name: String::from("Ivan"),
            additional_services: vec![ServiceRef::Id(1), ServiceRef::slug("loader_40")],
            pickup_address: String::from("Москва, ул. Ленина, 1"),
            order_price: Some(dec!(1500)),
            price_details: Some(PriceDetails {
                delivery: Some(dec!(1000)),
                cargo: None,
                additional_services: Some(dec!(500)),
            }),
            ..Default::default()
        };
        draft.derived.cargo_type = Some(CargoKind::Box);
        draft.derived.box_count = Some(3);

        let summary = OrderSummary::new(&draft, &reference());
        let text = summary.to_string();

        assert_eq!(summary.marketplace.as_deref(), Some("Wildberries"));
        assert_eq!(summary.warehouse.as_deref(), Some("Коледино"));
        assert_eq!(
            summary.services,
            vec![
                String::from("Забор груза (до 10 коробок)"),
                String::from("Услуги грузчика (21-40 коробок)"),
            ]
        );
        assert!(text.contains("Тип груза: Коробка"));
        assert!(text.contains("Количество коробок: 3"));
        assert!(text.contains("Адрес забора груза: Москва, ул. Ленина, 1"));
        assert!(text.contains("Стоимость доставки: 1000 ₽"));
        assert!(text.contains("Стоимость обработки груза: Рассчитывается..."));
        assert!(text.contains("Общая стоимость: 1500 ₽"));
    }
}
