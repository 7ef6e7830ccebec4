use anyhow::{bail, Result};
use base::requests::api::SyncHttpRequest;
use base::requests::entities::{HttpRequestData, HttpRequestMethod, HttpStatusError};
use base::settings::{ApiSettings, RetrySettings};
use log::Level;
use order_api::entities::pricing::{QuoteCargo, QuoteDelivery};
use order_api::entities::{CargoKind, CatalogId, CreateOrderRequest, PriceQuoteRequest, ServiceRef};
use order_api::errors::error_message;
use order_api::{OrderApi, OrderApiError, WbOrderApi};
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
struct FakeHttp {
    responses: HashMap<String, Result<String, (u16, String)>>,
    requests: RefCell<Vec<HttpRequestData>>,
}

impl FakeHttp {
    fn respond(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    fn fail(mut self, url: &str, code: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Err((code, body.to_string())));
        self
    }
}

impl SyncHttpRequest for FakeHttp {
    fn call(&self, req: HttpRequestData) -> Result<String> {
        self.requests.borrow_mut().push(req.clone());

        match self.responses.get(&req.url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((code, body))) => bail!(HttpStatusError {
                url: req.url.clone(),
                code: *code,
                body: body.clone(),
            }),
            None => bail!("connection refused"),
        }
    }
}

fn settings() -> ApiSettings {
    ApiSettings {
        base_url: String::from("http://backend"),
        retry: RetrySettings {
            number_of_request_retries: 1,
            seconds_to_sleep_before_request_retry: 0,
        },
        target_logger: String::from("test"),
        ..Default::default()
    }
}

#[test]
fn should_successfully_get_warehouses() {
    let http = FakeHttp::default().respond(
        "http://backend/orders/warehouses/",
        r#"[{"id": 3, "name": "Коледино", "marketplace": 1, "marketplace_name": "Wildberries",
             "city": 2, "city_name": "Москва"}]"#,
    );
    let api = WbOrderApi::new(&settings(), http);

    let warehouses = api.get_warehouses().unwrap();

    assert_eq!(warehouses.len(), 1);
    assert_eq!(warehouses[0].id, CatalogId::Number(3));
    assert_eq!(warehouses[0].marketplace_name, "Wildberries");
}

#[test]
fn should_retry_reference_data_and_log_every_failure() {
    testing_logger::setup();

    let http = FakeHttp::default();
    let api = WbOrderApi::new(&settings(), http);

    assert!(api.get_container_catalog().is_err());

    testing_logger::validate(|captured_logs| {
        let number_of_error_logs = captured_logs
            .iter()
            .filter(|log| matches!(log.level, Level::Error))
            .count();

        assert_eq!(number_of_error_logs, 2);
    });
}

#[test]
fn should_decode_service_catalog_with_mixed_ids() {
    let http = FakeHttp::default().respond(
        "http://backend/orders/additional-services/",
        r#"{"serviceGroups": [{"title": "Забор груза", "services": [
            {"id": 1, "name": "Забор груза (до 10 коробок)", "price": "500", "requires_location": true},
            {"id": "loader_20", "name": "Услуги грузчика", "price": "500"}]}]}"#,
    );
    let api = WbOrderApi::new(&settings(), http);

    let catalog = api.get_service_catalog().unwrap();

    assert!(catalog.requires_location(&ServiceRef::slug("pickup_city_small")));
    assert!(!catalog.requires_location(&ServiceRef::Id(7)));
}

#[test]
fn should_post_price_request_as_json_and_decode_string_prices() {
    let http = FakeHttp::default().respond(
        "http://backend/orders/calculate-price/",
        r#"{"total_price": "1500.00", "currency": "RUB",
            "details": {"delivery": "1000", "cargo": 300, "additional_services": "200"}}"#,
    );
    let api = WbOrderApi::new(&settings(), http);

    let request = PriceQuoteRequest {
        delivery: QuoteDelivery {
            warehouse_id: CatalogId::Number(3),
            marketplace: CatalogId::Number(1),
        },
        cargo: QuoteCargo {
            cargo_type: String::from("box"),
            box_count: 3,
            ..Default::default()
        },
        additional_services: vec![ServiceRef::Id(1)],
        pickup_address: String::from("Москва, ул. Ленина, 1"),
    };

    let quote = api.calculate_price(&request).unwrap();

    assert_eq!(quote.total_price, dec!(1500.00));
    assert_eq!(quote.details.cargo, Some(dec!(300)));

    let api_requests = api_requests(&api);
    assert_eq!(api_requests.len(), 1);
    assert_eq!(api_requests[0].method, HttpRequestMethod::Post);

    let body = api_requests[0].body.clone().unwrap();
    assert_eq!(body["delivery"]["warehouse_id"], 3);
    assert_eq!(body["cargo"]["box_count"], 3);
    assert_eq!(body["additional_services"][0], 1);
}

#[test]
fn should_surface_backend_message_of_failed_order() {
    let http = FakeHttp::default().fail(
        "http://backend/orders/",
        400,
        r#"{"error": "Pickup address not provided"}"#,
    );
    let api = WbOrderApi::new(&settings(), http);

    let mut request = CreateOrderRequest::default();
    request.cargo_type.selected_types = vec![CargoKind::Box];
    request.cargo_type.quantities.insert(CargoKind::Box, 3);

    let err = api.create_order(&request).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OrderApiError>(),
        Some(OrderApiError::Remote { code: 400, .. })
    ));
    assert_eq!(error_message(&err), "Pickup address not provided");

    let body = api_requests(&api)[0].body.clone().unwrap();
    assert_eq!(body["cargoType"]["quantities"]["Коробка"], 3);
    assert_eq!(body["cargoType"]["selectedTypes"][0], "Коробка");
}

#[test]
fn should_decode_created_order_with_backend_cost_field() {
    let http = FakeHttp::default().respond("http://backend/orders/", r#"{"id": 42, "cost": "1500.00"}"#);
    let api = WbOrderApi::new(&settings(), http);

    let created = api.create_order(&Default::default()).unwrap();

    assert_eq!(created.id, 42);
    assert_eq!(created.total_cost, Some(dec!(1500)));
    assert_eq!(created.delivery_date, None);
}

#[test]
fn should_report_undecodable_response() {
    let http = FakeHttp::default().respond("http://backend/orders/warehouses/", "<html>");
    let api = WbOrderApi::new(&settings(), http);

    let err = api.get_warehouses().unwrap_err();

    assert!(matches!(
        err.downcast_ref::<OrderApiError>(),
        Some(OrderApiError::Decode { entity: "warehouses", .. })
    ));
}

fn api_requests(api: &WbOrderApi<FakeHttp>) -> Vec<HttpRequestData> {
    api.request_api().requests.borrow().clone()
}
