use anyhow::Result;
use calculator::controller::{CalculatorState, SubmitOutcome};
use calculator::entities::{DraftUpdate, Step};
use calculator::pricing::QuoteApplied;
use calculator::worker::{ApiEvent, RemoteWorker};
use calculator::Calculator;
use order_api::entities::{
    CargoKind, CatalogId, ContainerCatalog, CreateOrderRequest, CreatedOrder, PriceQuote,
    PriceQuoteRequest, ServiceCatalog, Warehouse,
};
use order_api::OrderApi;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct ThreadSafeApi {
    quotes: Mutex<Vec<PriceQuoteRequest>>,
    orders: Mutex<Vec<CreateOrderRequest>>,
}

impl OrderApi for ThreadSafeApi {
    fn get_warehouses(&self) -> Result<Vec<Warehouse>> {
        Ok(vec![Warehouse {
            id: CatalogId::Number(7),
            name: String::from("Коледино"),
            marketplace: CatalogId::Number(1),
            marketplace_name: String::from("Wildberries"),
            city: CatalogId::Number(1),
            city_name: String::from("Москва"),
        }])
    }

    fn get_container_catalog(&self) -> Result<ContainerCatalog> {
        Ok(Default::default())
    }

    fn get_service_catalog(&self) -> Result<ServiceCatalog> {
        Ok(Default::default())
    }

    fn calculate_price(&self, request: &PriceQuoteRequest) -> Result<PriceQuote> {
        self.quotes.lock().unwrap().push(request.clone());
        Ok(PriceQuote {
            total_price: dec!(100) * rust_decimal::Decimal::from(request.cargo.box_count),
            currency: String::from("RUB"),
            details: Default::default(),
        })
    }

    fn create_order(&self, request: &CreateOrderRequest) -> Result<CreatedOrder> {
        self.orders.lock().unwrap().push(request.clone());
        Ok(CreatedOrder {
            id: 42,
            delivery_date: Some(String::from("2024-05-20")),
            total_cost: Some(dec!(1500)),
        })
    }
}

const WAIT: Duration = Duration::from_secs(5);

#[test]
#[allow(non_snake_case)]
fn session__quotes_and_order_through_worker__should_reach_success() {
    let api = Arc::new(ThreadSafeApi::default());
    let (worker, events) = RemoteWorker::new(Arc::clone(&api));
    let mut calculator = Calculator::new(1);
    calculator.load_reference_data(api.as_ref());

    calculator.select_marketplace("1");
    calculator.merge_field(DraftUpdate::warehouse("7"));
    calculator.go_next();

    let request = calculator
        .merge_field(DraftUpdate {
            selected_types: Some(BTreeSet::from([CargoKind::Box])),
            quantities: Some(BTreeMap::from([(CargoKind::Box, 3)])),
            selected_box_sizes: Some(vec![String::from("60x40x40 см")]),
            ..Default::default()
        })
        .unwrap();
    worker.dispatch_quote(request);
    assert!(calculator.is_price_loading());

    match events.recv_timeout(WAIT).unwrap() {
        ApiEvent::Quote(response) => {
            assert_eq!(calculator.apply_quote(response), QuoteApplied::Applied)
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(calculator.draft().order_price, Some(dec!(300)));
    assert_eq!(
        api.quotes.lock().unwrap()[0].delivery.warehouse_id,
        CatalogId::Number(7)
    );

    calculator.go_next();
    calculator.go_next();
    calculator.merge_field(DraftUpdate {
        client_name: Some(String::from("Ivan")),
        phone_number: Some(String::from("+79991234567")),
        ..Default::default()
    });
    assert_eq!(calculator.current_step(), Step::Contact);

    match calculator.begin_submit() {
        SubmitOutcome::Dispatched(request) => worker.dispatch_order(request),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(calculator.begin_submit(), SubmitOutcome::Ignored);

    match events.recv_timeout(WAIT).unwrap() {
        ApiEvent::Order(result) => calculator.finish_submit(result),
        other => panic!("unexpected event: {:?}", other),
    }

    match calculator.state() {
        CalculatorState::Success(order) => assert_eq!(order.id, 42),
        other => panic!("unexpected state: {:?}", other),
    }
    assert_eq!(api.orders.lock().unwrap().len(), 1);
}
