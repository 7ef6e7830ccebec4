use anyhow::Result;
use crossbeam::channel::{unbounded, Receiver, Sender};
use order_api::entities::{CreateOrderRequest, CreatedOrder};
use order_api::OrderApi;
use std::sync::Arc;
use std::thread;

use crate::pricing::{QuoteRequest, QuoteResponse};

/// A finished remote call, delivered back to the thread that owns the controller.
#[derive(Debug)]
pub enum ApiEvent {
    Quote(QuoteResponse),
    Order(Result<CreatedOrder>),
}

/// Runs remote calls off the controller's thread so that the controller
/// keeps processing edits while a quote or an order is outstanding.
pub struct RemoteWorker<A: OrderApi + Send + Sync + 'static> {
    api: Arc<A>,
    sender: Sender<ApiEvent>,
}

impl<A: OrderApi + Send + Sync + 'static> RemoteWorker<A> {
    /// The receiver yields every finished call in completion order.
    pub fn new(api: Arc<A>) -> (Self, Receiver<ApiEvent>) {
        let (sender, receiver) = unbounded();
        (Self { api, sender }, receiver)
    }

    pub fn dispatch_quote(&self, request: QuoteRequest) {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let result = api.calculate_price(&request.body);
            let response = QuoteResponse {
                generation: request.generation,
                result,
            };

            if sender.send(ApiEvent::Quote(response)).is_err() {
                log::debug!(
                    "quote generation {} finished after the session ended",
                    request.generation
                );
            }
        });
    }

    pub fn dispatch_order(&self, request: CreateOrderRequest) {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let result = api.create_order(&request);

            if sender.send(ApiEvent::Order(result)).is_err() {
                log::debug!("order creation finished after the session ended");
            }
        });
    }
}
