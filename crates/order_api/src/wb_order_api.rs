use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use base::requests::api::SyncHttpRequest;
use base::requests::entities::{
    HttpRequestData, HttpRequestMethod, HttpRequestWithRetriesParams, HttpStatusError,
};
use base::requests::http_request_with_retries;
use base::settings::{ApiSettings, ApiUrl, LoggerTarget, RetrySettings};

use crate::entities::{
    ContainerCatalog, CreateOrderRequest, CreatedOrder, PriceQuote, PriceQuoteRequest,
    ServiceCatalog, Warehouse,
};
use crate::errors::OrderApiError;
use crate::OrderApi;

const WAREHOUSES_PATH: &str = "/orders/warehouses/";
const CONTAINERS_PATH: &str = "/orders/containers/";
const ADDITIONAL_SERVICES_PATH: &str = "/orders/additional-services/";
const CALCULATE_PRICE_PATH: &str = "/orders/calculate-price/";
const CREATE_ORDER_PATH: &str = "/orders/";

#[derive(Deserialize, Debug, Default)]
struct ErrorBodyJson {
    message: Option<String>,
    error: Option<String>,
}

/// Turns an http status error into a `Remote` error carrying the backend's message.
fn remote_error(err: anyhow::Error) -> anyhow::Error {
    let (code, body) = match err.downcast_ref::<HttpStatusError>() {
        Some(status) => (status.code, status.body.clone()),
        None => return err,
    };

    let parsed: ErrorBodyJson = serde_json::from_str(&body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(body);

    anyhow::Error::new(OrderApiError::Remote { code, message })
}

fn decode<T: DeserializeOwned>(entity: &'static str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| OrderApiError::Decode { entity, source }.into())
}

pub struct WbOrderApi<R>
where
    R: SyncHttpRequest,
{
    base_url: ApiUrl,
    target_logger: LoggerTarget,
    retry_settings: RetrySettings,
    request_api: R,
}

impl<R> WbOrderApi<R>
where
    R: SyncHttpRequest,
{
    pub fn new(settings: &ApiSettings, request_api: R) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            target_logger: settings.target_logger.clone(),
            retry_settings: settings.retry,
            request_api,
        }
    }

    pub fn request_api(&self) -> &R {
        &self.request_api
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_reference_data<T: DeserializeOwned>(
        &self,
        path: &str,
        entity: &'static str,
    ) -> Result<T> {
        let req_data = HttpRequestData::new(HttpRequestMethod::Get, &self.url(path));

        let req_params = HttpRequestWithRetriesParams {
            req_entity_name: entity,
            target_logger: &self.target_logger,
            number_of_retries: self.retry_settings.number_of_request_retries,
            seconds_to_sleep: self.retry_settings.seconds_to_sleep_before_request_retry,
        };

        let body =
            http_request_with_retries(req_data, req_params, &self.request_api).map_err(remote_error)?;

        decode(entity, &body)
    }

    fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        entity: &'static str,
        body: &B,
    ) -> Result<T> {
        let json_body = serde_json::to_value(body)
            .with_context(|| format!("an error occurred on encoding {}", entity))?;

        let req_data = HttpRequestData::new(HttpRequestMethod::Post, &self.url(path))
            .with_header("Content-Type", "application/json")
            .with_json_body(json_body);

        log::debug!(target: self.target_logger.as_str(), "requesting {}: {:?}", entity, req_data.body);

        let response = self.request_api.call(req_data).map_err(|e| {
            log::error!(target: self.target_logger.as_str(), "an error occurred on requesting {}: {:?}", entity, e);
            remote_error(e)
        })?;

        decode(entity, &response)
    }
}

impl<R> OrderApi for WbOrderApi<R>
where
    R: SyncHttpRequest,
{
    fn get_warehouses(&self) -> Result<Vec<Warehouse>> {
        self.get_reference_data(WAREHOUSES_PATH, "warehouses")
    }

    fn get_container_catalog(&self) -> Result<ContainerCatalog> {
        self.get_reference_data(CONTAINERS_PATH, "container types")
    }

    fn get_service_catalog(&self) -> Result<ServiceCatalog> {
        self.get_reference_data(ADDITIONAL_SERVICES_PATH, "additional services")
    }

    fn calculate_price(&self, request: &PriceQuoteRequest) -> Result<PriceQuote> {
        self.post(CALCULATE_PRICE_PATH, "price quote", request)
    }

    fn create_order(&self, request: &CreateOrderRequest) -> Result<CreatedOrder> {
        self.post(CREATE_ORDER_PATH, "order", request)
    }
}
