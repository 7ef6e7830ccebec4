use crate::entities::{
    ContainerCatalog, CreateOrderRequest, CreatedOrder, PriceQuote, PriceQuoteRequest,
    ServiceCatalog, Warehouse,
};
use anyhow::Result;

/// The backend that owns warehouses, catalogs, pricing and orders.
pub trait OrderApi {
    fn get_warehouses(&self) -> Result<Vec<Warehouse>>;
    fn get_container_catalog(&self) -> Result<ContainerCatalog>;
    fn get_service_catalog(&self) -> Result<ServiceCatalog>;
    fn calculate_price(&self, request: &PriceQuoteRequest) -> Result<PriceQuote>;
    fn create_order(&self, request: &CreateOrderRequest) -> Result<CreatedOrder>;
}
