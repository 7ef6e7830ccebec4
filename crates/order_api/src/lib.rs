pub mod api;
pub mod entities;
pub mod errors;
pub mod fallback_services;
pub mod wb_order_api;

pub use crate::api::OrderApi;
pub use crate::errors::OrderApiError;
pub use crate::wb_order_api::WbOrderApi;
