use base::requests::entities::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderApiError {
    #[error("{message}")]
    Remote { code: StatusCode, message: String },
    #[error("an error occurred on decoding {entity}: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The text worth showing to a user for a failed api call.
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<OrderApiError>() {
        Some(OrderApiError::Remote { message, .. }) => message.clone(),
        _ => err.to_string(),
    }
}
