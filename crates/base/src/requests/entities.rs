use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum HttpRequestMethod {
    #[default]
    Get,
    Post,
}

pub type Headers = HashMap<String, String>;
pub type Queries = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct HttpRequestData {
    pub method: HttpRequestMethod,
    pub url: String,
    pub headers: Option<Headers>,
    pub queries: Option<Queries>,
    pub body: Option<Value>,
}

impl HttpRequestData {
    pub fn new(method: HttpRequestMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(Default::default)
            .insert(name.to_string(), value.to_string());
        self
    }
}

pub type NumberOfRetries = u32;
pub type SecondsToSleep = u32;

#[derive(Debug, Default)]
pub struct HttpRequestWithRetriesParams<'a> {
    pub req_entity_name: &'a str,
    pub target_logger: &'a str,
    pub number_of_retries: NumberOfRetries,
    pub seconds_to_sleep: SecondsToSleep,
}

pub type StatusCode = u16;

/// A response that arrived but carried a non-success status.
#[derive(Debug, Error)]
#[error("request to {url} failed with a code {code}: {body}")]
pub struct HttpStatusError {
    pub url: String,
    pub code: StatusCode,
    pub body: String,
}
