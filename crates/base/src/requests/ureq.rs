use crate::requests::api::SyncHttpRequest;
use crate::requests::entities::{HttpRequestData, HttpRequestMethod, HttpStatusError};
use anyhow::{bail, Result};
use std::time::Duration;
use ureq::{Agent, AgentBuilder, Error};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct UreqRequestApi {
    agent: Agent,
}

impl Default for UreqRequestApi {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl UreqRequestApi {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every request made through this api fails once `timeout` elapses.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl SyncHttpRequest for UreqRequestApi {
    fn call(&self, req: HttpRequestData) -> Result<String> {
        let mut request = match req.method {
            HttpRequestMethod::Get => self.agent.get(&req.url),
            HttpRequestMethod::Post => self.agent.post(&req.url),
        };

        if let Some(headers) = &req.headers {
            for (header, value) in headers {
                request = request.set(header, value);
            }
        }

        if let Some(queries) = &req.queries {
            for (param, value) in queries {
                request = request.query(param, value);
            }
        }

        let res = if let Some(body) = req.body {
            request.send_json(body)
        } else {
            request.call()
        };

        match res {
            Ok(resp) => Ok(resp.into_string()?),
            Err(e) => match e {
                Error::Status(code, resp) => {
                    let url = resp.get_url().to_string();
                    let body = resp.into_string().unwrap_or_default();
                    bail!(HttpStatusError { url, code, body })
                }
                e => bail!(e),
            },
        }
    }
}
