//! Shared plumbing for the downstream HTTP clients.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::UpstreamError;
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

/// Build the reqwest client shared by all downstream clients.
///
/// `timeout` bounds every call end to end, body included.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// A reqwest client bound to one downstream service.
#[derive(Debug, Clone)]
pub(crate) struct ServiceClient {
    client: Client,
    base_url: String,
    service: &'static str,
}

impl ServiceClient {
    pub fn new(client: Client, base_url: impl Into<String>, service: &'static str) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            service,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the request, recording duration and outcome.
    pub async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, UpstreamError> {
        let start = Instant::now();
        let result = request.send().await;
        EXTERNAL_SERVICE_DURATION
            .with_label_values(&[self.service, operation])
            .observe(start.elapsed().as_secs_f64());

        let status = match &result {
            Ok(response) if response.status().is_server_error() => "error",
            Ok(_) => "success",
            Err(e) if e.is_timeout() => "timeout",
            Err(e) if e.is_builder() => "invalid",
            Err(_) => "error",
        };
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[self.service, operation, status])
            .inc();

        match result {
            Ok(response) => {
                debug!(
                    service = self.service,
                    operation,
                    status = response.status().as_u16(),
                    "Downstream call completed"
                );
                Ok(response)
            }
            Err(e) => Err(self.transport_error(e)),
        }
    }

    /// Fail with `UpstreamError::Status` unless the response is 2xx.
    pub async fn ensure_success(&self, response: Response) -> Result<Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(UpstreamError::Status {
            service: self.service,
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }

    /// Decode a 2xx JSON body.
    pub async fn json<T: DeserializeOwned>(&self, response: Response) -> Result<T, UpstreamError> {
        let response = self.ensure_success(response).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout {
                    service: self.service,
                }
            } else {
                UpstreamError::Parse {
                    service: self.service,
                    message: e.to_string(),
                }
            }
        })
    }

    /// Decode a JSON body, mapping 404 to `None`.
    pub async fn optional_json<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<Option<T>, UpstreamError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.json(response).await.map(Some)
    }

    pub fn header(&self, response: &Response, header: &'static str) -> Result<String, UpstreamError> {
        response
            .headers()
            .get(header)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(UpstreamError::MissingHeader {
                service: self.service,
                header,
            })
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout {
                service: self.service,
            }
        } else if e.is_builder() {
            UpstreamError::InvalidRequest {
                service: self.service,
                message: e.to_string(),
            }
        } else {
            UpstreamError::Unavailable {
                service: self.service,
                message: e.to_string(),
            }
        }
    }
}
