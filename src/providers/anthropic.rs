use anyhow::Result;
use reqwest::blocking::Client; // we are using the blocking API here to make sync calls
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::{
    base::ApiClient,
    configs::AnthropicProviderConfig,
    types::message::MessagesRequest,
};
use crate::errors::{ClientError, ConfigError, TransportError};

pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicProviderConfig) -> Result<Self> {
        // Timeouts are set per request from the caller's deadline.
        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!("{}/v1/messages", self.config.host.trim_end_matches('/'))
    }

    fn post(
        &self,
        api_key: &str,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(self.url())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .timeout(timeout)
            .body(body)
            .send()
            .map_err(classify)?;

        match response.status() {
            StatusCode::OK => Ok(response.bytes().map_err(classify)?.to_vec()),
            status => {
                let body = response.text().map_err(classify)?;
                Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(err)
    }
}

impl ApiClient for AnthropicClient {
    fn send_request(
        &self,
        request: &MessagesRequest,
        deadline: Instant,
    ) -> Result<Vec<u8>, ClientError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TransportError::Timeout.into());
        }

        let body = serde_json::to_vec(request).map_err(TransportError::Encode)?;
        debug!(url = %self.url(), bytes = body.len(), "sending messages request");
        trace!(payload = %String::from_utf8_lossy(&body), "request payload");

        let response = self.post(api_key, body, remaining)?;
        trace!(payload = %String::from_utf8_lossy(&response), "response payload");
        Ok(response)
    }
}
