use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use super::base::ApiClient;
use super::types::message::MessagesRequest;
use crate::errors::{ClientError, TransportError};

/// A mock client that replies with pre-configured payloads, in order, and
/// records every request it receives.
#[derive(Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<Vec<u8>, ClientError>>>,
    requests: Mutex<Vec<Value>>,
    deadlines: Mutex<Vec<Instant>>,
}

impl MockClient {
    /// Create a new mock client with a sequence of JSON responses
    pub fn new(responses: Vec<Value>) -> Self {
        Self::with_results(
            responses
                .into_iter()
                .map(|r| Ok(r.to_string().into_bytes()))
                .collect(),
        )
    }

    /// Create a mock client from raw outcomes, failures included
    pub fn with_results(results: Vec<Result<Vec<u8>, ClientError>>) -> Self {
        Self {
            responses: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
            deadlines: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, serialized as they would go on the wire
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Deadlines passed with each request, in call order
    pub fn deadlines(&self) -> Vec<Instant> {
        self.deadlines.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ApiClient for MockClient {
    fn send_request(
        &self,
        request: &MessagesRequest,
        deadline: Instant,
    ) -> Result<Vec<u8>, ClientError> {
        let payload = serde_json::to_value(request).map_err(TransportError::Encode)?;
        self.requests.lock().unwrap().push(payload);
        self.deadlines.lock().unwrap().push(deadline);

        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::Other("no scripted response left".to_string()).into())
        })
    }
}
