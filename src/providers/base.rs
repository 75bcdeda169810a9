use std::time::Instant;

use super::types::message::MessagesRequest;
use crate::errors::ClientError;

/// Transport for the messages endpoint (Anthropic, scripted mocks, etc).
///
/// Implementations return the undecoded response body on success. They must not
/// retry: every failure is handed back to the caller as is. The `deadline` bounds
/// the whole call, and an elapsed deadline is reported as
/// [`TransportError::Timeout`](crate::errors::TransportError::Timeout).
pub trait ApiClient: Send + Sync {
    fn send_request(
        &self,
        request: &MessagesRequest,
        deadline: Instant,
    ) -> Result<Vec<u8>, ClientError>;
}
