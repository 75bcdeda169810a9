use std::fmt;

use thiserror::Error;

/// A required setting is missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key not found. Set --api-key or the ANTHROPIC_API_KEY environment variable")]
    MissingApiKey,
}

/// The call to the remote endpoint did not produce a response body.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("received non-200 response: {status}, body: {body}")]
    Status { status: u16, body: String },

    #[error("request deadline exceeded")]
    Timeout,

    #[error("failed to serialize request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Everything an [`ApiClient`](crate::providers::base::ApiClient) may fail with.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Which of the two conversation turns an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    FollowUp,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initial => write!(f, "initial"),
            Phase::FollowUp => write!(f, "follow-up"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ThinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{phase} request failed: {source}")]
    Transport {
        phase: Phase,
        #[source]
        source: TransportError,
    },

    #[error("invalid {phase} response: {reason}")]
    Protocol { phase: Phase, reason: String },
}

impl ThinkError {
    pub fn protocol<S: Into<String>>(phase: Phase, reason: S) -> Self {
        ThinkError::Protocol {
            phase,
            reason: reason.into(),
        }
    }

    /// Lifts a client failure into the phase it happened in. Configuration
    /// failures pass through untouched.
    pub fn from_client(phase: Phase, err: ClientError) -> Self {
        match err {
            ClientError::Config(err) => ThinkError::Config(err),
            ClientError::Transport(source) => ThinkError::Transport { phase, source },
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            ThinkError::Config(_) => None,
            ThinkError::Transport { phase, .. } | ThinkError::Protocol { phase, .. } => {
                Some(*phase)
            }
        }
    }
}

pub type ThinkResult<T> = Result<T, ThinkError>;
