//! Error types for the cross-chain client SDK

use thiserror::Error;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] serde_json::Error),

    #[error("Failed to open route stream (HTTP {status}): {body}")]
    Connect { status: u16, body: String },

    #[error("Route stream response has no body")]
    NoResponseBody,

    #[error("Malformed stream line: {0}")]
    Parse(#[from] ParseError),

    #[error("Route stream aborted by remote ({}): {message}", .code.as_deref().unwrap_or("no code"))]
    FatalStream {
        message: String,
        code: Option<String>,
    },

    #[error("Transfer still pending after {attempts} status checks")]
    MonitoringTimeout { attempts: u32 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid {family} address: {address}")]
    InvalidAddress { family: String, address: String },
}

impl SdkError {
    /// Whether a later attempt of the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Transport(_) => true,
            SdkError::Remote { status, .. } | SdkError::Connect { status, .. } => {
                *status == 429 || *status >= 500
            }
            // payloads can be half-written by a proxy mid-deploy
            SdkError::SchemaViolation(_) => true,
            _ => false,
        }
    }
}

impl From<std::convert::Infallible> for SdkError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// One `data:` line of a route stream that could not be turned into an event.
///
/// Never ends the stream on its own.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid JSON in `{line}`: {source}")]
    Json {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected event shape in `{line}`: {source}")]
    Schema {
        line: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
