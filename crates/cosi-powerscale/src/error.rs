//! Error types for the PowerScale API client.

use reqwest::StatusCode;

/// Result type alias for PowerScale operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for PowerScale API operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled appropriately"]
pub enum Error {
    /// Configuration error.
    ///
    /// Missing or malformed connection settings, unreadable TLS material,
    /// or an endpoint that cannot carry a path.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The appliance answered a request with a status above 299.
    #[error("Unexpected status code {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the appliance.
        status: StatusCode,
        /// Response body, verbatim.
        body: String,
    },

    /// The bucket an ACL update targets does not exist.
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// Connection, TLS or timeout failure below the HTTP layer.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading TLS material from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an [`Error::UnexpectedStatus`] from a status and a raw body.
    pub fn unexpected_status(status: StatusCode, body: impl AsRef<[u8]>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(body.as_ref()).into_owned(),
        }
    }

    /// Returns the HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Returns whether this error indicates a configuration issue.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Io(_))
    }

    /// Returns whether the caller may reasonably retry the operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UnexpectedStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
            Self::BucketNotFound(_) => true,
            Self::Config(_) | Self::Serialization(_) | Self::Io(_) => false,
        }
    }
}
