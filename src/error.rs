use thiserror::Error;

/// Unified error type for the client's fallible edges.
///
/// Request calls never surface this type across the public boundary: the
/// pipeline converts every failure into an [`ApiResponse`](crate::ApiResponse)
/// and callers branch on `is_error`. This enum exists for construction paths
/// (builder, secret resolution) and as the value handed to `on_error`
/// observers and error interceptors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("remote error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an error describing a non-2xx backend response.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Error::Remote {
            status,
            message: message.into(),
        }
    }

    /// HTTP status associated with this error.
    ///
    /// Remote errors carry the real backend status; transport failures map
    /// to the synthetic status the pipeline reports for them.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Transport(e) => Some(e.synthetic_status()),
            _ => None,
        }
    }
}
