//! API Errors

use std::fmt;

/// Message used when the server does not supply one
pub const FALLBACK_MESSAGE: &str = "Unknown error";

/// Common result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure classification of an API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401: the credential was rejected (or missing)
    Unauthorized { message: String },
    /// Any other non-2xx status
    Status { status: u16, message: String },
    /// The request never produced a response
    Transport(String),
    /// A 2xx response whose body could not be read
    Decode(String),
}

impl ApiError {
    /// Classify a non-success status with the server-supplied message
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 401 {
            ApiError::Unauthorized { message }
        } else {
            ApiError::Status { status, message }
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized { message } => write!(f, "HTTP 401 - {}", message),
            ApiError::Status { status, message } => write!(f, "HTTP {} - {}", status, message),
            ApiError::Transport(msg) => write!(f, "Network error: {}", msg),
            ApiError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Network-level failure reported by a [`super::Transport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e.0)
    }
}
