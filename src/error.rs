use thiserror::Error;

/// Failures reported by an [`IncomeApi`](crate::domain::ports::IncomeApi) implementation.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse failure classes that callers of the service can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotConfigured,
    AuthFailed,
    RequestFailed,
}

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("Receipt service is not configured")]
    NotConfigured,
    #[error("Authentication failed: {0}")]
    Authentication(#[source] ApiError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Request failed: {0}")]
    Request(#[source] ApiError),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ReceiptError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotConfigured => FailureKind::NotConfigured,
            Self::Authentication(_) => FailureKind::AuthFailed,
            Self::Validation(_)
            | Self::Serialization(_)
            | Self::Request(_)
            | Self::UnexpectedResponse(_) => FailureKind::RequestFailed,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
pub type ApiResult<T> = std::result::Result<T, ApiError>;
