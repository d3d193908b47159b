//! Client error types

use shared::LifecycleError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected status transition (decided locally, no network involved)
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Stock deduction failed; the status transition is NOT rolled back
    #[error("Stock deduction failed for order {order_id}: {source}")]
    StockDeduction {
        order_id: i64,
        #[source]
        source: Box<ClientError>,
    },
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
