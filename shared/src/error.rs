//! Domain error types

use crate::models::OrderStatus;
use thiserror::Error;

/// Order lifecycle error type
///
/// Rejections are decided locally, before any network call, and always
/// leave the order unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// Requested status change does not follow the forward sequence
    #[error("invalid transition: {from} -> {requested}")]
    InvalidTransition {
        from: OrderStatus,
        requested: OrderStatus,
    },

    /// Completion requires the cooking start timestamp to be set
    #[error("order {order_id} cannot complete without a cooking start time")]
    MissingStartedAt { order_id: i64 },
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
