//! Shared types for the Saffron restaurant client
//!
//! Canonical data model, the pure order transition engine and the
//! elapsed-time computation. No I/O lives in this crate: everything here
//! is a deterministic function of its inputs, which is what makes the
//! lifecycle rules unit-testable without a backend.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{LifecycleError, LifecycleResult};
pub use models::{ActorRole, Order, OrderItem, OrderStatus, RawOrder, StockItem};
pub use order::{AppliedTransition, SideEffect};
