//! Data models
//!
//! Shared between the API client and viewers. All IDs are `i64`
//! (backend INTEGER PRIMARY KEY). The `RawOrder` ingestion shape lives
//! here too: backend payloads are normalized exactly once, at the
//! boundary, and everything downstream uses the canonical [`Order`].

pub mod order;
pub mod stock;

// Re-exports
pub use order::*;
pub use stock::*;
