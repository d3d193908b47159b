//! Saffron Client - order lifecycle manager for the restaurant front-end
//!
//! Every screen of the front-end is a thin view over the backend REST
//! API. This crate owns the one part with real invariants: the order
//! status lifecycle and its client-side consistency model.
//!
//! - [`store::OrderStore`] - explicit state container, immutable snapshots out
//! - [`lifecycle::LifecycleManager`] - validated optimistic transitions
//! - [`stock::StockCoordinator`] - at-most-once stock deduction per order
//! - [`sync::PollingSynchronizer`] - per-viewer polling and reconciliation
//! - [`elapsed::ElapsedTicker`] - once-per-second duration display updates

pub mod api;
pub mod config;
pub mod elapsed;
pub mod error;
pub mod lifecycle;
pub mod notice;
pub mod stock;
pub mod store;
pub mod sync;
pub mod tasks;

pub use api::{HttpClient, OrdersApi};
pub use config::ClientConfig;
pub use elapsed::ElapsedTicker;
pub use error::{ClientError, ClientResult};
pub use lifecycle::LifecycleManager;
pub use notice::Notice;
pub use stock::{DeductOutcome, StockCoordinator};
pub use store::OrderStore;
pub use sync::{PollingSynchronizer, Viewer};
pub use tasks::{BackgroundTasks, TaskKind};

// Re-export shared types for convenience
pub use shared::{ActorRole, Order, OrderItem, OrderStatus, RawOrder, StockItem};
