//! User-facing notices
//!
//! Transient warnings surfaced to viewers as non-blocking toasts. A
//! notice never interrupts a polling loop and never blocks the caller;
//! views that care subscribe, everything is also logged.

use crate::sync::Viewer;

/// Notice broadcast channel capacity
pub const NOTICE_CHANNEL_CAPACITY: usize = 256;

/// Non-blocking warning for the user
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The backend did not acknowledge a status transition; the local
    /// optimistic state is kept until reconciliation discards it
    StatusSyncFailed { order_id: i64, detail: String },

    /// Stock deduction failed; the status transition already applied is
    /// NOT reverted (documented inconsistency, surfaced instead)
    StockDeductionFailed { order_id: i64, detail: String },

    /// A poll failed; the viewer keeps its stale snapshot until the next
    /// scheduled tick
    PollFailed { viewer: Viewer, detail: String },

    /// Stock ledger items at or below their alert threshold
    LowStock { items: Vec<String> },
}
