//! Order lifecycle module
//!
//! This module provides the pure pieces of the lifecycle manager:
//! - Transitions: validation and application of forward status changes
//! - Side effects: declared by transitions, executed by the client crate
//! - Elapsed time: display durations derived from stored timestamps

pub mod elapsed;
pub mod transition;

// Re-exports
pub use elapsed::{elapsed_for, format_elapsed};
pub use transition::{AppliedTransition, SideEffect, apply};
