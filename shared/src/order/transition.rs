//! Transition engine
//!
//! Pure function mapping (current order, requested status) to either an
//! applied transition or a rejection. No clock access (the caller passes
//! `now`) and no I/O: the stock deduction triggered by entering Cooking
//! is *declared* here and executed by the client crate.

use crate::error::{LifecycleError, LifecycleResult};
use crate::models::{ActorRole, Order, OrderStatus};
use chrono::{DateTime, Utc};

/// Side effect declared by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Deduct the order's items from the stock ledger (entry into Cooking)
    ReduceStock,
}

/// A validated, applied transition
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTransition {
    /// The order with its new status and timestamps
    pub order: Order,
    /// Declared side effect, if any
    pub side_effect: Option<SideEffect>,
}

/// Whether `from -> target` is one of the allowed forward steps.
fn is_allowed(from: OrderStatus, target: OrderStatus) -> bool {
    match target {
        OrderStatus::Cooking => from.is_entry(),
        OrderStatus::Ready => from == OrderStatus::Cooking,
        OrderStatus::Completed => from == OrderStatus::Ready,
        OrderStatus::Pending | OrderStatus::StartedPreparing => false,
    }
}

/// Validate and apply a status transition.
///
/// Allowed steps: `Pending|Started Preparing -> Cooking -> Ready ->
/// Completed`. Anything else (backward, skipping, duplicate, out of a
/// terminal state) is rejected with [`LifecycleError::InvalidTransition`]
/// naming both states, and the input order is left untouched.
///
/// The actor role is informational only; it is recorded in logs, never
/// used for authorization.
pub fn apply(
    order: &Order,
    target: OrderStatus,
    actor: ActorRole,
    now: DateTime<Utc>,
) -> LifecycleResult<AppliedTransition> {
    if !is_allowed(order.status, target) {
        return Err(LifecycleError::InvalidTransition {
            from: order.status,
            requested: target,
        });
    }

    let mut next = order.clone();
    next.status = target;

    let side_effect = match target {
        OrderStatus::Cooking => {
            // Set exactly once; an entry state carrying a stale timestamp
            // keeps it.
            if next.started_at.is_none() {
                next.started_at = Some(now);
            }
            Some(SideEffect::ReduceStock)
        }
        OrderStatus::Completed => {
            if next.started_at.is_none() {
                return Err(LifecycleError::MissingStartedAt { order_id: order.id });
            }
            if next.completed_at.is_none() {
                next.completed_at = Some(now);
            }
            None
        }
        _ => None,
    };

    tracing::debug!(
        order_id = order.id,
        from = %order.status,
        to = %target,
        actor = %actor,
        "Transition applied"
    );

    Ok(AppliedTransition {
        order: next,
        side_effect,
    })
}
