//! Lifecycle manager
//!
//! Ties the store, the API client and the stock coordinator together for
//! locally-initiated status changes:
//!
//! 1. The pure transition engine validates the request and it is applied
//!    optimistically to the store (rejection never reaches the network).
//! 2. The status PATCH is pushed to the backend. A failure keeps the
//!    optimistic state; reconciliation discards it after the bounded
//!    polling window if the backend never caught up.
//! 3. A declared stock deduction runs exactly once per order. A failure
//!    is surfaced as a notice and the status transition is NOT rolled
//!    back (best-effort stock, documented inconsistency).

use crate::api::OrdersApi;
use crate::notice::{NOTICE_CHANNEL_CAPACITY, Notice};
use crate::stock::{DeductOutcome, StockCoordinator};
use crate::store::OrderStore;
use crate::{ClientError, ClientResult};
use chrono::Utc;
use shared::order::SideEffect;
use shared::{ActorRole, LifecycleError, Order, OrderStatus};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Order lifecycle manager
pub struct LifecycleManager {
    api: Arc<dyn OrdersApi>,
    store: Arc<OrderStore>,
    stock: StockCoordinator,
    notice_tx: broadcast::Sender<Notice>,
}

impl LifecycleManager {
    pub fn new(api: Arc<dyn OrdersApi>, store: Arc<OrderStore>) -> Self {
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            stock: StockCoordinator::new(api.clone()),
            api,
            store,
            notice_tx,
        }
    }

    /// Subscribe to user-facing notices
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }

    /// Notice sender, shared with the polling synchronizer
    pub fn notice_sender(&self) -> broadcast::Sender<Notice> {
        self.notice_tx.clone()
    }

    /// The state container viewers read from
    pub fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    /// The stock coordinator (exposed for session inspection)
    pub fn stock(&self) -> &StockCoordinator {
        &self.stock
    }

    fn notify(&self, notice: Notice) {
        // No receivers is fine; everything is logged regardless
        let _ = self.notice_tx.send(notice);
    }

    /// Request a status transition for an order.
    ///
    /// Returns the optimistically-updated order. Invalid transitions are
    /// rejected before any network call and leave the store unchanged.
    pub async fn request_transition(
        &self,
        order_id: i64,
        target: OrderStatus,
        actor: ActorRole,
    ) -> ClientResult<Order> {
        let request_id = Uuid::new_v4();
        let applied = self
            .store
            .apply_transition(order_id, target, actor, Utc::now())?;

        tracing::info!(
            request_id = %request_id,
            order_id,
            to = %target,
            actor = %actor,
            "Status transition applied optimistically"
        );

        // Push the transition; optimistic state is kept on failure and
        // reconciled by the next polls.
        if let Err(e) = self
            .api
            .update_status(order_id, target, applied.order.staff_id)
            .await
        {
            tracing::warn!(
                request_id = %request_id,
                order_id,
                error = %e,
                "Status update not acknowledged by backend"
            );
            self.notify(Notice::StatusSyncFailed {
                order_id,
                detail: e.to_string(),
            });
        }

        // Consume the declared side effect
        if applied.side_effect == Some(SideEffect::ReduceStock) {
            match self
                .stock
                .deduct(order_id, applied.order.items.clone())
                .await
            {
                Ok(DeductOutcome::Deducted) | Ok(DeductOutcome::AlreadyDeducted) => {}
                Err(e) => {
                    // The status transition stays applied; inventory
                    // drift is surfaced, not patched.
                    tracing::warn!(request_id = %request_id, order_id, error = %e, "Failed to reduce stock");
                    self.notify(Notice::StockDeductionFailed {
                        order_id,
                        detail: e.to_string(),
                    });
                }
            }
        }

        Ok(applied.order)
    }

    /// One-button forward step: advance the order to its next status.
    pub async fn advance(&self, order_id: i64, actor: ActorRole) -> ClientResult<Order> {
        let order = self
            .store
            .get(order_id)
            .ok_or_else(|| ClientError::NotFound(format!("order {}", order_id)))?;

        let target = order.status.next().ok_or(ClientError::Lifecycle(
            LifecycleError::InvalidTransition {
                from: order.status,
                requested: order.status,
            },
        ))?;

        self.request_transition(order_id, target, actor).await
    }
}
