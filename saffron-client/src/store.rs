//! Order store
//!
//! The explicit state container the polling synchronizer owns. Viewers
//! read immutable snapshots; mutations go through a narrow API
//! (`apply_transition`, `merge_server_snapshot`) instead of ambient
//! shared state.
//!
//! # Reconciliation
//!
//! A locally-applied transition is optimistic until the server snapshot
//! catches up. Per order id, the merge keeps the local status while the
//! server still reports an older one, for at most `max_pending_polls`
//! polling cycles; after that the server wins unconditionally (it is
//! always eventually authoritative).

use crate::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::order::transition;
use shared::{ActorRole, AppliedTransition, Order, OrderStatus, RawOrder};
use std::collections::HashMap;

/// Optimistic transition awaiting server confirmation
#[derive(Debug, Clone)]
struct PendingTransition {
    /// Rank of the locally-applied status
    rank: u8,
    /// Polling cycles observed since the optimistic application
    polls_seen: u32,
}

#[derive(Debug, Clone)]
struct OrderEntry {
    order: Order,
    pending: Option<PendingTransition>,
}

/// State container for the order collection
#[derive(Debug)]
pub struct OrderStore {
    inner: RwLock<HashMap<i64, OrderEntry>>,
    max_pending_polls: u32,
}

impl OrderStore {
    /// Create an empty store
    pub fn new(max_pending_polls: u32) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            max_pending_polls,
        }
    }

    /// Immutable snapshot of all orders, sorted by id
    pub fn snapshot(&self) -> Vec<Order> {
        let inner = self.inner.read();
        let mut orders: Vec<Order> = inner.values().map(|e| e.order.clone()).collect();
        orders.sort_by_key(|o| o.id);
        orders
    }

    /// Look up a single order
    pub fn get(&self, order_id: i64) -> Option<Order> {
        self.inner.read().get(&order_id).map(|e| e.order.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Validate a transition through the pure engine and apply it
    /// optimistically. Rejection leaves the store unchanged. The caller
    /// consumes the declared side effect.
    pub fn apply_transition(
        &self,
        order_id: i64,
        target: OrderStatus,
        actor: ActorRole,
        now: DateTime<Utc>,
    ) -> ClientResult<AppliedTransition> {
        let mut inner = self.inner.write();
        let entry = inner
            .get_mut(&order_id)
            .ok_or_else(|| ClientError::NotFound(format!("order {}", order_id)))?;

        let applied = transition::apply(&entry.order, target, actor, now)?;
        entry.order = applied.order.clone();
        entry.pending = Some(PendingTransition {
            rank: target.rank(),
            polls_seen: 0,
        });
        Ok(applied)
    }

    /// Reconcile a full server snapshot with local optimistic state.
    ///
    /// Last poll wins for all fields; the one exception is an order with
    /// an unconfirmed optimistic transition, whose status (and lifecycle
    /// timestamps) are retained while the server lags and the bounded
    /// cycle count has not elapsed. Ids absent from the snapshot are
    /// dropped; the client never keeps orders the backend purged.
    pub fn merge_server_snapshot(&self, raw_orders: Vec<RawOrder>) {
        let mut inner = self.inner.write();
        let mut merged: HashMap<i64, OrderEntry> = HashMap::with_capacity(raw_orders.len());

        for raw in raw_orders {
            let server = raw.normalize();
            let id = server.id;

            let entry = match inner.remove(&id) {
                Some(mut local) => match local.pending.take() {
                    Some(mut pending) => {
                        pending.polls_seen += 1;
                        if server.status.rank() >= pending.rank {
                            // Server caught up (or moved beyond): it wins
                            OrderEntry {
                                order: server,
                                pending: None,
                            }
                        } else if pending.polls_seen >= self.max_pending_polls {
                            tracing::debug!(
                                order_id = id,
                                local = %local.order.status,
                                server = %server.status,
                                "Optimistic transition expired, yielding to server"
                            );
                            OrderEntry {
                                order: server,
                                pending: None,
                            }
                        } else {
                            // Retain the reconciled status, take every
                            // other field from the server
                            let mut order = server;
                            order.status = local.order.status;
                            order.started_at = local.order.started_at.or(order.started_at);
                            order.completed_at = local.order.completed_at.or(order.completed_at);
                            OrderEntry {
                                order,
                                pending: Some(pending),
                            }
                        }
                    }
                    None => OrderEntry {
                        order: server,
                        pending: None,
                    },
                },
                None => OrderEntry {
                    order: server,
                    pending: None,
                },
            };
            merged.insert(id, entry);
        }

        for dropped in inner.keys() {
            tracing::debug!(order_id = dropped, "Order absent from server snapshot, dropping");
        }
        *inner = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: i64, status: &str) -> RawOrder {
        serde_json::from_value(json!({
            "id": id,
            "status": status,
            "items": [{ "name": "Pasta", "quantity": 1, "price": 9.0 }],
            "customer_name": "Ana"
        }))
        .unwrap()
    }

    fn seeded_store(max_pending_polls: u32) -> OrderStore {
        let store = OrderStore::new(max_pending_polls);
        store.merge_server_snapshot(vec![raw(1, "Pending"), raw(2, "Cooking")]);
        store
    }

    // ========================================================================
    // Snapshot / lookup
    // ========================================================================

    #[test]
    fn test_snapshot_is_sorted_and_detached() {
        let store = seeded_store(3);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot[0].id < snapshot[1].id);

        // Mutating the snapshot does not touch the store
        let mut snapshot = snapshot;
        snapshot[0].customer_name = "changed".to_string();
        assert_eq!(store.get(1).unwrap().customer_name, "Ana");
    }

    // ========================================================================
    // Optimistic transitions
    // ========================================================================

    #[test]
    fn test_apply_transition_updates_store() {
        let store = seeded_store(3);
        let applied = store
            .apply_transition(1, OrderStatus::Cooking, ActorRole::Kitchen, Utc::now())
            .unwrap();
        assert!(applied.side_effect.is_some());
        assert_eq!(store.get(1).unwrap().status, OrderStatus::Cooking);
        assert!(store.get(1).unwrap().started_at.is_some());
    }

    #[test]
    fn test_rejected_transition_leaves_store_unchanged() {
        let store = seeded_store(3);
        let err = store
            .apply_transition(2, OrderStatus::Pending, ActorRole::Staff, Utc::now())
            .unwrap_err();
        assert!(matches!(err, ClientError::Lifecycle(_)));
        assert_eq!(store.get(2).unwrap().status, OrderStatus::Cooking);
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let store = seeded_store(3);
        let err = store
            .apply_transition(99, OrderStatus::Cooking, ActorRole::Kitchen, Utc::now())
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    // ========================================================================
    // Merge rule
    // ========================================================================

    #[test]
    fn test_optimistic_state_retained_while_server_lags() {
        let store = seeded_store(3);
        store
            .apply_transition(1, OrderStatus::Cooking, ActorRole::Kitchen, Utc::now())
            .unwrap();
        let started = store.get(1).unwrap().started_at;

        // Server still reports Pending: local Cooking is retained, other
        // fields follow the server
        let mut stale = raw(1, "Pending");
        stale.customer_name = Some("Renamed".to_string());
        store.merge_server_snapshot(vec![stale, raw(2, "Cooking")]);

        let order = store.get(1).unwrap();
        assert_eq!(order.status, OrderStatus::Cooking);
        assert_eq!(order.started_at, started);
        assert_eq!(order.customer_name, "Renamed");
    }

    #[test]
    fn test_optimistic_state_yields_after_bounded_polls() {
        let store = seeded_store(2);
        store
            .apply_transition(1, OrderStatus::Cooking, ActorRole::Kitchen, Utc::now())
            .unwrap();

        // First stale poll: retained
        store.merge_server_snapshot(vec![raw(1, "Pending")]);
        assert_eq!(store.get(1).unwrap().status, OrderStatus::Cooking);

        // Second stale poll reaches the bound: server wins
        store.merge_server_snapshot(vec![raw(1, "Pending")]);
        assert_eq!(store.get(1).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_server_at_or_beyond_local_clears_pending() {
        let store = seeded_store(3);
        store
            .apply_transition(1, OrderStatus::Cooking, ActorRole::Kitchen, Utc::now())
            .unwrap();

        // Server already reports Ready (another viewer advanced it)
        store.merge_server_snapshot(vec![raw(1, "Ready")]);
        assert_eq!(store.get(1).unwrap().status, OrderStatus::Ready);

        // No pending marker left: the next stale poll wins immediately
        store.merge_server_snapshot(vec![raw(1, "Cooking")]);
        assert_eq!(store.get(1).unwrap().status, OrderStatus::Cooking);
    }

    #[test]
    fn test_orders_absent_from_snapshot_are_dropped() {
        let store = seeded_store(3);
        store.merge_server_snapshot(vec![raw(2, "Ready")]);
        assert!(store.get(1).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_new_orders_are_inserted() {
        let store = seeded_store(3);
        store.merge_server_snapshot(vec![raw(1, "Pending"), raw(2, "Cooking"), raw(3, "Pending")]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(3).unwrap().status, OrderStatus::Pending);
    }
}
