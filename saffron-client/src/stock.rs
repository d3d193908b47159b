//! Stock side-effect coordinator
//!
//! Executes the stock deduction declared by a `-> Cooking` transition at
//! most once per order for the lifetime of the client session. The id is
//! recorded when the attempt is made, so a retried transition whose first
//! network confirmation was lost never double-fires the deduction.
//!
//! A failed deduction is surfaced to the caller and the status transition
//! is NOT rolled back: best-effort stock, at-least-once status. The
//! resulting inventory drift is accepted, not silently patched.

use crate::api::OrdersApi;
use crate::{ClientError, ClientResult};
use dashmap::DashSet;
use shared::OrderItem;
use std::sync::Arc;

/// Outcome of a deduction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductOutcome {
    /// The deduction was sent to the backend
    Deducted,
    /// This order already had its deduction attempt this session
    AlreadyDeducted,
}

/// At-most-once stock deduction per order id
pub struct StockCoordinator {
    api: Arc<dyn OrdersApi>,
    /// Order ids already deducted (or attempted) this session
    deducted: DashSet<i64>,
}

impl StockCoordinator {
    pub fn new(api: Arc<dyn OrdersApi>) -> Self {
        Self {
            api,
            deducted: DashSet::new(),
        }
    }

    /// Deduct the order's items from the stock ledger, idempotently per
    /// order id.
    pub async fn deduct(&self, order_id: i64, items: Vec<OrderItem>) -> ClientResult<DeductOutcome> {
        // insert returns false when the id was already recorded
        if !self.deducted.insert(order_id) {
            tracing::debug!(order_id, "Stock already deducted this session, skipping");
            return Ok(DeductOutcome::AlreadyDeducted);
        }

        match self.api.reduce_stock(items).await {
            Ok(()) => {
                tracing::info!(order_id, "Stock reduced for cooking order");
                Ok(DeductOutcome::Deducted)
            }
            Err(e) => Err(ClientError::StockDeduction {
                order_id,
                source: Box::new(e),
            }),
        }
    }

    /// Whether an order already consumed its deduction attempt
    pub fn is_deducted(&self, order_id: i64) -> bool {
        self.deducted.contains(&order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::{OrderStatus, RawOrder, StockItem};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counts deduction calls; optionally fails them.
    #[derive(Default)]
    struct CountingApi {
        reduce_calls: AtomicUsize,
        fail_reduce: AtomicBool,
    }

    #[async_trait]
    impl OrdersApi for CountingApi {
        async fn fetch_orders(&self) -> ClientResult<Vec<RawOrder>> {
            Ok(vec![])
        }

        async fn update_status(
            &self,
            _order_id: i64,
            _status: OrderStatus,
            _staff_id: Option<i64>,
        ) -> ClientResult<()> {
            Ok(())
        }

        async fn reduce_stock(&self, _items: Vec<OrderItem>) -> ClientResult<()> {
            self.reduce_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reduce.load(Ordering::SeqCst) {
                Err(ClientError::Internal("stock service down".to_string()))
            } else {
                Ok(())
            }
        }

        async fn fetch_stock(&self) -> ClientResult<Vec<StockItem>> {
            Ok(vec![])
        }
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem::new("Pasta", 2, 9.0)]
    }

    #[tokio::test]
    async fn test_deduction_fires_once_per_order() {
        let api = Arc::new(CountingApi::default());
        let coordinator = StockCoordinator::new(api.clone());

        assert_eq!(
            coordinator.deduct(1, items()).await.unwrap(),
            DeductOutcome::Deducted
        );
        for _ in 0..3 {
            assert_eq!(
                coordinator.deduct(1, items()).await.unwrap(),
                DeductOutcome::AlreadyDeducted
            );
        }
        assert_eq!(api.reduce_calls.load(Ordering::SeqCst), 1);

        // Different order id is independent
        assert_eq!(
            coordinator.deduct(2, items()).await.unwrap(),
            DeductOutcome::Deducted
        );
        assert_eq!(api.reduce_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_attempt_still_counts() {
        let api = Arc::new(CountingApi::default());
        api.fail_reduce.store(true, Ordering::SeqCst);
        let coordinator = StockCoordinator::new(api.clone());

        let err = coordinator.deduct(7, items()).await.unwrap_err();
        assert!(matches!(err, ClientError::StockDeduction { order_id: 7, .. }));
        assert!(coordinator.is_deducted(7));

        // The retry does not reach the backend again
        api.fail_reduce.store(false, Ordering::SeqCst);
        assert_eq!(
            coordinator.deduct(7, items()).await.unwrap(),
            DeductOutcome::AlreadyDeducted
        );
        assert_eq!(api.reduce_calls.load(Ordering::SeqCst), 1);
    }
}
