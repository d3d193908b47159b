//! Polling synchronizer
//!
//! There is no push channel from the backend: every viewer converges by
//! polling the full order collection on its own fixed interval and
//! reconciling the snapshot into the shared [`OrderStore`]. A failed
//! poll logs, emits a notice and leaves the previous snapshot in place
//! until the next scheduled tick; there is no retry storm.
//!
//! The kitchen viewer additionally polls the stock ledger and keeps a
//! low-stock alert list, the way the kitchen dashboard always has.

use crate::api::OrdersApi;
use crate::config::ClientConfig;
use crate::notice::Notice;
use crate::store::OrderStore;
use crate::tasks::{BackgroundTasks, TaskKind};
use parking_lot::RwLock;
use shared::StockItem;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

/// Independently-polling screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewer {
    /// Kitchen status board
    Kitchen,
    /// Staff order-taking screen
    Staff,
    /// Admin dashboard
    Admin,
}

impl Viewer {
    pub fn task_name(&self) -> &'static str {
        match self {
            Viewer::Kitchen => "kitchen_poller",
            Viewer::Staff => "staff_poller",
            Viewer::Admin => "admin_poller",
        }
    }
}

impl fmt::Display for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Viewer::Kitchen => write!(f, "kitchen"),
            Viewer::Staff => write!(f, "staff"),
            Viewer::Admin => write!(f, "admin"),
        }
    }
}

/// Periodic full-collection refresh per viewer
pub struct PollingSynchronizer {
    api: Arc<dyn OrdersApi>,
    store: Arc<OrderStore>,
    config: ClientConfig,
    notice_tx: broadcast::Sender<Notice>,
    stock_snapshot: Arc<RwLock<Vec<StockItem>>>,
}

impl PollingSynchronizer {
    pub fn new(
        api: Arc<dyn OrdersApi>,
        store: Arc<OrderStore>,
        config: ClientConfig,
        notice_tx: broadcast::Sender<Notice>,
    ) -> Self {
        Self {
            api,
            store,
            config,
            notice_tx,
            stock_snapshot: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Latest stock ledger snapshot (kitchen viewer keeps it fresh)
    pub fn stock_snapshot(&self) -> Vec<StockItem> {
        self.stock_snapshot.read().clone()
    }

    /// Names of stock items at or below their alert threshold
    pub fn low_stock(&self) -> Vec<String> {
        self.stock_snapshot
            .read()
            .iter()
            .filter(|item| item.is_low())
            .map(|item| item.name.clone())
            .collect()
    }

    /// Register the polling task for one viewer
    pub fn spawn(&self, tasks: &mut BackgroundTasks, viewer: Viewer) {
        let api = self.api.clone();
        let store = self.store.clone();
        let notice_tx = self.notice_tx.clone();
        let stock_snapshot = self.stock_snapshot.clone();
        let token = tasks.shutdown_token();
        let interval = self.config.poll_interval(viewer);

        tasks.spawn(viewer.task_name(), TaskKind::Poller, async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_low_stock: Vec<String> = Vec::new();

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                match api.fetch_orders().await {
                    Ok(raw_orders) => {
                        // A poll resolving after teardown must not touch
                        // disposed state
                        if token.is_cancelled() {
                            break;
                        }
                        tracing::debug!(viewer = %viewer, count = raw_orders.len(), "Poll merged");
                        store.merge_server_snapshot(raw_orders);
                    }
                    Err(e) => {
                        // Stale view until the next interval
                        tracing::warn!(viewer = %viewer, error = %e, "Poll failed");
                        let _ = notice_tx.send(Notice::PollFailed {
                            viewer,
                            detail: e.to_string(),
                        });
                        continue;
                    }
                }

                if viewer == Viewer::Kitchen {
                    match api.fetch_stock().await {
                        Ok(stock) => {
                            if token.is_cancelled() {
                                break;
                            }
                            let low: Vec<String> = stock
                                .iter()
                                .filter(|item| item.is_low())
                                .map(|item| item.name.clone())
                                .collect();
                            *stock_snapshot.write() = stock;
                            if !low.is_empty() && low != last_low_stock {
                                let _ = notice_tx.send(Notice::LowStock { items: low.clone() });
                            }
                            last_low_stock = low;
                        }
                        Err(e) => {
                            tracing::warn!(viewer = %viewer, error = %e, "Stock poll failed");
                        }
                    }
                }
            }

            tracing::debug!(viewer = %viewer, "Polling loop stopped");
        });
    }
}
