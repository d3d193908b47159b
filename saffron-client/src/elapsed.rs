//! Elapsed-time ticker
//!
//! Drives the pure duration computation once per second and publishes
//! the display map through a watch channel. The ticker holds no state of
//! its own beyond the timer: restarting it at any point produces
//! identical output for identical store contents.

use crate::store::OrderStore;
use crate::tasks::{BackgroundTasks, TaskKind};
use chrono::{DateTime, Utc};
use shared::Order;
use shared::order::{elapsed_for, format_elapsed};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Display durations keyed by order id (`"3m 42s"`)
pub type ElapsedMap = HashMap<i64, String>;

/// Compute the display map for a set of orders at one instant.
///
/// Orders without a duration (neither Cooking nor Completed, or missing
/// timestamps) are absent from the map; viewers render a placeholder.
pub fn compute_display(orders: &[Order], now: DateTime<Utc>) -> ElapsedMap {
    orders
        .iter()
        .filter_map(|order| elapsed_for(order, now).map(|d| (order.id, format_elapsed(d))))
        .collect()
}

/// Once-per-second duration recomputation for a store
pub struct ElapsedTicker {
    store: Arc<OrderStore>,
    tick: Duration,
}

impl ElapsedTicker {
    pub fn new(store: Arc<OrderStore>, tick: Duration) -> Self {
        Self { store, tick }
    }

    /// Register the ticker task and return the display-map receiver.
    ///
    /// The loop ends when the last receiver is dropped or on shutdown.
    pub fn spawn(self, tasks: &mut BackgroundTasks) -> watch::Receiver<ElapsedMap> {
        let (tx, rx) = watch::channel(ElapsedMap::new());
        let token = tasks.shutdown_token();

        tasks.spawn("elapsed_ticker", TaskKind::Ticker, async move {
            let mut ticker = tokio::time::interval(self.tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let map = compute_display(&self.store.snapshot(), Utc::now());
                if tx.send(map).is_err() {
                    // All receivers gone; nothing left to display for
                    break;
                }
            }
        });

        rx
    }
}
