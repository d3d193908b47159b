//! Elapsed-time computation
//!
//! Display durations are a pure function of `(now, started_at,
//! completed_at, status)` so a once-per-second timer can recompute them
//! without a server round-trip, and a restarted timer produces identical
//! output for identical inputs.

use crate::models::{Order, OrderStatus};
use chrono::{DateTime, Duration, Utc};

/// Duration to display for an order, if any.
///
/// - Cooking: `now - started_at`, clamped at zero for clock skew
/// - Completed: `completed_at - started_at`, frozen
/// - Everything else: `None` (viewers render a placeholder)
pub fn elapsed_for(order: &Order, now: DateTime<Utc>) -> Option<Duration> {
    match order.status {
        OrderStatus::Cooking => order
            .started_at
            .map(|started| (now - started).max(Duration::zero())),
        OrderStatus::Completed => match (order.started_at, order.completed_at) {
            (Some(started), Some(completed)) => Some((completed - started).max(Duration::zero())),
            _ => None,
        },
        _ => None,
    }
}

/// Format a duration the way the kitchen board shows it: `"3m 42s"`.
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}m {}s", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_756_000_000 + secs, 0).unwrap()
    }

    fn order(status: OrderStatus, started: Option<i64>, completed: Option<i64>) -> Order {
        Order {
            id: 1,
            table_id: None,
            table_number: None,
            customer_name: "Guest".to_string(),
            items: vec![],
            status,
            staff_id: None,
            staff_name: None,
            started_at: started.map(t),
            completed_at: completed.map(t),
            created_at: None,
        }
    }

    #[test]
    fn test_cooking_elapsed_tracks_now_monotonically() {
        let cooking = order(OrderStatus::Cooking, Some(0), None);

        let mut previous = Duration::zero();
        for tick in 1..=5 {
            let elapsed = elapsed_for(&cooking, t(tick)).unwrap();
            assert_eq!(elapsed, Duration::seconds(tick));
            assert!(elapsed > previous);
            previous = elapsed;
        }
    }

    #[test]
    fn test_completed_elapsed_is_frozen() {
        let completed = order(OrderStatus::Completed, Some(0), Some(222));

        let frozen = elapsed_for(&completed, t(300)).unwrap();
        assert_eq!(frozen, Duration::seconds(222));
        // Further ticks do not move it
        assert_eq!(elapsed_for(&completed, t(10_000)).unwrap(), frozen);
    }

    #[test]
    fn test_other_states_have_no_duration() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::StartedPreparing,
            OrderStatus::Ready,
        ] {
            assert!(elapsed_for(&order(status, Some(0), None), t(60)).is_none());
        }
        // Missing timestamps never panic
        assert!(elapsed_for(&order(OrderStatus::Cooking, None, None), t(60)).is_none());
        assert!(elapsed_for(&order(OrderStatus::Completed, Some(0), None), t(60)).is_none());
    }

    #[test]
    fn test_clock_skew_clamps_at_zero() {
        let cooking = order(OrderStatus::Cooking, Some(100), None);
        assert_eq!(elapsed_for(&cooking, t(40)).unwrap(), Duration::zero());
    }

    #[test]
    fn test_format_matches_kitchen_board() {
        assert_eq!(format_elapsed(Duration::seconds(0)), "0m 0s");
        assert_eq!(format_elapsed(Duration::seconds(222)), "3m 42s");
        assert_eq!(format_elapsed(Duration::seconds(3661)), "61m 1s");
    }
}
