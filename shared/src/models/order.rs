//! Order Model
//!
//! Canonical order shape plus the tolerant `RawOrder` ingestion type.
//! The backend stores `items` either as a JSON array or as a serialized
//! string encoding of the same array; both are normalized into
//! `Vec<OrderItem>` here, and a payload that fails to decode degrades to
//! an empty item list instead of an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Customer name used when the payload carries none.
pub const DEFAULT_CUSTOMER_NAME: &str = "Guest";

/// Order status (kitchen progress, strictly forward)
///
/// `Pending` and `StartedPreparing` are equivalent entry states: both sit
/// at rank 0 and transition identically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(rename = "Started Preparing")]
    StartedPreparing,
    Cooking,
    Ready,
    Completed,
}

impl OrderStatus {
    /// Position in the forward sequence. Both entry states share rank 0.
    pub fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending | OrderStatus::StartedPreparing => 0,
            OrderStatus::Cooking => 1,
            OrderStatus::Ready => 2,
            OrderStatus::Completed => 3,
        }
    }

    /// Entry states accept the same transitions.
    pub fn is_entry(&self) -> bool {
        self.rank() == 0
    }

    /// Completed orders accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// The single forward step (the advance button in the kitchen views).
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending | OrderStatus::StartedPreparing => Some(OrderStatus::Cooking),
            OrderStatus::Cooking => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Wire string, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::StartedPreparing => "Started Preparing",
            OrderStatus::Cooking => "Cooking",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actor role requesting a transition (informational, logged only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Kitchen,
    Staff,
    Admin,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Kitchen => write!(f, "kitchen"),
            ActorRole::Staff => write!(f, "staff"),
            ActorRole::Admin => write!(f, "admin"),
        }
    }
}

fn default_quantity() -> i32 {
    1
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    /// Quantity (>= 1 after normalization)
    #[serde(default = "default_quantity", alias = "qty")]
    pub quantity: i32,
    /// Price in currency unit (>= 0 after normalization)
    #[serde(default)]
    pub price: f64,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: i32, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Clamp quantity/price into their documented ranges.
    fn clamped(mut self) -> Self {
        self.quantity = self.quantity.max(1);
        self.price = self.price.max(0.0);
        self
    }
}

/// Order entity (canonical, post-normalization)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    /// Table reference (dine-in only)
    pub table_id: Option<i64>,
    pub table_number: Option<String>,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    /// Single source of truth for kitchen progress
    pub status: OrderStatus,
    /// Assigned staff member
    pub staff_id: Option<i64>,
    pub staff_name: Option<String>,
    /// Set exactly once, on first entry into Cooking
    pub started_at: Option<DateTime<Utc>>,
    /// Set exactly once, on entry into Completed
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw order as the backend returns it
///
/// Field names arrive in both snake_case and camelCase depending on the
/// endpoint, and `items` may be a native array, a string-encoded array,
/// or missing. [`RawOrder::normalize`] resolves all of that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrder {
    pub id: i64,
    #[serde(default, alias = "tableId")]
    pub table_id: Option<i64>,
    /// Arrives as either a string or a number
    #[serde(default, alias = "tableNumber", alias = "table", alias = "tableNo")]
    pub table_number: Option<Value>,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "staffId")]
    pub staff_id: Option<i64>,
    #[serde(default, alias = "staffName")]
    pub staff_name: Option<String>,
    #[serde(default, alias = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Item list element as it appears on the wire: either a structured
/// `{name, quantity, price}` object or a bare item name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawItem {
    Structured(OrderItem),
    Name(String),
}

impl RawItem {
    fn into_item(self) -> OrderItem {
        match self {
            RawItem::Structured(item) => item.clamped(),
            RawItem::Name(name) => OrderItem::new(name, 1, 0.0),
        }
    }
}

/// Decode the heterogeneous `items` field. Failure is a recoverable
/// condition: the order stays displayable with an empty item list.
fn decode_items(order_id: i64, value: Value) -> Vec<OrderItem> {
    let decoded = match value {
        Value::Null => return Vec::new(),
        Value::Array(_) => serde_json::from_value::<Vec<RawItem>>(value),
        Value::String(text) => serde_json::from_str::<Vec<RawItem>>(&text),
        other => {
            tracing::warn!(
                order_id,
                kind = %json_kind(&other),
                "Unexpected items representation, treating as empty"
            );
            return Vec::new();
        }
    };

    match decoded {
        Ok(items) => items.into_iter().map(RawItem::into_item).collect(),
        Err(e) => {
            tracing::warn!(order_id, error = %e, "Malformed order items, treating as empty");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl RawOrder {
    /// Normalize a backend payload into the canonical [`Order`] shape.
    pub fn normalize(self) -> Order {
        let items = match self.items {
            Some(value) => decode_items(self.id, value),
            None => Vec::new(),
        };

        let customer_name = match self.customer_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_CUSTOMER_NAME.to_string(),
        };

        let table_number = self.table_number.and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Order {
            id: self.id,
            table_id: self.table_id,
            table_number,
            customer_name,
            items,
            status: self.status,
            staff_id: self.staff_id,
            staff_name: self.staff_name,
            started_at: self.started_at,
            completed_at: self.completed_at,
            created_at: self.created_at,
        }
    }
}

/// Update status payload (`PATCH /api/orders/{id}/status`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    pub staff_id: Option<i64>,
}
