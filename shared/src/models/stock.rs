//! Stock Model
//!
//! The stock ledger is owned by the backend; the client only references
//! it and issues best-effort deductions keyed by order id.

use super::OrderItem;
use serde::{Deserialize, Serialize};

fn default_threshold() -> i32 {
    5
}

/// Stock ledger entry (external, referenced not owned)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    #[serde(alias = "item")]
    pub name: String,
    #[serde(alias = "quantity")]
    pub available_quantity: i32,
    /// Low-stock alert threshold (backend default is 5)
    #[serde(default = "default_threshold")]
    pub threshold: i32,
}

impl StockItem {
    pub fn is_low(&self) -> bool {
        self.available_quantity <= self.threshold
    }
}

/// Deduction payload (`POST /api/stock/reduce`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReduceRequest {
    pub items: Vec<OrderItem>,
}
