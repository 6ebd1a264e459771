//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::cart::CartItem;

/// Immutable once placed; status transitions are the only mutation and are
/// performed by admins. Line items are a denormalized snapshot, so later
/// product edits or deletions cannot corrupt historical orders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    /// Formatted creation time for display.
    pub date: String,
    pub created_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub payment_method: String,
    pub transaction_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Completed and Cancelled admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Lenient decode for records; unknown values fall back to Pending.
    pub fn parse(value: &str) -> Self {
        match value {
            "Processing" => Self::Processing,
            "Completed" => Self::Completed,
            "Cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}
