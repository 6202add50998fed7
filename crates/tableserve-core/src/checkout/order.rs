//! Order types.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, PriceBreakdown};
use crate::checkout::CheckoutSnapshot;
use crate::ids::OrderId;
use crate::table::TableAssignment;

/// Minutes after placement when the kitchen starts on an order.
pub const PREPARING_AFTER_MINUTES: i64 = 5;
/// Minutes after placement when an order is expected to be ready.
pub const READY_ESTIMATE_MINUTES: i64 = 15;

/// Progress of an order, derived from its age. There is no kitchen feed,
/// so this is an estimate and never moves backwards for a later `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    Preparing,
    AlmostReady,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Received => "Order Received",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::AlmostReady => "Almost Ready",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A confirmed order. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Cart lines as they were when checkout began.
    pub items: Vec<CartLineItem>,
    pub created_at: DateTime<Utc>,
    /// Exact figures; round with [`PriceBreakdown::rounded`] for display.
    pub totals: PriceBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableAssignment>,
}

impl Order {
    /// Build an order from a frozen checkout snapshot.
    pub fn from_snapshot(
        id: OrderId,
        snapshot: &CheckoutSnapshot,
        table: Option<TableAssignment>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            items: snapshot.items.clone(),
            created_at,
            totals: snapshot.breakdown,
            table,
        }
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// When the kitchen is expected to start.
    pub fn preparing_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(PREPARING_AFTER_MINUTES)
    }

    /// When the order should be ready.
    pub fn estimated_ready_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(READY_ESTIMATE_MINUTES)
    }

    /// Estimated status at `now`. A `now` before placement counts as just received.
    pub fn status_at(&self, now: DateTime<Utc>) -> OrderStatus {
        if now >= self.estimated_ready_at() {
            OrderStatus::AlmostReady
        } else if now >= self.preparing_at() {
            OrderStatus::Preparing
        } else {
            OrderStatus::Received
        }
    }

    /// Code shown on the confirmation screen.
    pub fn short_code(&self) -> String {
        self.id.short_code()
    }
}
