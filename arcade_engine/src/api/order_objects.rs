use nas_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderItem, OrderStatusType};

/// An order together with its line items. This is what checkout returns and what the order endpoints serve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl FullOrder {
    /// The sum of the line subtotals. Always equal to `order.total_amount`; recomputed here only so tests and
    /// callers can assert the invariant.
    pub fn computed_total(&self) -> Money {
        self.items.iter().map(|i| i.subtotal).sum()
    }
}

/// The result of a status transition: the status the order had before the change, and the order as persisted
/// after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderChanged {
    pub old_status: OrderStatusType,
    pub order: Order,
}
