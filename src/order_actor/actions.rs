use crate::domain::{Order, OrderStatus};

/// Status operations on an order. The guard and the write run together in the
/// order actor, so two requests racing on one order observe each other's result.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Self-service cancellation by the owner.
    Cancel { requested_by: String },
    /// Administrative status change, optionally replacing the admin notes.
    SetStatus {
        status: OrderStatus,
        admin_notes: Option<String>,
    },
}

/// The order after a status change, plus the status it held before.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub previous: OrderStatus,
    pub order: Order,
}

impl StatusChange {
    pub fn entered_delivered(&self) -> bool {
        self.previous != OrderStatus::Delivered && self.order.status == OrderStatus::Delivered
    }

    pub fn left_delivered(&self) -> bool {
        self.previous == OrderStatus::Delivered && self.order.status != OrderStatus::Delivered
    }
}
