use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus};
use super::actions::{OrderAction, StatusChange};
use super::error::OrderError;

impl Order {
    /// Owner cancellation. Status is checked before ownership.
    fn cancel(&mut self, requested_by: &str) -> Result<StatusChange, OrderError> {
        if !self.status.is_cancellable() {
            return Err(OrderError::IllegalTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }
        if !self.is_owned_by(requested_by) {
            return Err(OrderError::Forbidden);
        }
        Ok(self.transition(OrderStatus::Cancelled))
    }

    /// Admin status change. Any status may follow any other except that a
    /// cancelled order stays cancelled.
    fn set_status(&mut self, status: OrderStatus, admin_notes: Option<String>) -> Result<StatusChange, OrderError> {
        if self.status == OrderStatus::Cancelled && status != OrderStatus::Cancelled {
            return Err(OrderError::IllegalTransition { from: self.status, to: status });
        }
        if let Some(notes) = admin_notes {
            self.admin_notes = Some(notes);
        }
        Ok(self.transition(status))
    }

    fn transition(&mut self, status: OrderStatus) -> StatusChange {
        let previous = self.status;
        self.status = status;
        self.revision += 1;
        self.updated_at = Utc::now();
        info!(order_id = %self.id, from = %previous, to = %status, revision = self.revision, "Order status changed");
        StatusChange { previous, order: self.clone() }
    }
}

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = (); // Orders change only through actions
    type Action = OrderAction;
    type ActionResult = StatusChange;
    type Error = OrderError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new Order from already-reserved line items.
    ///
    /// The order starts as `Processing` and its total is the sum of the
    /// snapshot subtotals.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::ValidationError("No items".to_string()));
        }
        let total_price: Decimal = params.items.iter().map(|item| item.subtotal()).sum();
        let now = Utc::now();
        Ok(Self {
            id,
            user: params.user,
            items: params.items,
            shipping_address: params.shipping_address,
            total_price,
            status: OrderStatus::Processing,
            admin_notes: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), OrderError> {
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<StatusChange, OrderError> {
        match action {
            OrderAction::Cancel { requested_by } => self.cancel(&requested_by),
            OrderAction::SetStatus { status, admin_notes } => self.set_status(status, admin_notes),
        }
    }
}
