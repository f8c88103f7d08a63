use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::OrderStatus;
use crate::product_actor::ProductError;
use crate::revenue_actor::RevenueError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock { product: String, requested: u32, available: u32 },
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Cannot move order with status {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
    #[error("Forbidden")]
    Forbidden,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError<OrderError>> for OrderError {
    fn from(e: FrameworkError<OrderError>) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Entity(e) => e,
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// A failed reservation surfaces on the order as the matching checkout error.
impl From<ProductError> for OrderError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(id) => OrderError::ProductNotFound(id),
            ProductError::InsufficientStock { product, requested, available } => {
                OrderError::InsufficientStock { product, requested, available }
            }
            ProductError::InvalidQuantity(qty) => OrderError::ValidationError(format!("Invalid quantity: {qty}")),
            e @ (ProductError::ValidationError(_) | ProductError::DuplicateSlug(_)) => {
                OrderError::ValidationError(e.to_string())
            }
            ProductError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}

impl From<RevenueError> for OrderError {
    fn from(e: RevenueError) -> Self {
        match e {
            RevenueError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}
