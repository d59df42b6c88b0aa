use rust_decimal::Decimal;

use crate::domain::identity::{CustomerId, OrderId};
use super::value_objects::{OrderStatus, Transition};

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Amount cannot be negative: {0}")]
    InvalidAmount(Decimal),

    #[error("Cannot add money with different currencies: {left} and {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("Amount in {0} exceeds the representable range")]
    AmountOverflow(String),

    #[error("Product name cannot be empty")]
    InvalidProductName,

    #[error("Quantity must be positive: {0}")]
    InvalidQuantity(i32),

    #[error("Order must have at least one item")]
    EmptyOrder,

    #[error("Cannot {transition} order in status {status}: {reason}")]
    InvalidTransition {
        transition: Transition,
        status: OrderStatus,
        reason: &'static str,
    },

    #[error("Stored order in status {0} has no confirmation time")]
    MissingConfirmationTime(OrderStatus),
}

// ============================================================================
// Order Command Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderCommandError {
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Payment processing failed for order: {0}")]
    PaymentFailed(OrderId),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
