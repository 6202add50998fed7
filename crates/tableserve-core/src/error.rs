//! Ordering error types.

use tableserve_cache::CacheError;
use thiserror::Error;

/// Errors that can occur in cart, checkout and order-history operations.
#[derive(Error, Debug)]
pub enum OrderingError {
    /// Reading or writing the key-value store failed.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] CacheError),

    /// An order with this identifier is already recorded.
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(String),

    /// No order with this identifier is recorded.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Could not find a free order identifier.
    #[error("No unused order id after {0} attempts")]
    IdSpaceExhausted(u32),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Price is missing, malformed or not positive.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout needs at least one line item.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Table number outside the floor plan.
    #[error("Invalid table: {0}")]
    InvalidTable(u32),

    /// Table merge not possible.
    #[error("Invalid table merge: {0}")]
    InvalidTableMerge(String),

    /// Extra not present in the catalog.
    #[error("Unknown extra: {0}")]
    UnknownExtra(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrderingError {
    /// Whether the user can simply try the same action again.
    pub fn is_retryable(&self) -> bool {
        match self {
            OrderingError::Persistence(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for OrderingError {
    fn from(e: serde_json::Error) -> Self {
        OrderingError::Persistence(CacheError::SerializeError(e))
    }
}
