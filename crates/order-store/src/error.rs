//! Order store error types.

use common::OrderId;
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// The order was not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// An order with this id already exists.
    #[error("Order already exists: {0}")]
    OrderExists(OrderId),

    /// Children may only be attached to a root order.
    #[error("Order {0} is a child order and cannot receive children")]
    ParentIsChild(OrderId),

    /// The root already has children attached. Surfaced so a racing
    /// fan-out run can treat its loss as a no-op.
    #[error("Order {order_id} already has {children} child orders")]
    ChildrenExist { order_id: OrderId, children: usize },

    /// A child order failed the pre-insert checks.
    #[error("Invalid child order {order_id}: {reason}")]
    InvalidChild { order_id: OrderId, reason: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored status string could not be parsed.
    #[error("Status parse error: {0}")]
    Status(#[from] domain::StatusParseError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
