//! Fan-out error types.

use common::OrderId;
use order_store::OrderStoreError;
use thiserror::Error;

/// Errors that can occur while splitting orders or propagating status.
///
/// Store failures roll the enclosing write back entirely; the triggering
/// signal should be considered unconsumed and retried by the transport.
#[derive(Debug, Error)]
pub enum FanOutError {
    /// The signalled order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order-placed signal named a child order.
    #[error("Order {0} is not a root order")]
    NotARoot(OrderId),

    /// The split found line items without a resolvable seller and the
    /// configured policy rejects them.
    #[error("Order {order_id} has {count} line items with no resolvable seller")]
    UnassignedItems { order_id: OrderId, count: usize },

    /// An order store error occurred.
    #[error("Order store error: {0}")]
    Store(#[from] OrderStoreError),
}

/// Result type for fan-out operations.
pub type Result<T> = std::result::Result<T, FanOutError>;
