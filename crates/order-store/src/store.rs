//! The `OrderStore` trait.

use async_trait::async_trait;
use common::OrderId;
use domain::{Order, StatusTriple};

use crate::error::{OrderStoreError, Result};

/// Persistence interface for orders and child orders.
///
/// Implementations must make [`insert_children`](OrderStore::insert_children)
/// and [`update_children_status`](OrderStore::update_children_status)
/// atomic: a failure leaves no partial fan-out and no half-updated
/// status triple.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads an order with its line items.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Inserts a single order (used to seed root orders).
    async fn insert(&self, order: Order) -> Result<()>;

    /// Returns every child of the given root order.
    async fn children_of(&self, root_id: OrderId) -> Result<Vec<Order>>;

    /// Atomically inserts a batch of child orders under a root.
    ///
    /// Fails without writing anything when the root does not exist, is
    /// itself a child, already has children (checked atomically with the
    /// insert, so concurrent fan-outs of one root cannot both succeed),
    /// or any child fails the pre-insert checks.
    async fn insert_children(&self, root_id: OrderId, children: Vec<Order>) -> Result<()>;

    /// Bulk-updates the status triple on every child of a root whose
    /// `status_version` is older than `version`.
    ///
    /// Returns the number of children updated. Children at or beyond
    /// `version` are left untouched, so a stale propagation run cannot
    /// clobber newer state.
    async fn update_children_status(
        &self,
        root_id: OrderId,
        status: StatusTriple,
        version: i64,
    ) -> Result<u64>;

    /// Sets an order's status triple and bumps its `status_version`.
    ///
    /// Returns the new version. This is the producer side of status
    /// propagation: callers update the root here, then emit an
    /// order-updated signal.
    async fn update_status(&self, id: OrderId, status: StatusTriple) -> Result<i64>;
}

/// Validates a batch of children before insertion.
///
/// Every child must point at the given root and carry a seller scope.
/// Shared by the store implementations so both enforce the same
/// single-level parent invariant.
pub fn validate_children_for_insert(root_id: OrderId, children: &[Order]) -> Result<()> {
    for child in children {
        if child.parent_id != Some(root_id) {
            return Err(OrderStoreError::InvalidChild {
                order_id: child.id,
                reason: format!(
                    "parent_id {:?} does not reference root {root_id}",
                    child.parent_id
                ),
            });
        }
        if child.store_id.is_none() {
            return Err(OrderStoreError::InvalidChild {
                order_id: child.id,
                reason: "child order has no seller scope".to_string(),
            });
        }
    }
    Ok(())
}
