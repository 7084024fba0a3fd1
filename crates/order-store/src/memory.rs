//! In-memory order store implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::OrderId;
use domain::{Order, StatusTriple};
use tokio::sync::RwLock;

use crate::error::{OrderStoreError, Result};
use crate::store::{OrderStore, validate_children_for_insert};

/// In-memory order store.
///
/// Provides the same interface and atomicity guarantees as the
/// PostgreSQL implementation: multi-row writes happen under one write
/// lock, after all checks have passed.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    fail_next_children_insert: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Makes the next `insert_children` call fail before writing.
    ///
    /// Used in tests to prove that a failed fan-out leaves no partial
    /// children behind.
    pub fn set_fail_next_children_insert(&self, fail: bool) {
        self.fail_next_children_insert.store(fail, Ordering::SeqCst);
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(OrderStoreError::OrderExists(order.id));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn children_of(&self, root_id: OrderId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut children: Vec<Order> = orders
            .values()
            .filter(|o| o.parent_id == Some(root_id))
            .cloned()
            .collect();
        children.sort_by_key(|o| o.store_id);
        Ok(children)
    }

    async fn insert_children(&self, root_id: OrderId, children: Vec<Order>) -> Result<()> {
        validate_children_for_insert(root_id, &children)?;

        let mut orders = self.orders.write().await;

        let root = orders
            .get(&root_id)
            .ok_or(OrderStoreError::OrderNotFound(root_id))?;
        if !root.is_root() {
            return Err(OrderStoreError::ParentIsChild(root_id));
        }

        // Checked under the same write lock as the insert, so two racing
        // fan-outs of one root cannot both get past it.
        let existing = orders
            .values()
            .filter(|o| o.parent_id == Some(root_id))
            .count();
        if existing > 0 {
            return Err(OrderStoreError::ChildrenExist {
                order_id: root_id,
                children: existing,
            });
        }

        for child in &children {
            if orders.contains_key(&child.id) {
                return Err(OrderStoreError::OrderExists(child.id));
            }
        }

        if self.fail_next_children_insert.swap(false, Ordering::SeqCst) {
            return Err(OrderStoreError::Database(sqlx::Error::PoolClosed));
        }

        // All checks passed; write the whole batch.
        for child in children {
            orders.insert(child.id, child);
        }
        Ok(())
    }

    async fn update_children_status(
        &self,
        root_id: OrderId,
        status: StatusTriple,
        version: i64,
    ) -> Result<u64> {
        let mut orders = self.orders.write().await;
        let mut updated = 0;
        for order in orders.values_mut() {
            if order.parent_id == Some(root_id) && order.status_version < version {
                order.status = status;
                order.status_version = version;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn update_status(&self, id: OrderId, status: StatusTriple) -> Result<i64> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or(OrderStoreError::OrderNotFound(id))?;
        order.status = status;
        order.status_version += 1;
        Ok(order.status_version)
    }
}
