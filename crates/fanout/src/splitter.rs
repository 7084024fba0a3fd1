//! Order fan-out splitter.
//!
//! Reacts to an order-placed signal: groups the root order's line items
//! by owning seller, aggregates the monetary fields per group, and
//! persists one child order per seller in a single atomic write.

use std::collections::BTreeMap;

use common::{OrderId, SellerId};
use domain::{LineItem, Order};
use order_store::{OrderStore, OrderStoreError};

use crate::error::{FanOutError, Result};

/// What to do with line items whose product has no resolvable seller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnassignedItemPolicy {
    /// Leave seller-less items attached to the root only (no child is
    /// created for them).
    #[default]
    LeaveOnRoot,

    /// Fail the split with [`FanOutError::UnassignedItems`].
    Reject,
}

/// Splitter configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitConfig {
    pub unassigned_policy: UnassignedItemPolicy,
}

/// Result of a split run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Children were created, one per seller group.
    Split { children: Vec<OrderId> },

    /// The root already has children; redelivered signals are a no-op.
    AlreadySplit { children: usize },

    /// No line item resolved to a seller; nothing to fan out.
    NothingToSplit,
}

/// Splits root orders into seller-scoped child orders.
pub struct FanOutSplitter<S: OrderStore> {
    store: S,
    config: SplitConfig,
}

impl<S: OrderStore> FanOutSplitter<S> {
    /// Creates a splitter with the default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: SplitConfig::default(),
        }
    }

    /// Creates a splitter with an explicit configuration.
    pub fn with_config(store: S, config: SplitConfig) -> Self {
        Self { store, config }
    }

    /// Handles an order-placed signal for the given root order.
    ///
    /// Idempotent under at-least-once delivery: when children already
    /// exist the run is a no-op. A failed write leaves no partial
    /// fan-out behind.
    #[tracing::instrument(skip(self))]
    pub async fn split(&self, order_id: OrderId) -> Result<SplitOutcome> {
        let root = self
            .store
            .get(order_id)
            .await?
            .ok_or(FanOutError::OrderNotFound(order_id))?;

        if !root.is_root() {
            return Err(FanOutError::NotARoot(order_id));
        }

        let existing = self.store.children_of(order_id).await?;
        if !existing.is_empty() {
            tracing::info!(children = existing.len(), "root already split, skipping");
            metrics::counter!("fanout_duplicate_signals").increment(1);
            return Ok(SplitOutcome::AlreadySplit {
                children: existing.len(),
            });
        }

        let (groups, unassigned) = group_items_by_seller(&root.items);

        if unassigned > 0 {
            match self.config.unassigned_policy {
                UnassignedItemPolicy::Reject => {
                    return Err(FanOutError::UnassignedItems {
                        order_id,
                        count: unassigned,
                    });
                }
                UnassignedItemPolicy::LeaveOnRoot => {
                    tracing::warn!(count = unassigned, "line items without seller stay on root");
                }
            }
        }

        if groups.is_empty() {
            return Ok(SplitOutcome::NothingToSplit);
        }

        let children: Vec<Order> = groups
            .into_iter()
            .map(|(seller_id, items)| Order::child_of(&root, seller_id, items))
            .collect();
        let child_ids: Vec<OrderId> = children.iter().map(|c| c.id).collect();

        // The children_of check above is a fast path only; the store
        // re-checks under its own lock, so a concurrent run of the same
        // signal surfaces here and is absorbed as a no-op.
        match self.store.insert_children(root.id, children).await {
            Ok(()) => {}
            Err(OrderStoreError::ChildrenExist { children, .. }) => {
                tracing::info!(children, "lost split race to a concurrent signal, skipping");
                metrics::counter!("fanout_duplicate_signals").increment(1);
                return Ok(SplitOutcome::AlreadySplit { children });
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(children = child_ids.len(), "order fanned out");
        metrics::counter!("fanout_orders_split").increment(1);
        metrics::counter!("fanout_children_created").increment(child_ids.len() as u64);

        Ok(SplitOutcome::Split {
            children: child_ids,
        })
    }
}

/// Groups line items by owning seller.
///
/// Returns the deterministic per-seller groups and the number of items
/// with no resolvable seller.
fn group_items_by_seller(items: &[LineItem]) -> (BTreeMap<SellerId, Vec<LineItem>>, usize) {
    let mut groups: BTreeMap<SellerId, Vec<LineItem>> = BTreeMap::new();
    let mut unassigned = 0;

    for item in items {
        match item.seller_id {
            Some(seller_id) => groups.entry(seller_id).or_default().push(item.clone()),
            None => unassigned += 1,
        }
    }

    (groups, unassigned)
}
