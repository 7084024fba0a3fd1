//! Status propagator.
//!
//! Reacts to an order-updated signal: a root order mirrors its status
//! triple onto every child in one bulk update; a child order is a strict
//! no-op, since propagation is top-down only and never cascades.

use common::OrderId;
use order_store::OrderStore;

use crate::error::{FanOutError, Result};

/// Result of a propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// The signalled order is a child; zero writes were performed.
    SkippedChild,

    /// The root's status triple was mirrored onto its children.
    Applied {
        /// Number of children the bulk update touched. Children already
        /// at or beyond the root's status version are left alone.
        children_updated: u64,
    },
}

/// Mirrors root order status changes onto child orders.
pub struct StatusPropagator<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> StatusPropagator<S> {
    /// Creates a propagator over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Handles an order-updated signal for the given order.
    ///
    /// The bulk update carries the root's `status_version`, so an
    /// out-of-order or redelivered signal cannot overwrite state written
    /// by a newer one.
    #[tracing::instrument(skip(self))]
    pub async fn propagate(&self, order_id: OrderId) -> Result<PropagationOutcome> {
        let order = self
            .store
            .get(order_id)
            .await?
            .ok_or(FanOutError::OrderNotFound(order_id))?;

        if order.parent_id.is_some() {
            tracing::debug!("updated order is a child, nothing to propagate");
            metrics::counter!("propagation_skipped_children").increment(1);
            return Ok(PropagationOutcome::SkippedChild);
        }

        let children_updated = self
            .store
            .update_children_status(order.id, order.status, order.status_version)
            .await?;

        tracing::info!(children_updated, status = %order.status, "status propagated");
        metrics::counter!("propagation_children_updated").increment(children_updated);

        Ok(PropagationOutcome::Applied { children_updated })
    }
}
