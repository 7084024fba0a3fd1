//! Order lifecycle signals and their dispatcher.

use common::OrderId;
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::propagator::{PropagationOutcome, StatusPropagator};
use crate::splitter::{FanOutSplitter, SplitConfig, SplitOutcome};

/// A lifecycle signal emitted after an order fact has been committed.
///
/// Signals are fire-and-forget reactions to already-committed facts:
/// delivery is at-least-once with no ordering guarantee across distinct
/// orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderSignal {
    /// An order was placed; fan it out into child orders.
    Placed { order_id: OrderId },

    /// An order's status fields changed; mirror them onto children.
    Updated { order_id: OrderId },
}

impl OrderSignal {
    /// Returns the id of the order this signal concerns.
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderSignal::Placed { order_id } | OrderSignal::Updated { order_id } => *order_id,
        }
    }
}

/// What a dispatched signal did.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalOutcome {
    Split(SplitOutcome),
    Propagated(PropagationOutcome),
}

/// Routes order signals to the splitter and propagator.
pub struct SignalDispatcher<S: OrderStore + Clone> {
    splitter: FanOutSplitter<S>,
    propagator: StatusPropagator<S>,
}

impl<S: OrderStore + Clone> SignalDispatcher<S> {
    /// Creates a dispatcher with the default split configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SplitConfig::default())
    }

    /// Creates a dispatcher with an explicit split configuration.
    pub fn with_config(store: S, config: SplitConfig) -> Self {
        Self {
            splitter: FanOutSplitter::with_config(store.clone(), config),
            propagator: StatusPropagator::new(store),
        }
    }

    /// Handles one signal.
    ///
    /// Errors mean the signal was not consumed and should be redelivered
    /// by the transport; both handlers tolerate redelivery.
    #[tracing::instrument(skip(self), fields(order_id = %signal.order_id()))]
    pub async fn handle(&self, signal: OrderSignal) -> Result<SignalOutcome> {
        match signal {
            OrderSignal::Placed { order_id } => {
                Ok(SignalOutcome::Split(self.splitter.split(order_id).await?))
            }
            OrderSignal::Updated { order_id } => Ok(SignalOutcome::Propagated(
                self.propagator.propagate(order_id).await?,
            )),
        }
    }
}
