//! The reactive side of the marketplace order engine.
//!
//! Two short-lived, event-driven units of work:
//! - [`FanOutSplitter`] reacts to an order-placed signal and splits the
//!   root order into one seller-scoped child per seller group
//! - [`StatusPropagator`] reacts to an order-updated signal and mirrors
//!   the root's status triple onto its children
//!
//! [`SignalDispatcher`] binds both to [`OrderSignal`]s. Delivery is
//! assumed at-least-once: the splitter is idempotent and the propagator
//! is version-guarded, so redelivery and reordering are safe.

pub mod error;
pub mod propagator;
pub mod signal;
pub mod splitter;

pub use error::{FanOutError, Result};
pub use propagator::{PropagationOutcome, StatusPropagator};
pub use signal::{OrderSignal, SignalDispatcher, SignalOutcome};
pub use splitter::{FanOutSplitter, SplitConfig, SplitOutcome, UnassignedItemPolicy};
