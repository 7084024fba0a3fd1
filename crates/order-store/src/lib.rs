//! Order persistence for the marketplace order engine.
//!
//! The [`OrderStore`] trait is the only mutation path for orders and
//! child orders. Multi-row writes (child fan-out, status propagation)
//! are atomic: either every row is written or none is.
//!
//! Two implementations are provided:
//! - [`InMemoryOrderStore`] for tests
//! - [`PostgresOrderStore`] backed by sqlx

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::{OrderStore, validate_children_for_insert};
