//! Shipping feasibility and selection validation for multi-seller carts.
//!
//! This crate is the read-only checkout gate:
//! - [`LocationOptionIndex`] — pure lookups over the fulfillment network
//! - [`resolve_shipping_candidates`] — per-seller feasible shipping options
//! - [`validate_shipping_selection`] — the pre-checkout selection gate
//!
//! Nothing here performs I/O or holds locks; callers load a
//! [`domain::FulfillmentNetwork`] snapshot and pass it in.

pub mod error;
pub mod index;
pub mod resolver;
pub mod validator;

pub use error::ShippingValidationError;
pub use index::LocationOptionIndex;
pub use resolver::{SellerCandidates, ShippingOptionCandidate, resolve_shipping_candidates};
pub use validator::{ValidatedSelection, validate_shipping_selection};
