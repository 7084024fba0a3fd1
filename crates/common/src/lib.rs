//! Shared types for the marketplace order engine.
//!
//! This crate provides the typed identifiers used across the cart,
//! fulfillment, and order crates, plus the [`Money`] value type used for
//! all monetary arithmetic.

pub mod ids;
pub mod money;

pub use ids::{CartId, LocationId, OrderId, ProductId, SellerId, ShippingOptionId, VariantId};
pub use money::Money;
