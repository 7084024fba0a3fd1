//! Domain model for the marketplace order engine.
//!
//! This crate provides the data types shared by the fulfillment gate and
//! the order fan-out side:
//! - [`Cart`] and [`CartItem`] — the transient checkout context
//! - [`FulfillmentNetwork`] — the read-only location/option relationship graph
//! - [`Order`], [`LineItem`], and their monetary totals
//! - The order/payment/fulfillment status triple

pub mod cart;
pub mod network;
pub mod order;
pub mod status;

pub use cart::{Cart, CartItem, ShippingMethod};
pub use network::{
    FulfillmentNetwork, FulfillmentSet, InventoryItem, OptionOwnership, Seller, ServiceZone,
    ShippingOption, StockLocation,
};
pub use order::{LineItem, LineItemTotals, Order, OrderTotals};
pub use status::{FulfillmentStatus, OrderStatus, PaymentStatus, StatusParseError, StatusTriple};
