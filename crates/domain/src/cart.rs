//! The transient checkout cart.

use std::collections::HashMap;

use common::{CartId, ProductId, SellerId, ShippingOptionId, VariantId};
use serde::{Deserialize, Serialize};

/// A quantity of one product variant in a cart.
///
/// Immutable once added except for quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(
        product_id: impl Into<ProductId>,
        variant_id: impl Into<VariantId>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// A shipping method already selected in the cart, referencing one
/// shipping option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub option_id: ShippingOptionId,
}

/// Transient checkout context.
///
/// Created at checkout start, mutated as items and shipping selections
/// are added, consumed when the order is placed. The
/// platform-option table attributes platform-level shipping options to a
/// seller for this cart; it is typed and scoped to the checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    items: Vec<CartItem>,
    shipping_methods: Vec<ShippingMethod>,
    platform_option_sellers: HashMap<ShippingOptionId, SellerId>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            items: Vec::new(),
            shipping_methods: Vec::new(),
            platform_option_sellers: HashMap::new(),
        }
    }

    /// Adds an item to the cart.
    pub fn add_item(&mut self, item: CartItem) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Returns the cart items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Selects a shipping method for this cart.
    ///
    /// Returns false without modifying the cart when a method for the
    /// same option is already selected.
    pub fn select_shipping_method(&mut self, option_id: ShippingOptionId) -> bool {
        if self
            .shipping_methods
            .iter()
            .any(|m| m.option_id == option_id)
        {
            return false;
        }
        self.shipping_methods.push(ShippingMethod { option_id });
        true
    }

    /// Returns the selected shipping methods.
    pub fn shipping_methods(&self) -> &[ShippingMethod] {
        &self.shipping_methods
    }

    /// Attributes a platform-owned option to a seller for this cart.
    pub fn map_platform_option(
        &mut self,
        option_id: ShippingOptionId,
        seller_id: SellerId,
    ) -> &mut Self {
        self.platform_option_sellers.insert(option_id, seller_id);
        self
    }

    /// Returns the seller a platform option is attributed to, if mapped.
    pub fn platform_option_seller(&self, option_id: ShippingOptionId) -> Option<SellerId> {
        self.platform_option_sellers.get(&option_id).copied()
    }
}
