//! The fulfillment network read model.
//!
//! A [`FulfillmentNetwork`] is a snapshot of the relationship graph the
//! resolver and validator operate on: stock locations with their
//! fulfillment sets and service zones, shipping options with resolved
//! ownership, variant inventory placement, and product → seller links.
//! The caller assembles it from its own persistence; this crate only
//! reads it.

use std::collections::HashMap;

use common::{LocationId, ProductId, SellerId, ShippingOptionId, VariantId};
use serde::{Deserialize, Serialize};

/// Who a shipping option belongs to.
///
/// Ownership is resolved once, when the network snapshot is assembled,
/// so downstream code never sniffs for the presence of an ownership link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionOwnership {
    /// The option is owned by a single seller.
    SellerOwned {
        /// The owning seller.
        seller_id: SellerId,
    },

    /// A platform-level option with no single owner. It is attributable
    /// to a seller only through the cart's platform-option table.
    Platform,
}

/// A fulfillment method offered through one or more service zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: ShippingOptionId,
    pub name: String,
    pub ownership: OptionOwnership,
}

impl ShippingOption {
    /// Creates a seller-owned option.
    pub fn seller_owned(
        id: ShippingOptionId,
        name: impl Into<String>,
        seller_id: SellerId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            ownership: OptionOwnership::SellerOwned { seller_id },
        }
    }

    /// Creates a platform-owned option.
    pub fn platform(id: ShippingOptionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ownership: OptionOwnership::Platform,
        }
    }
}

/// A geographic zone of a fulfillment set listing the options served
/// through it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceZone {
    pub name: String,
    pub shipping_options: Vec<ShippingOptionId>,
}

impl ServiceZone {
    /// Creates a zone serving the given options.
    pub fn new(name: impl Into<String>, shipping_options: Vec<ShippingOptionId>) -> Self {
        Self {
            name: name.into(),
            shipping_options,
        }
    }
}

/// A named group of service zones attached to a stock location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentSet {
    pub name: String,
    pub service_zones: Vec<ServiceZone>,
}

impl FulfillmentSet {
    /// Creates a fulfillment set with the given zones.
    pub fn new(name: impl Into<String>, service_zones: Vec<ServiceZone>) -> Self {
        Self {
            name: name.into(),
            service_zones,
        }
    }

    /// Iterates over every option offered through this set.
    pub fn option_ids(&self) -> impl Iterator<Item = ShippingOptionId> + '_ {
        self.service_zones
            .iter()
            .flat_map(|zone| zone.shipping_options.iter().copied())
    }
}

/// A fulfillment-capable stock location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLocation {
    pub id: LocationId,
    pub name: String,
    pub fulfillment_sets: Vec<FulfillmentSet>,
}

impl StockLocation {
    /// Creates a location with the given fulfillment sets.
    pub fn new(
        id: LocationId,
        name: impl Into<String>,
        fulfillment_sets: Vec<FulfillmentSet>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            fulfillment_sets,
        }
    }
}

/// Placement of a variant's stock across locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Locations holding a level for this inventory item.
    pub location_levels: Vec<LocationId>,
}

impl InventoryItem {
    /// Creates an inventory item stocked at the given locations.
    pub fn at_locations(location_levels: Vec<LocationId>) -> Self {
        Self { location_levels }
    }
}

/// A seller (tenant) represented in the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
}

impl Seller {
    /// Creates a seller with a display name.
    pub fn new(id: SellerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Snapshot of the fulfillment relationship graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FulfillmentNetwork {
    locations: Vec<StockLocation>,
    options: HashMap<ShippingOptionId, ShippingOption>,
    inventory: HashMap<VariantId, Vec<InventoryItem>>,
    product_sellers: HashMap<ProductId, SellerId>,
    sellers: HashMap<SellerId, Seller>,
}

impl FulfillmentNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stock location.
    pub fn add_location(&mut self, location: StockLocation) -> &mut Self {
        self.locations.push(location);
        self
    }

    /// Appends a fulfillment set to an already-registered location.
    ///
    /// No-op when the location is unknown.
    pub fn add_fulfillment_set(&mut self, location_id: LocationId, set: FulfillmentSet) -> &mut Self {
        if let Some(location) = self.locations.iter_mut().find(|l| l.id == location_id) {
            location.fulfillment_sets.push(set);
        }
        self
    }

    /// Registers a shipping option.
    pub fn add_option(&mut self, option: ShippingOption) -> &mut Self {
        self.options.insert(option.id, option);
        self
    }

    /// Records an inventory item for a variant.
    pub fn add_inventory(&mut self, variant_id: VariantId, item: InventoryItem) -> &mut Self {
        self.inventory.entry(variant_id).or_default().push(item);
        self
    }

    /// Links a product to its owning seller.
    pub fn assign_product(&mut self, product_id: ProductId, seller_id: SellerId) -> &mut Self {
        self.product_sellers.insert(product_id, seller_id);
        self
    }

    /// Registers a seller.
    pub fn add_seller(&mut self, seller: Seller) -> &mut Self {
        self.sellers.insert(seller.id, seller);
        self
    }

    /// Returns all stock locations.
    pub fn locations(&self) -> &[StockLocation] {
        &self.locations
    }

    /// Looks up a location by id.
    pub fn location(&self, id: LocationId) -> Option<&StockLocation> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Looks up a shipping option by id.
    pub fn option(&self, id: ShippingOptionId) -> Option<&ShippingOption> {
        self.options.get(&id)
    }

    /// Returns the inventory items recorded for a variant.
    pub fn inventory_of(&self, variant_id: &VariantId) -> &[InventoryItem] {
        self.inventory
            .get(variant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the seller owning a product, if known.
    pub fn seller_of_product(&self, product_id: &ProductId) -> Option<SellerId> {
        self.product_sellers.get(product_id).copied()
    }

    /// Looks up a seller by id.
    pub fn seller(&self, id: SellerId) -> Option<&Seller> {
        self.sellers.get(&id)
    }
}
