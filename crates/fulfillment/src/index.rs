//! Pure lookup helpers over the fulfillment network.

use std::collections::HashSet;

use common::{LocationId, ProductId, SellerId, ShippingOptionId};
use domain::{CartItem, FulfillmentNetwork, OptionOwnership};

/// Index resolving cart items to locations and locations to options.
///
/// All lookups are pure functions over the already-loaded network
/// snapshot; absent relationships yield empty sets, never errors.
#[derive(Debug, Clone, Copy)]
pub struct LocationOptionIndex<'a> {
    network: &'a FulfillmentNetwork,
}

impl<'a> LocationOptionIndex<'a> {
    /// Creates an index over a network snapshot.
    pub fn new(network: &'a FulfillmentNetwork) -> Self {
        Self { network }
    }

    /// Returns the stock locations that can physically fulfill an item.
    ///
    /// Walks variant -> inventory items -> location levels.
    pub fn locations_of(&self, item: &CartItem) -> HashSet<LocationId> {
        self.network
            .inventory_of(&item.variant_id)
            .iter()
            .flat_map(|inv| inv.location_levels.iter().copied())
            .collect()
    }

    /// Returns the shipping options offered through a location.
    ///
    /// Walks location -> fulfillment sets -> service zones -> options.
    pub fn options_of(&self, location_id: LocationId) -> HashSet<ShippingOptionId> {
        self.network
            .location(location_id)
            .map(|location| {
                location
                    .fulfillment_sets
                    .iter()
                    .flat_map(|set| set.option_ids())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the governing boundary of an option: every location whose
    /// fulfillment sets offer it.
    pub fn boundary_of(&self, option_id: ShippingOptionId) -> HashSet<LocationId> {
        self.network
            .locations()
            .iter()
            .filter(|location| {
                location
                    .fulfillment_sets
                    .iter()
                    .flat_map(|set| set.option_ids())
                    .any(|id| id == option_id)
            })
            .map(|location| location.id)
            .collect()
    }

    /// Returns the resolved ownership of an option, if it is known.
    pub fn ownership_of(&self, option_id: ShippingOptionId) -> Option<OptionOwnership> {
        self.network.option(option_id).map(|o| o.ownership)
    }

    /// Returns the seller owning a product, if any.
    pub fn seller_of_product(&self, product_id: &ProductId) -> Option<SellerId> {
        self.network.seller_of_product(product_id)
    }
}
