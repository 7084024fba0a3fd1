//! Shipping feasibility resolver.
//!
//! For every seller represented in the uncovered portion of a cart, the
//! resolver computes the set of shipping options that can serve *all* of
//! that seller's items: the intersection of reachable locations across
//! the seller's items, then the union of options offered at those
//! locations, filtered to options attributable to the seller.

use std::collections::{BTreeMap, HashSet};

use common::{LocationId, SellerId, ShippingOptionId};
use domain::{Cart, CartItem, FulfillmentNetwork, OptionOwnership};
use serde::Serialize;

use crate::index::LocationOptionIndex;

/// A shipping option feasible for one seller's items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingOptionCandidate {
    pub option_id: ShippingOptionId,
    pub name: String,
    pub ownership: OptionOwnership,
}

/// The feasible options for one uncovered seller, annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerCandidates {
    pub seller_id: SellerId,
    pub seller_name: String,
    /// Empty when the seller's items share no common location — a
    /// feasibility gap, not an error.
    pub options: Vec<ShippingOptionCandidate>,
}

/// Resolves the feasible shipping options for every uncovered seller in
/// the cart.
///
/// Sellers whose items already have a selected shipping method are
/// excluded entirely. Absence of data never fails: unknown variants,
/// unowned products, and empty intersections all degrade to empty
/// candidate lists.
#[tracing::instrument(skip_all, fields(cart_id = %cart.id))]
pub fn resolve_shipping_candidates(
    cart: &Cart,
    network: &FulfillmentNetwork,
) -> BTreeMap<SellerId, SellerCandidates> {
    let index = LocationOptionIndex::new(network);

    let covered = covered_sellers(cart, &index);

    // Group items by owning seller, dropping covered sellers and items
    // whose product resolves to no seller.
    let mut groups: BTreeMap<SellerId, Vec<&CartItem>> = BTreeMap::new();
    for item in cart.items() {
        let Some(seller_id) = index.seller_of_product(&item.product_id) else {
            continue;
        };
        if covered.contains(&seller_id) {
            continue;
        }
        groups.entry(seller_id).or_default().push(item);
    }

    let mut candidates = BTreeMap::new();
    for (seller_id, items) in groups {
        let common_locations = common_locations(&items, &index);
        let options = feasible_options(seller_id, &common_locations, network, &index);

        if options.is_empty() {
            tracing::debug!(%seller_id, "no feasible shipping options for seller");
        }

        let seller_name = network
            .seller(seller_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| seller_id.to_string());

        candidates.insert(
            seller_id,
            SellerCandidates {
                seller_id,
                seller_name,
                options,
            },
        );
    }

    candidates
}

/// Sellers for whom a shipping method is already selected in the cart.
///
/// Each selected option is attributed directly through ownership or, for
/// platform options, through the cart's platform-option table.
fn covered_sellers(cart: &Cart, index: &LocationOptionIndex<'_>) -> HashSet<SellerId> {
    cart.shipping_methods()
        .iter()
        .filter_map(|method| {
            match index.ownership_of(method.option_id) {
                Some(OptionOwnership::SellerOwned { seller_id }) => Some(seller_id),
                _ => cart.platform_option_seller(method.option_id),
            }
        })
        .collect()
}

/// Intersection of reachable-location sets across all of a seller's items.
fn common_locations(
    items: &[&CartItem],
    index: &LocationOptionIndex<'_>,
) -> HashSet<LocationId> {
    let mut iter = items.iter();
    let Some(first) = iter.next() else {
        return HashSet::new();
    };

    let mut common = index.locations_of(first);
    for item in iter {
        if common.is_empty() {
            break;
        }
        let reachable = index.locations_of(item);
        common.retain(|location| reachable.contains(location));
    }
    common
}

/// Union of options over the common locations, filtered to options
/// attributable to the seller.
fn feasible_options(
    seller_id: SellerId,
    common_locations: &HashSet<LocationId>,
    network: &FulfillmentNetwork,
    index: &LocationOptionIndex<'_>,
) -> Vec<ShippingOptionCandidate> {
    let mut option_ids: Vec<ShippingOptionId> = common_locations
        .iter()
        .flat_map(|location| index.options_of(*location))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    option_ids.sort();

    let mut options = Vec::new();
    for option_id in option_ids {
        let Some(option) = network.option(option_id) else {
            continue;
        };
        let attributable = match option.ownership {
            OptionOwnership::SellerOwned { seller_id: owner } => owner == seller_id,
            // A platform option qualifies only when its governing
            // boundary serves every location the seller's items share.
            OptionOwnership::Platform => {
                let boundary = index.boundary_of(option_id);
                common_locations.iter().all(|l| boundary.contains(l))
            }
        };
        if attributable {
            options.push(ShippingOptionCandidate {
                option_id,
                name: option.name.clone(),
                ownership: option.ownership,
            });
        }
    }

    options
}
