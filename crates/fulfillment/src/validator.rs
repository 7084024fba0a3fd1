//! Shipping selection validator — the pre-checkout gate.

use std::collections::HashSet;

use common::{SellerId, ShippingOptionId};
use domain::{Cart, FulfillmentNetwork, OptionOwnership};
use serde::Serialize;

use crate::error::ShippingValidationError;
use crate::index::LocationOptionIndex;

/// A validated shipping selection, partitioned by how each option was
/// attributed to a seller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedSelection {
    /// Options owned directly by a seller present in the cart.
    pub seller_owned: Vec<(ShippingOptionId, SellerId)>,

    /// Platform options attributed through the cart's platform-option
    /// table.
    pub admin_mapped: Vec<(ShippingOptionId, SellerId)>,

    /// Platform options with no attribution at all. Accepted, but
    /// surfaced so the caller can decide how to persist them.
    pub unattributed: Vec<ShippingOptionId>,
}

/// Validates the shipping options a buyer intends to check out with.
///
/// Rejects duplicated option ids and options that cannot be attributed
/// to any seller present in the cart. Purely a gate: no side effects.
#[tracing::instrument(skip(cart, network), fields(cart_id = %cart.id))]
pub fn validate_shipping_selection(
    cart: &Cart,
    network: &FulfillmentNetwork,
    option_ids: &[ShippingOptionId],
) -> Result<ValidatedSelection, ShippingValidationError> {
    let mut seen = HashSet::new();
    for option_id in option_ids {
        if !seen.insert(*option_id) {
            return Err(ShippingValidationError::DuplicateOption {
                option_id: *option_id,
            });
        }
    }

    let index = LocationOptionIndex::new(network);
    let cart_sellers: HashSet<SellerId> = cart
        .items()
        .iter()
        .filter_map(|item| index.seller_of_product(&item.product_id))
        .collect();

    let mut selection = ValidatedSelection::default();
    for &option_id in option_ids {
        match index.ownership_of(option_id) {
            Some(OptionOwnership::SellerOwned { seller_id }) => {
                if !cart_sellers.contains(&seller_id) {
                    return Err(ShippingValidationError::OptionNotAvailable { option_id });
                }
                selection.seller_owned.push((option_id, seller_id));
            }
            // Platform options and options missing from the snapshot are
            // attributed through the cart's platform-option table.
            Some(OptionOwnership::Platform) | None => {
                match cart.platform_option_seller(option_id) {
                    Some(seller_id) => {
                        if !cart_sellers.contains(&seller_id) {
                            return Err(ShippingValidationError::OptionNotAvailable { option_id });
                        }
                        selection.admin_mapped.push((option_id, seller_id));
                    }
                    None => {
                        tracing::warn!(
                            %option_id,
                            "selected platform option has no seller attribution"
                        );
                        selection.unattributed.push(option_id);
                    }
                }
            }
        }
    }

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::CartId;
    use domain::{CartItem, Seller, ShippingOption};

    struct Fixture {
        network: FulfillmentNetwork,
        cart: Cart,
        seller: SellerId,
        owned_option: ShippingOptionId,
    }

    fn fixture() -> Fixture {
        let seller = SellerId::new();
        let owned_option = ShippingOptionId::new();

        let mut network = FulfillmentNetwork::new();
        network
            .add_seller(Seller::new(seller, "Acme"))
            .add_option(ShippingOption::seller_owned(owned_option, "Standard", seller))
            .assign_product("PROD-1".into(), seller);

        let mut cart = Cart::new(CartId::new());
        cart.add_item(CartItem::new("PROD-1", "VAR-1", 1));

        Fixture {
            network,
            cart,
            seller,
            owned_option,
        }
    }

    #[test]
    fn duplicate_option_is_rejected() {
        let fx = fixture();
        let other = ShippingOptionId::new();

        let err = validate_shipping_selection(
            &fx.cart,
            &fx.network,
            &[fx.owned_option, other, fx.owned_option],
        )
        .unwrap_err();

        assert_eq!(
            err,
            ShippingValidationError::DuplicateOption {
                option_id: fx.owned_option
            }
        );
    }

    #[test]
    fn seller_owned_option_for_cart_seller_passes() {
        let fx = fixture();

        let selection =
            validate_shipping_selection(&fx.cart, &fx.network, &[fx.owned_option]).unwrap();

        assert_eq!(selection.seller_owned, vec![(fx.owned_option, fx.seller)]);
        assert!(selection.admin_mapped.is_empty());
        assert!(selection.unattributed.is_empty());
    }

    #[test]
    fn option_of_absent_seller_is_rejected() {
        let fx = fixture();
        let stranger = SellerId::new();
        let foreign_option = ShippingOptionId::new();
        let mut network = fx.network.clone();
        network.add_option(ShippingOption::seller_owned(
            foreign_option,
            "Foreign",
            stranger,
        ));

        let err =
            validate_shipping_selection(&fx.cart, &network, &[foreign_option]).unwrap_err();

        assert_eq!(
            err,
            ShippingValidationError::OptionNotAvailable {
                option_id: foreign_option
            }
        );
    }

    #[test]
    fn mapped_platform_option_passes_when_seller_in_cart() {
        let fx = fixture();
        let platform_option = ShippingOptionId::new();
        let mut network = fx.network.clone();
        network.add_option(ShippingOption::platform(platform_option, "Platform Post"));

        let mut cart = fx.cart.clone();
        cart.map_platform_option(platform_option, fx.seller);

        let selection =
            validate_shipping_selection(&cart, &network, &[platform_option]).unwrap();

        assert_eq!(selection.admin_mapped, vec![(platform_option, fx.seller)]);
    }

    #[test]
    fn mapped_platform_option_to_absent_seller_is_rejected() {
        let fx = fixture();
        let platform_option = ShippingOptionId::new();
        let mut network = fx.network.clone();
        network.add_option(ShippingOption::platform(platform_option, "Platform Post"));

        let mut cart = fx.cart.clone();
        cart.map_platform_option(platform_option, SellerId::new());

        let err =
            validate_shipping_selection(&cart, &network, &[platform_option]).unwrap_err();

        assert_eq!(
            err,
            ShippingValidationError::OptionNotAvailable {
                option_id: platform_option
            }
        );
    }

    #[test]
    fn unmapped_platform_option_is_accepted_as_unattributed() {
        let fx = fixture();
        let platform_option = ShippingOptionId::new();
        let mut network = fx.network.clone();
        network.add_option(ShippingOption::platform(platform_option, "Platform Post"));

        let selection =
            validate_shipping_selection(&fx.cart, &network, &[platform_option]).unwrap();

        assert_eq!(selection.unattributed, vec![platform_option]);
        assert!(selection.seller_owned.is_empty());
    }

    #[test]
    fn empty_selection_is_valid() {
        let fx = fixture();
        let selection = validate_shipping_selection(&fx.cart, &fx.network, &[]).unwrap();
        assert_eq!(selection, ValidatedSelection::default());
    }
}
