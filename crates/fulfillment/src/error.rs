//! Shipping selection errors.

use common::ShippingOptionId;
use thiserror::Error;

/// Errors reported by the shipping selection validator.
///
/// These are synchronous gate errors: checkout must not proceed, and no
/// partial state is committed anywhere.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingValidationError {
    /// The same shipping option appears more than once in the selection.
    #[error("doubled shipping method selection for option {option_id}")]
    DuplicateOption { option_id: ShippingOptionId },

    /// The selected option cannot be attributed to any seller present in
    /// the cart.
    #[error("shipping option {option_id} is not available for any cart item")]
    OptionNotAvailable { option_id: ShippingOptionId },
}
