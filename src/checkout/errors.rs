//! Checkout errors.

use thiserror::Error;

use crate::{checkout::form::FormError, pricing::TotalPriceError};

/// Errors raised by checkout operations.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Checkout was opened with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A required contact field is blank.
    #[error(transparent)]
    Form(#[from] FormError),

    /// A payment is already in progress.
    #[error("payment already in progress")]
    SubmissionInProgress,

    /// The order has already been paid for.
    #[error("order already completed")]
    AlreadyCompleted,

    /// Pricing the order failed.
    #[error("failed to price order")]
    Pricing(#[source] TotalPriceError),
}

impl From<TotalPriceError> for CheckoutError {
    fn from(error: TotalPriceError) -> Self {
        Self::Pricing(error)
    }
}
