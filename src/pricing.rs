//! Pricing
//!
//! Totals are computed in minor units with checked integer arithmetic.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{cart::Cart, catalog::Catalog, products::Product};

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A line total or the cart total does not fit in minor units.
    #[error("price overflow")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Sum of all quantities in the cart.
pub fn total_items(cart: &Cart) -> u64 {
    cart.iter().map(|(_, quantity)| u64::from(quantity)).sum()
}

/// Price of `quantity` units of a product.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the line total does not fit in minor units.
pub fn line_total(
    product: &Product,
    quantity: u32,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let minor_units = product
        .price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(TotalPriceError::Overflow)?;

    Ok(Money::from_minor(minor_units, product.price.currency()))
}

/// Calculates the total price of a cart against the catalog.
///
/// Products missing from the cart contribute nothing.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line total does not fit in minor units.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn total_price(
    cart: &Cart,
    catalog: &Catalog,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    catalog.iter().try_fold(
        Money::from_minor(0, catalog.currency()),
        |acc, product| {
            let line = line_total(product, cart.quantity(product.id.as_str()))?;

            Ok(acc.add(line)?)
        },
    )
}

/// Express an amount in whole currency units, dropping any minor remainder.
pub fn whole_units(money: &Money<'_, Currency>) -> i64 {
    let scale = 10_i64
        .checked_pow(money.currency().exponent)
        .unwrap_or(1);

    money.to_minor_units() / scale
}
