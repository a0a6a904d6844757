//! Cart
//!
//! Quantities per product. A product whose quantity reaches zero is removed
//! from the map, so "zero" and "absent" are the same state for every reader.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    orders::OrderSummary,
    pricing::{self, TotalPriceError},
    products::ProductId,
};

/// Errors raised by cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("Unknown product: {0}")]
    InvalidProduct(ProductId),
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    quantities: FxHashMap<ProductId, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the quantity of a product by `delta`.
    ///
    /// The resulting quantity is clamped to `0..=u32::MAX`, so decrementing a
    /// product that is not in the cart leaves the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] if the catalog has no such product.
    pub fn set_quantity(
        &mut self,
        catalog: &Catalog,
        product: &str,
        delta: i64,
    ) -> Result<&mut Self, CartError> {
        let product = catalog
            .product(product)
            .ok_or_else(|| CartError::InvalidProduct(ProductId::from(product)))?;

        let current = self.quantity(product.id.as_str());
        let next = i64::from(current)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        let next = u32::try_from(next).unwrap_or(u32::MAX);

        if next == 0 {
            self.quantities.remove(product.id.as_str());
        } else {
            self.quantities.insert(product.id.clone(), next);
        }

        debug!(product = %product.id, from = current, to = next, "cart quantity changed");

        Ok(self)
    }

    /// Add one of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] if the catalog has no such product.
    pub fn increment(&mut self, catalog: &Catalog, product: &str) -> Result<&mut Self, CartError> {
        self.set_quantity(catalog, product, 1)
    }

    /// Remove one of a product, never going below zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] if the catalog has no such product.
    pub fn decrement(&mut self, catalog: &Catalog, product: &str) -> Result<&mut Self, CartError> {
        self.set_quantity(catalog, product, -1)
    }

    /// Quantity of a product, zero when absent.
    pub fn quantity(&self, product: &str) -> u32 {
        self.quantities.get(product).copied().unwrap_or_default()
    }

    /// Iterate over products with a non-zero quantity, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.quantities
            .iter()
            .map(|(product, quantity)| (product, *quantity))
    }

    /// Total number of items in the cart.
    pub fn total_items(&self) -> u64 {
        pricing::total_items(self)
    }

    /// Check if the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.quantities.clear();
    }

    /// Itemize the cart against the catalog.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if a line or the total overflows.
    pub fn summary(&self, catalog: &Catalog) -> Result<OrderSummary, TotalPriceError> {
        OrderSummary::from_cart(self, catalog)
    }

    /// Freeze the cart for hand-off to checkout.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if the total overflows.
    pub fn snapshot(&self, catalog: &Arc<Catalog>) -> Result<CartSnapshot, TotalPriceError> {
        let total = pricing::total_price(self, catalog)?;

        Ok(CartSnapshot {
            cart: self.clone(),
            catalog: Arc::clone(catalog),
            total,
        })
    }
}

/// Point-in-time copy of a cart with the catalog it was priced against.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    /// Cart contents
    pub cart: Cart,

    /// Catalog the cart refers to
    pub catalog: Arc<Catalog>,

    /// Total price of the cart
    pub total: Money<'static, Currency>,
}
