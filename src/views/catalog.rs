//! Catalog screen.

use std::{iter, sync::Arc, time::Duration};

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{Cart, CartError, CartSnapshot},
    catalog::Catalog,
    pricing::{self, TotalPriceError},
    products::Product,
    views::{DisplayOptions, ViewError},
};

/// A product as shown in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTile<'a> {
    /// The product
    pub product: &'a Product,

    /// Quantity badge; `None` when the product is not in the cart
    pub badge: Option<u32>,
}

/// Scrolling banner as laid out above the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerStrip<'a> {
    /// Labels along the strip
    pub labels: Vec<&'a str>,

    /// Time for one full loop of the strip
    pub loop_duration: Duration,
}

/// Product grid with its cart.
#[derive(Debug)]
pub struct CatalogView {
    catalog: Arc<Catalog>,
    cart: Cart,
    options: DisplayOptions,
}

impl CatalogView {
    /// Mount the grid with an empty cart.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, options: DisplayOptions) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            options,
        }
    }

    /// Add one of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] for an unknown product.
    pub fn add(&mut self, product: &str) -> Result<u32, CartError> {
        Ok(self.cart.increment(&self.catalog, product)?.quantity(product))
    }

    /// Remove one of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] for an unknown product.
    pub fn remove(&mut self, product: &str) -> Result<u32, CartError> {
        Ok(self.cart.decrement(&self.catalog, product)?.quantity(product))
    }

    /// Adjust a product's quantity by `delta` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] for an unknown product, even when
    /// `delta` is zero.
    pub fn set_quantity(&mut self, product: &str, delta: i64) -> Result<u32, CartError> {
        Ok(self
            .cart
            .set_quantity(&self.catalog, product, delta)?
            .quantity(product))
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Tiles in catalog order.
    pub fn tiles(&self) -> Vec<ProductTile<'_>> {
        self.catalog
            .iter()
            .map(|product| {
                let quantity = self.cart.quantity(product.id.as_str());

                ProductTile {
                    product,
                    badge: (self.options.show_badges && quantity > 0).then_some(quantity),
                }
            })
            .collect()
    }

    /// Tiles grouped into grid rows.
    pub fn rows(&self) -> Vec<Vec<ProductTile<'_>>> {
        self.tiles()
            .chunks(self.options.columns.max(1))
            .map(<[ProductTile<'_>]>::to_vec)
            .collect()
    }

    /// Banner strip, `None` when the banner is off.
    pub fn banner(&self) -> Option<BannerStrip<'_>> {
        self.options.banner.as_ref().map(|banner| BannerStrip {
            labels: iter::repeat_n(banner.text.as_str(), banner.repeat).collect(),
            loop_duration: banner.loop_duration,
        })
    }

    /// Number of items in the cart.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Price of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if the total overflows.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        pricing::total_price(&self.cart, &self.catalog)
    }

    /// Whether the checkout button is enabled.
    pub fn can_checkout(&self) -> bool {
        !self.cart.is_empty()
    }

    /// Snapshot the cart for checkout.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::EmptyCart`] if nothing is in the cart.
    pub fn checkout_snapshot(&self) -> Result<CartSnapshot, ViewError> {
        if !self.can_checkout() {
            return Err(ViewError::EmptyCart);
        }

        Ok(self.cart.snapshot(&self.catalog)?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn view(options: DisplayOptions) -> TestResult<CatalogView> {
        Ok(CatalogView::new(Arc::new(Catalog::bundled()?), options))
    }

    #[test]
    fn empty_view_disables_checkout() -> TestResult {
        let view = view(DisplayOptions::default())?;

        assert_eq!(view.total_items(), 0);
        assert_eq!(view.total_price()?, Money::from_minor(0, INR));
        assert!(!view.can_checkout());
        assert!(matches!(view.checkout_snapshot(), Err(ViewError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn badges_show_only_non_zero_quantities() -> TestResult {
        let mut view = view(DisplayOptions::default())?;

        view.add("1")?;
        view.add("1")?;
        view.add("2")?;
        view.remove("2")?;

        let badges: Vec<Option<u32>> = view.tiles().iter().map(|tile| tile.badge).collect();

        assert_eq!(badges, vec![Some(2), None, None]);

        Ok(())
    }

    #[test]
    fn badges_can_be_hidden() -> TestResult {
        let mut view = view(DisplayOptions {
            show_badges: false,
            ..DisplayOptions::default()
        })?;

        view.add("3")?;

        assert!(view.tiles().iter().all(|tile| tile.badge.is_none()));
        assert_eq!(view.total_items(), 1);

        Ok(())
    }

    #[test]
    fn rows_follow_column_count() -> TestResult {
        let view = view(DisplayOptions {
            columns: 2,
            ..DisplayOptions::default()
        })?;

        let sizes: Vec<usize> = view.rows().iter().map(Vec::len).collect();

        assert_eq!(sizes, vec![2, 1]);

        Ok(())
    }

    #[test]
    fn banner_repeats_text() -> TestResult {
        let view = view(DisplayOptions::default())?;
        let banner = view.banner().ok_or("expected banner")?;

        assert_eq!(banner.labels.len(), 20);
        assert!(banner.labels.iter().all(|label| *label == "RARE PACKAGE"));
        assert_eq!(banner.loop_duration, Duration::from_secs(5));

        let plain = self::view(DisplayOptions {
            banner: None,
            ..DisplayOptions::default()
        })?;

        assert!(plain.banner().is_none());

        Ok(())
    }

    #[test]
    fn add_returns_new_quantity() -> TestResult {
        let mut view = view(DisplayOptions::default())?;

        assert_eq!(view.add("2")?, 1);
        assert_eq!(view.add("2")?, 2);
        assert_eq!(view.remove("2")?, 1);
        assert_eq!(view.remove("2")?, 0);
        assert_eq!(view.remove("2")?, 0);

        Ok(())
    }

    #[test]
    fn set_quantity_applies_whole_delta_at_once() -> TestResult {
        let mut view = view(DisplayOptions::default())?;

        assert_eq!(view.set_quantity("1", 5_000_000_000)?, u32::MAX);
        assert_eq!(view.set_quantity("1", -5_000_000_000)?, 0);
        assert_eq!(view.set_quantity("3", 4)?, 4);
        assert_eq!(view.total_items(), 4);

        Ok(())
    }

    #[test]
    fn set_quantity_rejects_unknown_product_with_zero_delta() -> TestResult {
        let mut view = view(DisplayOptions::default())?;

        assert_eq!(
            view.set_quantity("99", 0),
            Err(CartError::InvalidProduct("99".into()))
        );
        assert!(view.cart().is_empty());

        Ok(())
    }

    #[test]
    fn snapshot_carries_total() -> TestResult {
        let mut view = view(DisplayOptions::default())?;
        view.add("1")?;
        view.add("1")?;

        let snapshot = view.checkout_snapshot()?;

        assert_eq!(snapshot.total, Money::from_minor(73_800, INR));
        assert_eq!(snapshot.cart.quantity("1"), 2);

        Ok(())
    }
}
