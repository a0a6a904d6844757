//! Views
//!
//! Headless models of the two storefront screens. A [`Storefront`] owns
//! whichever screen is showing; the catalog screen owns the cart and the
//! checkout screen owns the checkout session.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    catalog::Catalog,
    checkout::{
        CheckoutError,
        coupon::{CouponHook, NoDiscount},
        flow::SharedCheckout,
        form::FormOptions,
        session::Checkout,
    },
    pricing::TotalPriceError,
};

pub mod catalog;

pub use catalog::{BannerStrip, CatalogView, ProductTile};

/// Errors raised by screen transitions.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Checkout needs at least one item.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested transition is not available from the current screen.
    #[error("not on the catalog screen")]
    NotOnCatalog,

    /// Pricing the cart failed.
    #[error(transparent)]
    Pricing(#[from] TotalPriceError),

    /// Opening the checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Scrolling banner settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerOptions {
    /// Text repeated along the strip
    pub text: String,

    /// Number of repetitions per strip
    pub repeat: usize,

    /// Time for one full loop of the strip
    pub loop_duration: Duration,
}

impl Default for BannerOptions {
    fn default() -> Self {
        Self {
            text: "RARE PACKAGE".to_string(),
            repeat: 20,
            loop_duration: Duration::from_secs(5),
        }
    }
}

/// Presentation options shared by every storefront layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Product tiles per grid row
    pub columns: usize,

    /// Show a quantity badge on products in the cart
    pub show_badges: bool,

    /// Banner strip, if any
    pub banner: Option<BannerOptions>,

    /// Checkout form fields
    pub form: FormOptions,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            columns: 3,
            show_badges: true,
            banner: Some(BannerOptions::default()),
            form: FormOptions::default(),
        }
    }
}

/// Screen currently shown.
#[derive(Debug)]
pub enum Screen {
    /// Product grid and cart
    Catalog(CatalogView),

    /// Checkout form
    Checkout(SharedCheckout),
}

/// Storefront
#[derive(Debug)]
pub struct Storefront {
    catalog: Arc<Catalog>,
    options: DisplayOptions,
    coupon_hook: Arc<dyn CouponHook>,
    screen: Screen,
}

impl Storefront {
    /// Open the storefront on the catalog screen with an empty cart.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, options: DisplayOptions) -> Self {
        let screen = Screen::Catalog(CatalogView::new(Arc::clone(&catalog), options.clone()));

        Self {
            catalog,
            options,
            coupon_hook: Arc::new(NoDiscount),
            screen,
        }
    }

    /// Evaluate coupon codes with `coupon_hook` in future checkouts.
    #[must_use]
    pub fn with_coupon_hook(mut self, coupon_hook: Arc<dyn CouponHook>) -> Self {
        self.coupon_hook = coupon_hook;
        self
    }

    /// Screen currently shown.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The catalog screen, if showing.
    pub fn catalog_view(&mut self) -> Option<&mut CatalogView> {
        match &mut self.screen {
            Screen::Catalog(view) => Some(view),
            Screen::Checkout(_) => None,
        }
    }

    /// The checkout session, if showing.
    pub fn checkout(&self) -> Option<&SharedCheckout> {
        match &self.screen {
            Screen::Checkout(session) => Some(session),
            Screen::Catalog(_) => None,
        }
    }

    /// Move from the catalog to checkout, handing over a snapshot of the cart.
    ///
    /// # Errors
    ///
    /// Returns a `ViewError` if the catalog screen is not showing, the cart is
    /// empty or the cart cannot be priced.
    pub fn proceed_to_checkout(&mut self) -> Result<SharedCheckout, ViewError> {
        let Screen::Catalog(view) = &self.screen else {
            return Err(ViewError::NotOnCatalog);
        };

        let snapshot = view.checkout_snapshot()?;
        let checkout = Checkout::with_coupon_hook(
            snapshot,
            self.options.form,
            Arc::clone(&self.coupon_hook),
        )?;

        info!(
            items = checkout.summary().total_items(),
            total = %checkout.payable(),
            "checkout opened"
        );

        let session = Arc::new(Mutex::new(checkout));
        self.screen = Screen::Checkout(Arc::clone(&session));

        Ok(session)
    }

    /// Return to a fresh catalog screen.
    ///
    /// The previous screen is dropped along with its cart or checkout session.
    pub fn back(&mut self) {
        self.screen = Screen::Catalog(CatalogView::new(
            Arc::clone(&self.catalog),
            self.options.clone(),
        ));
    }
}
