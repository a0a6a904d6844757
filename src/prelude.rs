//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartSnapshot},
    catalog::{Catalog, CatalogError},
    checkout::{
        Checkout, CheckoutError, CheckoutFlow, CheckoutState, PendingPayment, Settled,
        SharedCheckout, Transition,
        coupon::{CouponHook, CouponOutcome, NoDiscount},
        form::{BuyerDetails, ContactForm, Field, FormError, FormOptions},
        payment::{
            PaymentGateway, PaymentOutcome, PaymentReference, PaymentRequest, WidgetOptions,
            WidgetSettings,
        },
    },
    order_log::{OrderLogError, OrderLogger, OrderReport, SpreadsheetOrderLogger},
    orders::{OrderLine, OrderSummary},
    pricing::{TotalPriceError, line_total, total_items, total_price},
    products::{Product, ProductId},
    views::{CatalogView, DisplayOptions, Screen, Storefront, ViewError},
};
