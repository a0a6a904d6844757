//! Storefront
//!
//! Storefront is a cart, pricing and checkout engine for a small online shop.
//! The payment widget and the order log are injected collaborators, so the
//! whole purchase flow runs headless.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod observability;
pub mod order_log;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod views;
