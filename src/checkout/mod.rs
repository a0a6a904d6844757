//! Checkout
//!
//! The checkout form, its submission state machine and the async driver that
//! talks to the payment and order-logging collaborators.

pub mod coupon;
pub mod errors;
pub mod flow;
pub mod form;
pub mod payment;
pub mod session;

pub use errors::CheckoutError;
pub use flow::{CheckoutFlow, SharedCheckout, Settled};
pub use session::{Checkout, CheckoutState, PendingPayment, Transition};
