//! Coupons
//!
//! Extension point for pricing rules keyed by a coupon code. The store ships
//! with [`NoDiscount`]; a hook only ever lowers the payable total.

use std::fmt::Debug;

use rusty_money::{Money, iso::Currency};

use crate::orders::OrderSummary;

/// Result of applying a coupon code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponOutcome {
    /// The code does not change the price.
    Unchanged,

    /// The code reduces the amount to pay.
    Discounted {
        /// New amount to pay
        total: Money<'static, Currency>,
    },
}

/// Applies coupon codes to an order.
pub trait CouponHook: Debug + Send + Sync {
    /// Evaluate `code` against the order.
    fn apply_coupon(&self, code: &str, order: &OrderSummary) -> CouponOutcome;
}

/// Hook that accepts any code and changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiscount;

impl CouponHook for NoDiscount {
    fn apply_coupon(&self, _code: &str, _order: &OrderSummary) -> CouponOutcome {
        CouponOutcome::Unchanged
    }
}
