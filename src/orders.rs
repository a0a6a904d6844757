//! Order Summary
//!
//! Itemized view of a cart, in catalog order, used by the checkout summary
//! panel, the payment notes and the order report.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    cart::Cart,
    catalog::Catalog,
    pricing::{self, TotalPriceError},
    products::ProductId,
};

/// One product line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Product id
    pub product: ProductId,

    /// Product name at the time of ordering
    pub name: String,

    /// Unit price
    pub unit_price: Money<'static, Currency>,

    /// Quantity, always non-zero
    pub quantity: u32,

    /// `unit_price * quantity`
    pub line_total: Money<'static, Currency>,
}

/// Itemized order built from a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    lines: SmallVec<[OrderLine; 8]>,
    total_items: u64,
    total: Money<'static, Currency>,
}

impl OrderSummary {
    /// Itemize a cart against the catalog.
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if a line or the total overflows.
    pub fn from_cart(cart: &Cart, catalog: &Catalog) -> Result<Self, TotalPriceError> {
        let lines = catalog
            .iter()
            .filter_map(|product| {
                let quantity = cart.quantity(product.id.as_str());

                (quantity > 0).then_some((product, quantity))
            })
            .map(|(product, quantity)| {
                Ok(OrderLine {
                    product: product.id.clone(),
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity,
                    line_total: pricing::line_total(product, quantity)?,
                })
            })
            .collect::<Result<SmallVec<[OrderLine; 8]>, TotalPriceError>>()?;

        Ok(Self {
            lines,
            total_items: pricing::total_items(cart),
            total: pricing::total_price(cart, catalog)?,
        })
    }

    /// Lines with a non-zero quantity, in catalog order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Total number of items.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Total price.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Currency of every amount in the summary.
    pub fn currency(&self) -> &'static Currency {
        self.total.currency()
    }

    /// Check if no line was ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Short description such as `CHAIN x2, RING x1`.
    pub fn description(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{} x{}", line.name, line.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Writes the summary as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit Price", "Line Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, " Items: {}", self.total_items)?;
        writeln!(out, " Total: {}", self.total)
    }
}
