//! Order Log
//!
//! Completed orders can be reported to an external spreadsheet endpoint. The
//! report is best-effort: callers log a failure and carry on.

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use reqwest::Client;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{
    checkout::{form::BuyerDetails, payment::PaymentReference},
    orders::OrderSummary,
    pricing::whole_units,
    products::ProductId,
};

/// Coupon column value when no code was entered.
const NO_COUPON: &str = "None";

/// One itemized line of a reported order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    /// Product id
    pub product_id: ProductId,

    /// Product name
    pub name: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price in whole currency units
    pub unit_price: i64,

    /// Line total in whole currency units
    pub line_total: i64,
}

/// Row sent to the order log for a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    /// When the payment completed
    pub timestamp: Timestamp,

    /// Provider reference of the payment
    pub payment_reference: PaymentReference,

    /// Buyer name
    pub name: String,

    /// Buyer phone number
    pub phone: String,

    /// Buyer email, empty when not collected
    pub email: String,

    /// Delivery address
    pub address: String,

    /// Itemized lines
    pub items: Vec<ReportLine>,

    /// Total number of items
    pub total_items: u64,

    /// Amount paid in whole currency units
    pub total_amount: i64,

    /// Coupon code, or `"None"`
    pub coupon_code: String,
}

impl OrderReport {
    /// Build a report from a completed checkout.
    pub fn new(
        timestamp: Timestamp,
        payment_reference: PaymentReference,
        buyer: &BuyerDetails,
        summary: &OrderSummary,
        paid: Money<'static, Currency>,
    ) -> Self {
        let items = summary
            .lines()
            .iter()
            .map(|line| ReportLine {
                product_id: line.product.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: whole_units(&line.unit_price),
                line_total: whole_units(&line.line_total),
            })
            .collect();

        Self {
            timestamp,
            payment_reference,
            name: buyer.name.clone(),
            phone: buyer.phone.clone(),
            email: buyer.email.clone().unwrap_or_default(),
            address: buyer.address.clone(),
            items,
            total_items: summary.total_items(),
            total_amount: whole_units(&paid),
            coupon_code: buyer
                .coupon
                .clone()
                .unwrap_or_else(|| NO_COUPON.to_string()),
        }
    }
}

/// Errors that can occur when reporting an order.
#[derive(Debug, Error)]
pub enum OrderLogError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx response.
    #[error("unexpected response from order log: {0}")]
    UnexpectedResponse(String),
}

/// Records completed orders somewhere outside the store.
#[automock]
#[async_trait]
pub trait OrderLogger: Send + Sync {
    /// Send one order report. Called at most once per completed order.
    async fn log_order(&self, report: OrderReport) -> Result<(), OrderLogError>;
}

/// Configuration for the spreadsheet endpoint.
#[derive(Debug, Clone)]
pub struct SpreadsheetConfig {
    /// Endpoint URL accepting a JSON POST
    pub url: String,

    /// Request timeout
    pub timeout: Duration,
}

/// Posts order reports as JSON to a spreadsheet web app.
#[derive(Debug, Clone)]
pub struct SpreadsheetOrderLogger {
    config: SpreadsheetConfig,
    http: Client,
}

impl SpreadsheetOrderLogger {
    /// Create a new logger from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SpreadsheetConfig) -> Result<Self, OrderLogError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl OrderLogger for SpreadsheetOrderLogger {
    async fn log_order(&self, report: OrderReport) -> Result<(), OrderLogError> {
        let response = self
            .http
            .post(&self.config.url)
            .json(&report)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(OrderLogError::UnexpectedResponse(format!(
                "order log request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}
