//! Payment gateway boundary.
//!
//! Payment is taken by a hosted widget. This module describes what is handed
//! to it and what comes back; the widget itself lives outside the crate.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Opaque reference issued by the payment provider for a captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Wrap a provider reference.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form notes attached to the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentNotes {
    /// Itemized description, e.g. `CHAIN x2, RING x1`
    pub items: String,

    /// Total number of items
    pub total_items: u64,
}

/// Everything the payment widget needs for one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    /// Amount in the smallest currency unit
    pub amount: i64,

    /// ISO currency code
    pub currency: &'static str,

    /// Buyer name
    pub buyer_name: String,

    /// Buyer phone number
    pub buyer_contact: String,

    /// Buyer email, when collected
    pub buyer_email: Option<String>,

    /// Order notes
    pub notes: PaymentNotes,
}

/// How a payment attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The provider captured the payment.
    Success(PaymentReference),

    /// The buyer closed the payment dialog.
    Dismissed,
}

/// Opens the payment widget and reports how the buyer left it.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Collect a payment. Resolves exactly once per call.
    async fn request_payment(&self, request: PaymentRequest) -> PaymentOutcome;
}

/// Store-level settings for the hosted widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Public key id of the merchant account
    pub key_id: String,

    /// Store name shown in the dialog
    pub store_name: String,

    /// Purchase description shown in the dialog
    pub description: String,

    /// Accent colour of the dialog
    pub theme_color: String,
}

/// Options object passed to the hosted widget script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOptions {
    key: String,
    amount: i64,
    currency: &'static str,
    name: String,
    description: String,
    prefill: Prefill,
    notes: PaymentNotes,
    theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Prefill {
    name: String,
    contact: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Theme {
    color: String,
}

impl WidgetOptions {
    /// Combine a payment request with the store's widget settings.
    #[must_use]
    pub fn new(request: &PaymentRequest, settings: &WidgetSettings) -> Self {
        Self {
            key: settings.key_id.clone(),
            amount: request.amount,
            currency: request.currency,
            name: settings.store_name.clone(),
            description: settings.description.clone(),
            prefill: Prefill {
                name: request.buyer_name.clone(),
                contact: request.buyer_contact.clone(),
                email: request.buyer_email.clone(),
            },
            notes: request.notes.clone(),
            theme: Theme {
                color: settings.theme_color.clone(),
            },
        }
    }

    /// Render the options as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            amount: 73_800,
            currency: "INR",
            buyer_name: "Asha".to_string(),
            buyer_contact: "9876543210".to_string(),
            buyer_email: None,
            notes: PaymentNotes {
                items: "CHAIN x2".to_string(),
                total_items: 2,
            },
        }
    }

    fn settings() -> WidgetSettings {
        WidgetSettings {
            key_id: "rzp_test_key".to_string(),
            store_name: "Rare Package".to_string(),
            description: "Purchase from Rare Package".to_string(),
            theme_color: "#000000".to_string(),
        }
    }

    #[test]
    fn widget_options_match_widget_shape() -> TestResult {
        let options = WidgetOptions::new(&request(), &settings());

        let value = serde_json::to_value(&options)?;

        assert_eq!(
            value,
            json!({
                "key": "rzp_test_key",
                "amount": 73_800,
                "currency": "INR",
                "name": "Rare Package",
                "description": "Purchase from Rare Package",
                "prefill": { "name": "Asha", "contact": "9876543210" },
                "notes": { "items": "CHAIN x2", "total_items": 2 },
                "theme": { "color": "#000000" },
            })
        );

        Ok(())
    }

    #[test]
    fn widget_options_prefill_email_when_present() -> TestResult {
        let mut request = request();
        request.buyer_email = Some("asha@example.com".to_string());

        let value = serde_json::to_value(WidgetOptions::new(&request, &settings()))?;

        assert_eq!(value["prefill"]["email"], json!("asha@example.com"));

        Ok(())
    }

    #[test]
    fn payment_reference_round_trips_as_plain_string() -> TestResult {
        let reference: PaymentReference = serde_json::from_str("\"pay_123\"")?;

        assert_eq!(reference, PaymentReference::new("pay_123"));
        assert_eq!(reference.to_string(), "pay_123");

        Ok(())
    }
}
