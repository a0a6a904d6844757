//! Contact Form

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A field of the checkout contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Buyer name
    Name,

    /// Phone number
    Phone,

    /// Email address
    Email,

    /// Delivery address
    Address,

    /// Coupon code
    Coupon,
}

impl Field {
    /// Form label for the field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone No",
            Self::Email => "Email",
            Self::Address => "Address",
            Self::Coupon => "Coupon code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contact form validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(Field),
}

/// Which optional fields a form collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormOptions {
    /// Collect and require an email address.
    pub require_email: bool,
}

/// Raw contact form values as typed by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    phone: String,
    email: String,
    address: String,
    coupon: String,
}

impl ContactForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// Get a field value.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Address => &self.address,
            Field::Coupon => &self.coupon,
        }
    }

    /// Validate the form, trimming every value.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingField`] for the first blank required field.
    pub fn validate(&self, options: FormOptions) -> Result<BuyerDetails, FormError> {
        let name = required(Field::Name, &self.name)?;
        let phone = required(Field::Phone, &self.phone)?;

        let email = if options.require_email {
            Some(required(Field::Email, &self.email)?)
        } else {
            optional(&self.email)
        };

        let address = required(Field::Address, &self.address)?;

        Ok(BuyerDetails {
            name,
            phone,
            email,
            address,
            coupon: optional(&self.coupon),
        })
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Address => &mut self.address,
            Field::Coupon => &mut self.coupon,
        }
    }
}

fn required(field: Field, value: &str) -> Result<String, FormError> {
    optional(value).ok_or(FormError::MissingField(field))
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

/// Validated buyer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerDetails {
    /// Buyer name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// Email, when given
    pub email: Option<String>,

    /// Delivery address
    pub address: String,

    /// Coupon code, when given
    pub coupon: Option<String>,
}
