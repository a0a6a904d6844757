//! Checkout session
//!
//! State machine for one checkout attempt:
//!
//! ```text
//! Editing --submit--> Submitting --success--> Completed
//!    ^                    |
//!    +------dismiss-------+
//! ```
//!
//! Payment outcomes carry the attempt number they were issued for. Outcomes for
//! any attempt other than the one in flight, and every outcome after
//! completion, are ignored.

use std::sync::Arc;

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, info};

use crate::{
    cart::CartSnapshot,
    checkout::{
        coupon::{CouponHook, CouponOutcome, NoDiscount},
        errors::CheckoutError,
        form::{BuyerDetails, ContactForm, Field, FormOptions},
        payment::{PaymentNotes, PaymentOutcome, PaymentReference, PaymentRequest},
    },
    order_log::OrderReport,
    orders::OrderSummary,
};

/// Where a checkout currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// The buyer is filling in the form.
    Editing,

    /// The payment widget is open.
    Submitting {
        /// Attempt number of the open payment
        attempt: u64,
    },

    /// Payment captured.
    Completed {
        /// Provider reference for the payment
        reference: PaymentReference,
    },
}

/// Effect of a payment outcome on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Submitting moved to Completed.
    Completed(PaymentReference),

    /// Submitting moved back to Editing.
    ReturnedToEditing,

    /// The outcome did not apply to the current state.
    Ignored,
}

/// A payment handed to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPayment {
    /// Attempt number to report the outcome against
    pub attempt: u64,

    /// What the widget is asked to collect
    pub request: PaymentRequest,
}

/// Checkout
#[derive(Debug)]
pub struct Checkout {
    snapshot: CartSnapshot,
    summary: OrderSummary,
    payable: Money<'static, Currency>,
    form: ContactForm,
    form_options: FormOptions,
    coupon_hook: Arc<dyn CouponHook>,
    buyer: Option<BuyerDetails>,
    state: CheckoutState,
    attempts: u64,
}

impl Checkout {
    /// Open a checkout for a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the snapshot holds nothing, or
    /// [`CheckoutError::Pricing`] if the order cannot be priced.
    pub fn new(snapshot: CartSnapshot, form_options: FormOptions) -> Result<Self, CheckoutError> {
        Self::with_coupon_hook(snapshot, form_options, Arc::new(NoDiscount))
    }

    /// Open a checkout that evaluates coupon codes with `coupon_hook`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the snapshot holds nothing, or
    /// [`CheckoutError::Pricing`] if the order cannot be priced.
    pub fn with_coupon_hook(
        snapshot: CartSnapshot,
        form_options: FormOptions,
        coupon_hook: Arc<dyn CouponHook>,
    ) -> Result<Self, CheckoutError> {
        if snapshot.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = snapshot.cart.summary(&snapshot.catalog)?;
        let payable = snapshot.total;

        Ok(Self {
            snapshot,
            summary,
            payable,
            form: ContactForm::new(),
            form_options,
            coupon_hook,
            buyer: None,
            state: CheckoutState::Editing,
            attempts: 0,
        })
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Contact form values.
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Form options in effect.
    pub fn form_options(&self) -> FormOptions {
        self.form_options
    }

    /// The cart snapshot this checkout was opened with.
    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    /// Itemized order.
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Amount the buyer will be asked to pay.
    pub fn payable(&self) -> Money<'static, Currency> {
        self.payable
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == CheckoutState::Editing
    }

    /// Change a form field.
    ///
    /// Editing the coupon code drops any discount taken for the previous code
    /// until [`Checkout::apply_coupon`] runs again.
    ///
    /// # Errors
    ///
    /// Returns an error unless the checkout is in the Editing state.
    pub fn update_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), CheckoutError> {
        self.ensure_editing()?;
        self.form.set(field, value);

        if field == Field::Coupon {
            self.payable = self.summary.total();
        }

        Ok(())
    }

    /// Run the coupon code in the form through the coupon hook.
    ///
    /// A discount is only taken if it lowers the payable amount.
    ///
    /// # Errors
    ///
    /// Returns an error unless the checkout is in the Editing state.
    pub fn apply_coupon(&mut self) -> Result<CouponOutcome, CheckoutError> {
        self.ensure_editing()?;

        let code = self.form.get(Field::Coupon).trim();
        let outcome = self.coupon_hook.apply_coupon(code, &self.summary);

        self.payable = match outcome {
            CouponOutcome::Discounted { total }
                if total.currency() == self.summary.currency()
                    && (0..=self.summary.total().to_minor_units())
                        .contains(&total.to_minor_units()) =>
            {
                total
            }
            _ => self.summary.total(),
        };

        debug!(code, payable = %self.payable, "coupon applied");

        Ok(outcome)
    }

    /// Validate the form and move to Submitting.
    ///
    /// Nothing changes when validation fails, so the payment widget is never
    /// opened for an incomplete form.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Form`]: a required field is blank.
    /// - [`CheckoutError::SubmissionInProgress`]: a payment is already open.
    /// - [`CheckoutError::AlreadyCompleted`]: the order was already paid for.
    pub fn begin_submit(&mut self) -> Result<PendingPayment, CheckoutError> {
        self.ensure_editing()?;

        let buyer = self.form.validate(self.form_options)?;

        self.attempts += 1;

        let attempt = self.attempts;
        let request = PaymentRequest {
            amount: self.payable.to_minor_units(),
            currency: self.payable.currency().iso_alpha_code,
            buyer_name: buyer.name.clone(),
            buyer_contact: buyer.phone.clone(),
            buyer_email: buyer.email.clone(),
            notes: PaymentNotes {
                items: self.summary.description(),
                total_items: self.summary.total_items(),
            },
        };

        self.buyer = Some(buyer);
        self.state = CheckoutState::Submitting { attempt };

        info!(attempt, amount = request.amount, "payment requested");

        Ok(PendingPayment { attempt, request })
    }

    /// Apply the payment outcome for `attempt`.
    pub fn resolve(&mut self, attempt: u64, outcome: PaymentOutcome) -> Transition {
        match outcome {
            PaymentOutcome::Success(reference) => self.payment_succeeded(attempt, reference),
            PaymentOutcome::Dismissed => self.payment_dismissed(attempt),
        }
    }

    /// The provider captured the payment for `attempt`.
    pub fn payment_succeeded(&mut self, attempt: u64, reference: PaymentReference) -> Transition {
        if self.state != (CheckoutState::Submitting { attempt }) {
            debug!(attempt, state = ?self.state, "ignoring payment success");

            return Transition::Ignored;
        }

        info!(attempt, %reference, "payment completed");

        self.state = CheckoutState::Completed {
            reference: reference.clone(),
        };

        Transition::Completed(reference)
    }

    /// The buyer closed the payment dialog for `attempt`.
    ///
    /// Form values are kept so the buyer can try again.
    pub fn payment_dismissed(&mut self, attempt: u64) -> Transition {
        if self.state != (CheckoutState::Submitting { attempt }) {
            debug!(attempt, state = ?self.state, "ignoring payment dismissal");

            return Transition::Ignored;
        }

        info!(attempt, "payment dismissed");

        self.state = CheckoutState::Editing;

        Transition::ReturnedToEditing
    }

    /// Build the order report for a completed checkout.
    ///
    /// Returns `None` until the checkout has completed.
    pub fn order_report(&self, timestamp: Timestamp) -> Option<OrderReport> {
        let CheckoutState::Completed { reference } = &self.state else {
            return None;
        };

        let buyer = self.buyer.as_ref()?;

        Some(OrderReport::new(
            timestamp,
            reference.clone(),
            buyer,
            &self.summary,
            self.payable,
        ))
    }

    fn ensure_editing(&self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Editing => Ok(()),
            CheckoutState::Submitting { .. } => Err(CheckoutError::SubmissionInProgress),
            CheckoutState::Completed { .. } => Err(CheckoutError::AlreadyCompleted),
        }
    }
}
