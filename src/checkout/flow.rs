//! Checkout flow
//!
//! Drives a [`Checkout`] through the payment widget. The payment outcome is
//! awaited on its own task holding only a weak handle to the session, so a
//! checkout that is closed while the widget is open simply drops the outcome.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use jiff::Timestamp;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    checkout::{
        errors::CheckoutError,
        payment::{PaymentGateway, PaymentOutcome},
        session::{Checkout, Transition},
    },
    order_log::{OrderLogger, OrderReport},
};

/// A checkout session shared between the view and the payment task.
pub type SharedCheckout = Arc<Mutex<Checkout>>;

/// What happened once the payment widget reported back.
#[derive(Debug)]
pub struct Settled {
    /// Effect on the checkout state
    pub transition: Transition,

    /// Background order-log task, started only on completion
    pub order_log: Option<JoinHandle<()>>,
}

/// Checkout collaborators.
#[derive(Clone)]
pub struct CheckoutFlow {
    payment: Arc<dyn PaymentGateway>,
    order_log: Option<Arc<dyn OrderLogger>>,
}

impl fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("order_log", &self.order_log.is_some())
            .finish_non_exhaustive()
    }
}

impl CheckoutFlow {
    /// Create a flow that takes payment through `payment`.
    #[must_use]
    pub fn new(payment: Arc<dyn PaymentGateway>) -> Self {
        Self {
            payment,
            order_log: None,
        }
    }

    /// Report completed orders to `order_log`.
    #[must_use]
    pub fn with_order_log(mut self, order_log: Arc<dyn OrderLogger>) -> Self {
        self.order_log = Some(order_log);
        self
    }

    /// Submit the checkout form and open the payment widget.
    ///
    /// Validation runs before the widget is touched. On success the returned
    /// task resolves once the widget reports back; it yields `None` if the
    /// session was dropped in the meantime.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` if the form is incomplete or the checkout is
    /// not in the Editing state.
    pub async fn submit(
        &self,
        session: &SharedCheckout,
    ) -> Result<JoinHandle<Option<Settled>>, CheckoutError> {
        let pending = session.lock().await.begin_submit()?;

        let payment = Arc::clone(&self.payment);
        let order_log = self.order_log.clone();
        let session = Arc::downgrade(session);

        Ok(tokio::spawn(async move {
            let outcome = payment.request_payment(pending.request).await;

            settle(&session, pending.attempt, outcome, order_log).await
        }))
    }
}

async fn settle(
    session: &Weak<Mutex<Checkout>>,
    attempt: u64,
    outcome: PaymentOutcome,
    order_log: Option<Arc<dyn OrderLogger>>,
) -> Option<Settled> {
    let Some(session) = session.upgrade() else {
        debug!(attempt, ?outcome, "checkout closed before payment outcome arrived");

        return None;
    };

    let mut checkout = session.lock().await;
    let transition = checkout.resolve(attempt, outcome);

    let order_log = match (&transition, order_log) {
        (Transition::Completed(_), Some(logger)) => checkout
            .order_report(Timestamp::now())
            .map(|report| spawn_order_log(logger, report)),
        _ => None,
    };

    Some(Settled {
        transition,
        order_log,
    })
}

fn spawn_order_log(logger: Arc<dyn OrderLogger>, report: OrderReport) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reference = report.payment_reference.clone();

        match logger.log_order(report).await {
            Ok(()) => debug!(%reference, "order logged"),
            Err(error) => warn!(%reference, %error, "failed to log order"),
        }
    })
}
