use std::sync::Arc;

use async_trait::async_trait;
use testresult::TestResult;
use tokio::sync::{Mutex, oneshot};

use storefront::{checkout::payment::MockPaymentGateway, order_log::MockOrderLogger, prelude::*};

fn open_checkout(quantities: &[(&str, i64)]) -> TestResult<SharedCheckout> {
    let catalog = Arc::new(Catalog::bundled()?);
    let mut cart = Cart::new();

    for (product, quantity) in quantities {
        cart.set_quantity(&catalog, product, *quantity)?;
    }

    let checkout = Checkout::new(cart.snapshot(&catalog)?, FormOptions::default())?;

    Ok(Arc::new(Mutex::new(checkout)))
}

async fn fill_form(session: &SharedCheckout) -> Result<(), CheckoutError> {
    let mut checkout = session.lock().await;

    checkout.update_field(Field::Name, "Asha")?;
    checkout.update_field(Field::Phone, "9876543210")?;
    checkout.update_field(Field::Address, "12 MG Road")
}

fn paying(reference: &'static str) -> MockPaymentGateway {
    let mut gateway = MockPaymentGateway::new();

    gateway
        .expect_request_payment()
        .times(1)
        .returning(move |_| PaymentOutcome::Success(PaymentReference::new(reference)));

    gateway
}

/// Gateway that holds the widget open until the test releases it.
struct HeldOpen {
    outcome: std::sync::Mutex<Option<oneshot::Receiver<PaymentOutcome>>>,
}

#[async_trait]
impl PaymentGateway for HeldOpen {
    async fn request_payment(&self, _request: PaymentRequest) -> PaymentOutcome {
        let receiver = self.outcome.lock().ok().and_then(|mut slot| slot.take());

        match receiver {
            Some(receiver) => receiver.await.unwrap_or(PaymentOutcome::Dismissed),
            None => PaymentOutcome::Dismissed,
        }
    }
}

#[tokio::test]
async fn incomplete_form_never_opens_payment_widget() -> TestResult {
    let session = open_checkout(&[("1", 1)])?;
    {
        let mut checkout = session.lock().await;
        checkout.update_field(Field::Name, "Asha")?;
        checkout.update_field(Field::Address, "12 MG Road")?;
    }

    let mut gateway = MockPaymentGateway::new();
    gateway.expect_request_payment().never();

    let flow = CheckoutFlow::new(Arc::new(gateway));
    let result = flow.submit(&session).await;

    assert!(matches!(
        result,
        Err(CheckoutError::Form(FormError::MissingField(Field::Phone)))
    ));
    assert_eq!(session.lock().await.state(), &CheckoutState::Editing);

    Ok(())
}

#[tokio::test]
async fn payment_request_carries_order_details() -> TestResult {
    let session = open_checkout(&[("1", 2), ("2", 1)])?;
    fill_form(&session).await?;

    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_request_payment()
        .withf(|request| {
            request.amount == 110_700
                && request.currency == "INR"
                && request.buyer_name == "Asha"
                && request.buyer_contact == "9876543210"
                && request.notes.items == "CHAIN x2, RING x1"
                && request.notes.total_items == 3
        })
        .times(1)
        .returning(|_| PaymentOutcome::Dismissed);

    let flow = CheckoutFlow::new(Arc::new(gateway));
    let settled = flow.submit(&session).await?.await?.ok_or("session dropped")?;

    assert_eq!(settled.transition, Transition::ReturnedToEditing);

    Ok(())
}

#[tokio::test]
async fn dismissal_keeps_form_and_allows_retry() -> TestResult {
    let session = open_checkout(&[("3", 1)])?;
    fill_form(&session).await?;

    let mut gateway = MockPaymentGateway::new();
    let mut sequence = mockall::Sequence::new();
    gateway
        .expect_request_payment()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| PaymentOutcome::Dismissed);
    gateway
        .expect_request_payment()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| PaymentOutcome::Success(PaymentReference::new("pay_retry")));

    let flow = CheckoutFlow::new(Arc::new(gateway));

    let first = flow.submit(&session).await?.await?.ok_or("session dropped")?;

    assert_eq!(first.transition, Transition::ReturnedToEditing);
    {
        let checkout = session.lock().await;

        assert_eq!(checkout.state(), &CheckoutState::Editing);
        assert_eq!(checkout.form().get(Field::Name), "Asha");
        assert_eq!(checkout.form().get(Field::Phone), "9876543210");
        assert!(checkout.can_submit());
    }

    let second = flow.submit(&session).await?.await?.ok_or("session dropped")?;

    assert_eq!(
        second.transition,
        Transition::Completed(PaymentReference::new("pay_retry"))
    );

    Ok(())
}

#[tokio::test]
async fn success_logs_order_once() -> TestResult {
    let session = open_checkout(&[("1", 2)])?;
    fill_form(&session).await?;

    let mut logger = MockOrderLogger::new();
    logger
        .expect_log_order()
        .withf(|report| {
            report.payment_reference.as_str() == "pay_1"
                && report.name == "Asha"
                && report.total_items == 2
                && report.total_amount == 738
                && report.coupon_code == "None"
        })
        .times(1)
        .returning(|_| Ok(()));

    let flow = CheckoutFlow::new(Arc::new(paying("pay_1"))).with_order_log(Arc::new(logger));
    let settled = flow.submit(&session).await?.await?.ok_or("session dropped")?;

    assert_eq!(
        settled.transition,
        Transition::Completed(PaymentReference::new("pay_1"))
    );

    settled.order_log.ok_or("expected order log task")?.await?;

    let checkout = session.lock().await;

    assert_eq!(
        checkout.state(),
        &CheckoutState::Completed {
            reference: PaymentReference::new("pay_1")
        }
    );
    assert!(!checkout.can_submit());

    Ok(())
}

#[tokio::test]
async fn order_log_failure_does_not_undo_completion() -> TestResult {
    let session = open_checkout(&[("2", 1)])?;
    fill_form(&session).await?;

    let mut logger = MockOrderLogger::new();
    logger
        .expect_log_order()
        .times(1)
        .returning(|_| Err(OrderLogError::UnexpectedResponse("500".to_string())));

    let flow = CheckoutFlow::new(Arc::new(paying("pay_2"))).with_order_log(Arc::new(logger));
    let settled = flow.submit(&session).await?.await?.ok_or("session dropped")?;

    settled.order_log.ok_or("expected order log task")?.await?;

    assert_eq!(
        session.lock().await.state(),
        &CheckoutState::Completed {
            reference: PaymentReference::new("pay_2")
        }
    );

    Ok(())
}

#[tokio::test]
async fn completion_without_order_log_starts_no_task() -> TestResult {
    let session = open_checkout(&[("2", 1)])?;
    fill_form(&session).await?;

    let flow = CheckoutFlow::new(Arc::new(paying("pay_3")));
    let settled = flow.submit(&session).await?.await?.ok_or("session dropped")?;

    assert!(matches!(settled.transition, Transition::Completed(_)));
    assert!(settled.order_log.is_none());

    Ok(())
}

#[tokio::test]
async fn submit_while_payment_open_is_rejected() -> TestResult {
    let session = open_checkout(&[("1", 1)])?;
    fill_form(&session).await?;

    let (release, outcome) = oneshot::channel();
    let gateway = HeldOpen {
        outcome: std::sync::Mutex::new(Some(outcome)),
    };

    let flow = CheckoutFlow::new(Arc::new(gateway));
    let pending = flow.submit(&session).await?;

    assert!(matches!(
        flow.submit(&session).await,
        Err(CheckoutError::SubmissionInProgress)
    ));

    release
        .send(PaymentOutcome::Dismissed)
        .map_err(|_outcome| "payment task gone")?;

    let settled = pending.await?.ok_or("session dropped")?;

    assert_eq!(settled.transition, Transition::ReturnedToEditing);

    Ok(())
}

#[tokio::test]
async fn outcome_after_checkout_closed_is_dropped() -> TestResult {
    let session = open_checkout(&[("1", 1)])?;
    fill_form(&session).await?;

    let (release, outcome) = oneshot::channel();
    let gateway = HeldOpen {
        outcome: std::sync::Mutex::new(Some(outcome)),
    };

    let mut logger = MockOrderLogger::new();
    logger.expect_log_order().never();

    let flow = CheckoutFlow::new(Arc::new(gateway)).with_order_log(Arc::new(logger));
    let pending = flow.submit(&session).await?;

    drop(session);

    release
        .send(PaymentOutcome::Success(PaymentReference::new("pay_late")))
        .map_err(|_outcome| "payment task gone")?;

    assert!(pending.await?.is_none());

    Ok(())
}
