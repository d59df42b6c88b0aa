use std::sync::Arc;
use std::time::Instant;

use crate::domain::identity::{Clock, IdGenerator, OrderId, RandomIdGenerator, SystemClock};
use crate::domain::ports::{CustomerRepository, NotificationService, OrderRepository, PaymentService};
use crate::metrics::{Metrics, OUTCOME_PAID, OUTCOME_PAYMENT_FAILED, OUTCOME_REJECTED};

use super::aggregate::Order;
use super::commands::CreateOrder;
use super::errors::{OrderCommandError, OrderError};
use super::value_objects::{Money, OrderItem};

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Command → Repository → Aggregate → Repository (→ services)
//
// The confirm workflow persists CONFIRMED before asking for payment. When
// the payment is declined the order stays CONFIRMED in storage; nothing is
// compensated.
//
// ============================================================================

pub struct OrderCommandHandler {
    orders: Arc<dyn OrderRepository>,
    customers: Arc<dyn CustomerRepository>,
    payments: Arc<dyn PaymentService>,
    notifications: Arc<dyn NotificationService>,
    metrics: Arc<Metrics>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl OrderCommandHandler {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        customers: Arc<dyn CustomerRepository>,
        payments: Arc<dyn PaymentService>,
        notifications: Arc<dyn NotificationService>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            orders,
            customers,
            payments,
            notifications,
            metrics,
            ids: Arc::new(RandomIdGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build and persist a new order for an existing customer
    pub async fn create_order(&self, command: CreateOrder) -> Result<Order, OrderCommandError> {
        let customer = self
            .customers
            .find_by_id(&command.customer_id)
            .await?
            .ok_or(OrderCommandError::CustomerNotFound(command.customer_id))?;

        let items = command
            .items
            .into_iter()
            .map(|item| {
                let unit_price = Money::of(item.unit_price, item.currency)?;
                OrderItem::new(item.product_name, unit_price, item.quantity)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let order_id = OrderId::new(self.ids.next_id());
        let order = Order::new(order_id, customer.id(), items, self.clock.now())?;
        let order = self.orders.save(order).await?;

        self.metrics.orders_created.inc();
        tracing::info!(
            order_id = %order_id,
            customer_id = %customer.id(),
            item_count = order.items().len(),
            "Order created"
        );

        Ok(order)
    }

    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, OrderCommandError> {
        tracing::debug!(order_id = %order_id, "Loading order");
        self.load_order(order_id).await
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, OrderCommandError> {
        let order = self.load_order(order_id).await?.cancel()?;
        let order = self.orders.save(order).await?;

        self.metrics.order_cancellations.inc();
        tracing::info!(order_id = %order_id, "Order cancelled");

        Ok(order)
    }

    /// Confirm an order, charge it and notify the customer.
    ///
    /// Lookup and transition failures happen before anything is written.
    /// A declined payment yields `PaymentFailed` and leaves the order
    /// CONFIRMED in storage.
    pub async fn confirm_order(&self, order_id: OrderId) -> Result<Order, OrderCommandError> {
        let result = self.run_confirmation(order_id).await;

        let outcome = match &result {
            Ok(_) => OUTCOME_PAID,
            Err(OrderCommandError::PaymentFailed(_)) => OUTCOME_PAYMENT_FAILED,
            Err(_) => OUTCOME_REJECTED,
        };
        self.metrics.record_confirmation(outcome);

        result
    }

    async fn run_confirmation(&self, order_id: OrderId) -> Result<Order, OrderCommandError> {
        let order = self.load_order(order_id).await?;

        let customer = self
            .customers
            .find_by_id(&order.customer_id())
            .await?
            .ok_or(OrderCommandError::CustomerNotFound(order.customer_id()))?;

        let order = order.confirm(self.clock.now())?;
        let order = self.orders.save(order).await?;
        tracing::info!(order_id = %order_id, "Order confirmed");

        let reference = payment_reference(order_id);
        let amount = order.total_amount()?;

        let started = Instant::now();
        let paid = self.payments.process_payment(&reference, &amount).await;
        self.metrics.observe_payment(started.elapsed().as_secs_f64());

        if !paid {
            tracing::warn!(
                order_id = %order_id,
                payment_reference = %reference,
                amount = %amount,
                "Payment declined, order left confirmed"
            );
            return Err(OrderCommandError::PaymentFailed(order_id));
        }

        let order = self.orders.save(order.mark_as_paid()?).await?;
        tracing::info!(order_id = %order_id, amount = %amount, "Order paid");

        let details = order_details(&order, &amount)?;
        if let Err(e) = self
            .notifications
            .send_order_confirmation(customer.email().as_str(), &order_id.to_string(), &details)
            .await
        {
            self.metrics.notifications_failed.inc();
            tracing::warn!(order_id = %order_id, error = %e, "Confirmation notification failed");
        }

        Ok(order)
    }

    async fn load_order(&self, order_id: OrderId) -> Result<Order, OrderCommandError> {
        self.orders
            .find_by_id(&order_id)
            .await?
            .ok_or(OrderCommandError::OrderNotFound(order_id))
    }
}

/// Stable payment reference for an order
pub fn payment_reference(order_id: OrderId) -> String {
    format!("PAY-{}", order_id)
}

/// Human-readable summary sent with the confirmation
fn order_details(order: &Order, total: &Money) -> Result<String, OrderError> {
    let lines = order
        .items()
        .iter()
        .map(|item| -> Result<String, OrderError> {
            Ok(format!(
                "- {} (Qty: {}, Price: {})\n",
                item.product_name(),
                item.quantity(),
                item.line_total()?
            ))
        })
        .collect::<Result<String, OrderError>>()?;

    Ok(format!(
        "Order ID: {}\nTotal Amount: {}\nItems:\n{}",
        order.id(),
        total,
        lines
    ))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::adapters::{InMemoryCustomerRepository, InMemoryOrderRepository};
    use crate::domain::customer::Customer;
    use crate::domain::identity::testing::{FixedClock, SequentialIds};
    use crate::domain::identity::CustomerId;
    use crate::domain::order::{CreateOrderItem, OrderStatus, Transition};

    struct StubPayment {
        approve: bool,
        calls: Mutex<Vec<(String, Money)>>,
    }

    impl StubPayment {
        fn new(approve: bool) -> Self {
            Self {
                approve,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Money)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentService for StubPayment {
        async fn process_payment(&self, reference: &str, amount: &Money) -> bool {
            self.calls
                .lock()
                .unwrap()
                .push((reference.to_string(), amount.clone()));
            self.approve
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        fail: AtomicBool,
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingNotifier {
        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationService for RecordingNotifier {
        async fn send_order_confirmation(
            &self,
            address: &str,
            order_id: &str,
            details: &str,
        ) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push((
                address.to_string(),
                order_id.to_string(),
                details.to_string(),
            ));
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("smtp relay unavailable");
            }
            Ok(())
        }
    }

    struct Fixture {
        handler: OrderCommandHandler,
        orders: Arc<InMemoryOrderRepository>,
        payments: Arc<StubPayment>,
        notifier: Arc<RecordingNotifier>,
        metrics: Arc<Metrics>,
        customer: Customer,
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    async fn fixture(approve: bool) -> Fixture {
        let orders = Arc::new(InMemoryOrderRepository::new());
        let customers = Arc::new(InMemoryCustomerRepository::new());
        let payments = Arc::new(StubPayment::new(approve));
        let notifier = Arc::new(RecordingNotifier::default());
        let metrics = Arc::new(Metrics::new().unwrap());

        let customer = Customer::new(
            CustomerId::new(Uuid::new_v4()),
            "John Doe",
            "john@example.com",
        )
        .unwrap();
        customers.save(customer.clone()).await.unwrap();

        let handler = OrderCommandHandler::new(
            orders.clone(),
            customers,
            payments.clone(),
            notifier.clone(),
            metrics.clone(),
        )
        .with_id_generator(Arc::new(SequentialIds::default()))
        .with_clock(Arc::new(FixedClock(now())));

        Fixture {
            handler,
            orders,
            payments,
            notifier,
            metrics,
            customer,
        }
    }

    fn product_one(customer_id: CustomerId) -> CreateOrder {
        CreateOrder {
            customer_id,
            items: vec![CreateOrderItem::new("Product 1", dec!(10.00), "USD", 2)],
        }
    }

    #[tokio::test]
    async fn test_create_order() {
        let fx = fixture(true).await;
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();

        assert_eq!(order.id(), OrderId::new(Uuid::from_u128(1)));
        assert_eq!(order.status(), OrderStatus::Created);
        assert_eq!(order.created_at(), now());
        assert_eq!(order.total_amount().unwrap(), Money::of(dec!(20.00), "USD").unwrap());
        assert_eq!(fx.metrics.orders_created.get(), 1);

        let stored = fx.handler.get_order(order.id()).await.unwrap();
        assert_eq!(stored.status(), OrderStatus::Created);
    }

    #[tokio::test]
    async fn test_create_order_for_unknown_customer() {
        let fx = fixture(true).await;
        let unknown = CustomerId::new(Uuid::new_v4());
        let result = fx.handler.create_order(product_one(unknown)).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::CustomerNotFound(id) if id == unknown
        ));
    }

    #[tokio::test]
    async fn test_create_order_propagates_validation_errors() {
        let fx = fixture(true).await;

        let empty = CreateOrder {
            customer_id: fx.customer.id(),
            items: vec![],
        };
        assert!(matches!(
            fx.handler.create_order(empty).await.unwrap_err(),
            OrderCommandError::Order(OrderError::EmptyOrder)
        ));

        let negative = CreateOrder {
            customer_id: fx.customer.id(),
            items: vec![CreateOrderItem::new("Product 1", dec!(-1), "USD", 1)],
        };
        assert!(matches!(
            fx.handler.create_order(negative).await.unwrap_err(),
            OrderCommandError::Order(OrderError::InvalidAmount(_))
        ));

        let zero_qty = CreateOrder {
            customer_id: fx.customer.id(),
            items: vec![CreateOrderItem::new("Product 1", dec!(1), "USD", 0)],
        };
        assert!(matches!(
            fx.handler.create_order(zero_qty).await.unwrap_err(),
            OrderCommandError::Order(OrderError::InvalidQuantity(0))
        ));
    }

    #[tokio::test]
    async fn test_confirm_order_pays_and_notifies() {
        let fx = fixture(true).await;
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();

        let confirmed = fx.handler.confirm_order(order.id()).await.unwrap();

        assert_eq!(confirmed.status(), OrderStatus::Paid);
        assert_eq!(confirmed.confirmed_at(), Some(now()));

        let calls = fx.payments.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, format!("PAY-{}", order.id()));
        assert_eq!(calls[0].1, Money::of(dec!(20.00), "USD").unwrap());

        let sent = fx.notifier.sent();
        assert_eq!(sent.len(), 1);
        let (address, order_id, details) = &sent[0];
        assert_eq!(address, "john@example.com");
        assert_eq!(order_id, &order.id().to_string());
        assert!(details.contains("Product 1"));
        assert!(details.contains("- Product 1 (Qty: 2, Price: 20.00 USD)"));
        assert!(details.contains("Total Amount: 20.00 USD"));

        let stored = fx.orders.find_by_id(&order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Paid);
        assert_eq!(stored.confirmed_at(), Some(now()));

        assert_eq!(
            fx.metrics.order_confirmations.with_label_values(&[OUTCOME_PAID]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_declined_payment_leaves_order_confirmed() {
        let fx = fixture(false).await;
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();

        let result = fx.handler.confirm_order(order.id()).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::PaymentFailed(id) if id == order.id()
        ));

        // No compensation: the CONFIRMED write from before the payment stays
        let stored = fx.orders.find_by_id(&order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Confirmed);
        assert_eq!(stored.confirmed_at(), Some(now()));

        assert_eq!(fx.payments.calls().len(), 1);
        assert!(fx.notifier.sent().is_empty());
        assert_eq!(
            fx.metrics
                .order_confirmations
                .with_label_values(&[OUTCOME_PAYMENT_FAILED])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn test_confirm_non_settlement_currency_fails_after_confirmed_write() {
        let fx = fixture(true).await;
        let order = fx
            .handler
            .create_order(CreateOrder {
                customer_id: fx.customer.id(),
                items: vec![CreateOrderItem::new("Croissant", dec!(2.50), "EUR", 3)],
            })
            .await
            .unwrap();

        let result = fx.handler.confirm_order(order.id()).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::Order(OrderError::CurrencyMismatch { .. })
        ));

        let stored = fx.orders.find_by_id(&order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Confirmed);
        assert_eq!(stored.confirmed_at(), Some(now()));

        assert!(fx.payments.calls().is_empty());
        assert!(fx.notifier.sent().is_empty());
        assert_eq!(
            fx.metrics.order_confirmations.with_label_values(&[OUTCOME_REJECTED]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_confirm_overflowing_total_is_an_error() {
        let fx = fixture(true).await;
        let order = fx
            .handler
            .create_order(CreateOrder {
                customer_id: fx.customer.id(),
                items: vec![CreateOrderItem::new("Bulk", rust_decimal::Decimal::MAX, "USD", 2)],
            })
            .await
            .unwrap();

        let result = fx.handler.confirm_order(order.id()).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::Order(OrderError::AmountOverflow(_))
        ));
        assert!(fx.payments.calls().is_empty());
        assert_eq!(
            fx.metrics.order_confirmations.with_label_values(&[OUTCOME_REJECTED]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_retry_after_declined_payment_is_rejected() {
        let fx = fixture(false).await;
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();

        let _ = fx.handler.confirm_order(order.id()).await;
        let retry = fx.handler.confirm_order(order.id()).await;

        assert!(matches!(
            retry.unwrap_err(),
            OrderCommandError::Order(OrderError::InvalidTransition {
                transition: Transition::Confirm,
                status: OrderStatus::Confirmed,
                ..
            })
        ));
        assert_eq!(fx.payments.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_paid_order_fails_before_payment() {
        let fx = fixture(true).await;
        let paid = Order::new(
            OrderId::new(Uuid::new_v4()),
            fx.customer.id(),
            vec![OrderItem::new("Product 1", Money::of(dec!(10.00), "USD").unwrap(), 2).unwrap()],
            now(),
        )
        .unwrap()
        .confirm(now())
        .unwrap()
        .mark_as_paid()
        .unwrap();
        fx.orders.save(paid.clone()).await.unwrap();

        let result = fx.handler.confirm_order(paid.id()).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::Order(OrderError::InvalidTransition {
                status: OrderStatus::Paid,
                ..
            })
        ));
        assert!(fx.payments.calls().is_empty());
        assert!(fx.notifier.sent().is_empty());
        assert_eq!(
            fx.metrics.order_confirmations.with_label_values(&[OUTCOME_REJECTED]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_confirm_unknown_order() {
        let fx = fixture(true).await;
        let missing = OrderId::new(Uuid::new_v4());

        let result = fx.handler.confirm_order(missing).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::OrderNotFound(id) if id == missing
        ));
        assert!(fx.payments.calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_order_with_missing_customer() {
        let fx = fixture(true).await;
        let orphan_customer = CustomerId::new(Uuid::new_v4());
        let order = Order::new(
            OrderId::new(Uuid::new_v4()),
            orphan_customer,
            vec![OrderItem::new("Product 1", Money::of(dec!(1), "USD").unwrap(), 1).unwrap()],
            now(),
        )
        .unwrap();
        fx.orders.save(order.clone()).await.unwrap();

        let result = fx.handler.confirm_order(order.id()).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::CustomerNotFound(id) if id == orphan_customer
        ));

        // Nothing was written
        let stored = fx.orders.find_by_id(&order.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Created);
        assert!(fx.payments.calls().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_confirmation() {
        let fx = fixture(true).await;
        fx.notifier.fail.store(true, Ordering::SeqCst);
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();

        let confirmed = fx.handler.confirm_order(order.id()).await.unwrap();

        assert_eq!(confirmed.status(), OrderStatus::Paid);
        assert_eq!(fx.notifier.sent().len(), 1);
        assert_eq!(fx.metrics.notifications_failed.get(), 1);
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let fx = fixture(true).await;
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();

        let cancelled = fx.handler.cancel_order(order.id()).await.unwrap();
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);

        let stored = fx.handler.get_order(order.id()).await.unwrap();
        assert_eq!(stored.status(), OrderStatus::Cancelled);
        assert_eq!(fx.metrics.order_cancellations.get(), 1);
    }

    #[tokio::test]
    async fn test_cancel_paid_order_fails() {
        let fx = fixture(true).await;
        let order = fx
            .handler
            .create_order(product_one(fx.customer.id()))
            .await
            .unwrap();
        fx.handler.confirm_order(order.id()).await.unwrap();

        let result = fx.handler.cancel_order(order.id()).await;

        assert!(matches!(
            result.unwrap_err(),
            OrderCommandError::Order(OrderError::InvalidTransition {
                transition: Transition::Cancel,
                status: OrderStatus::Paid,
                ..
            })
        ));
        let stored = fx.handler.get_order(order.id()).await.unwrap();
        assert_eq!(stored.status(), OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_get_unknown_order() {
        let fx = fixture(true).await;
        let result = fx.handler.get_order(OrderId::new(Uuid::new_v4())).await;
        assert!(matches!(result.unwrap_err(), OrderCommandError::OrderNotFound(_)));
    }

    #[test]
    fn test_payment_reference_is_stable() {
        let id = OrderId::new(Uuid::from_u128(42));
        assert_eq!(payment_reference(id), payment_reference(id));
        assert_eq!(payment_reference(id), format!("PAY-{}", id));
    }
}
