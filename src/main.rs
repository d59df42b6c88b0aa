use std::sync::Arc;

use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_lifecycle::adapters::{
    InMemoryCustomerRepository, InMemoryOrderRepository, LoggingNotificationService,
    SimulatedPaymentService,
};
use order_lifecycle::config::AppConfig;
use order_lifecycle::domain::customer::{CustomerCommandHandler, RegisterCustomer};
use order_lifecycle::domain::order::{
    CreateOrder, CreateOrderItem, OrderCommandError, OrderCommandHandler,
};
use order_lifecycle::metrics::Metrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins; ORDER_LOG_FILTER is the fallback
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("🚀 Starting order lifecycle demo");
    tracing::debug!(?config, "Loaded configuration");

    // === 1. Wire adapters ===
    let orders = Arc::new(InMemoryOrderRepository::new());
    let customers = Arc::new(InMemoryCustomerRepository::new());
    let payments = Arc::new(SimulatedPaymentService::new(
        config.payment_success_rate,
        config.payment_latency,
    )?);
    let notifications = Arc::new(LoggingNotificationService);

    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    let customer_handler = CustomerCommandHandler::new(customers.clone());
    let order_handler = OrderCommandHandler::new(
        orders,
        customers,
        payments,
        notifications,
        metrics.clone(),
    );

    // === 2. Register a customer ===
    let customer = customer_handler
        .register_customer(RegisterCustomer::new("John Doe", "john@example.com"))
        .await?;
    tracing::info!("✅ Customer registered: {}", customer.id());

    // === 3. Place an order ===
    let order = order_handler
        .create_order(CreateOrder {
            customer_id: customer.id(),
            items: vec![
                CreateOrderItem::new("Product 1", Decimal::new(1000, 2), "USD", 2),
                CreateOrderItem::new("Product 2", Decimal::new(1500, 2), "USD", 1),
            ],
        })
        .await?;
    tracing::info!("✅ Order created: {} (total {})", order.id(), order.total_amount()?);

    // === 4. Confirm and pay ===
    match order_handler.confirm_order(order.id()).await {
        Ok(paid) => tracing::info!("✅ Order {} is {}", paid.id(), paid.status()),
        Err(OrderCommandError::PaymentFailed(id)) => {
            let stored = order_handler.get_order(id).await?;
            tracing::warn!("⚠️ Payment declined, order {} left {}", id, stored.status());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("🎉 Demo complete!");

    Ok(())
}
