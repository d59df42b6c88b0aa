use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for the order lifecycle
// ============================================================================
//
// Tracks:
// - Orders created and cancelled
// - Confirmation outcomes (paid, payment_failed, rejected)
// - Payment call latency
// - Notifications that could not be delivered
//
// ============================================================================

pub const OUTCOME_PAID: &str = "paid";
pub const OUTCOME_PAYMENT_FAILED: &str = "payment_failed";
pub const OUTCOME_REJECTED: &str = "rejected";

pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub order_cancellations: IntCounter,
    pub order_confirmations: IntCounterVec,
    pub payment_duration: Histogram,
    pub notifications_failed: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_cancellations = IntCounter::new(
            "order_cancellations_total",
            "Total orders cancelled",
        )?;
        registry.register(Box::new(order_cancellations.clone()))?;

        let order_confirmations = IntCounterVec::new(
            Opts::new("order_confirmations_total", "Order confirmation attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(order_confirmations.clone()))?;

        let payment_duration = Histogram::with_opts(
            HistogramOpts::new("payment_duration_seconds", "Payment service call duration")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(payment_duration.clone()))?;

        let notifications_failed = IntCounter::new(
            "notifications_failed_total",
            "Confirmation notifications that failed to send",
        )?;
        registry.register(Box::new(notifications_failed.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_cancellations,
            order_confirmations,
            payment_duration,
            notifications_failed,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_confirmation(&self, outcome: &str) {
        self.order_confirmations.with_label_values(&[outcome]).inc();
    }

    pub fn observe_payment(&self, duration_secs: f64) {
        self.payment_duration.observe(duration_secs);
    }
}
