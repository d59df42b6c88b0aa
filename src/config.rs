use std::time::Duration;

use anyhow::{bail, Context, Result};

// ============================================================================
// Application Configuration
// ============================================================================
//
// Read from environment variables, falling back to defaults:
//
//   ORDER_PAYMENT_SUCCESS_RATE  probability in [0, 1]          (0.95)
//   ORDER_PAYMENT_LATENCY_MS    simulated gateway delay in ms  (100)
//   ORDER_LOG_FILTER            filter used when RUST_LOG unset
//
// ============================================================================

pub const DEFAULT_LOG_FILTER: &str = "info,order_lifecycle=debug";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub payment_success_rate: f64,
    pub payment_latency: Duration,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            payment_success_rate: 0.95,
            payment_latency: Duration::from_millis(100),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("ORDER_PAYMENT_SUCCESS_RATE") {
            let rate: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("ORDER_PAYMENT_SUCCESS_RATE is not a number: {}", raw))?;
            if !(0.0..=1.0).contains(&rate) {
                bail!("ORDER_PAYMENT_SUCCESS_RATE must be within [0, 1], got {}", rate);
            }
            config.payment_success_rate = rate;
        }

        if let Some(raw) = lookup("ORDER_PAYMENT_LATENCY_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("ORDER_PAYMENT_LATENCY_MS is not a whole number: {}", raw))?;
            config.payment_latency = Duration::from_millis(millis);
        }

        if let Some(filter) = lookup("ORDER_LOG_FILTER").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
