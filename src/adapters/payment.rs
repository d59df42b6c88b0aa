use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use rand::Rng;

use crate::domain::order::Money;
use crate::domain::ports::PaymentService;

// ============================================================================
// Simulated Payment Gateway
// ============================================================================
//
// Stands in for a real provider: waits `latency`, then approves with
// probability `success_rate`.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct SimulatedPaymentService {
    success_rate: f64,
    latency: Duration,
}

impl SimulatedPaymentService {
    pub fn new(success_rate: f64, latency: Duration) -> Result<Self> {
        if !(0.0..=1.0).contains(&success_rate) {
            bail!("Payment success rate must be within [0, 1], got {}", success_rate);
        }

        Ok(Self {
            success_rate,
            latency,
        })
    }
}

#[async_trait]
impl PaymentService for SimulatedPaymentService {
    async fn process_payment(&self, reference: &str, amount: &Money) -> bool {
        tokio::time::sleep(self.latency).await;

        let approved = rand::thread_rng().gen_bool(self.success_rate);

        tracing::info!(
            payment_reference = %reference,
            amount = %amount,
            result = if approved { "SUCCESS" } else { "FAILED" },
            "Processed payment"
        );

        approved
    }
}
