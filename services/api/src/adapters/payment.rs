//! services/api/src/adapters/payment.rs
//!
//! A stand-in payment gateway. It waits a fixed delay to mimic a checkout round
//! trip and then approves the charge. No money moves.

use async_trait::async_trait;
use chrono::Utc;
use recipe_curator_core::{
    domain::{PaymentReceipt, SubscriptionType},
    ports::{PaymentProvider, PortError, PortResult},
};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SimulatedPaymentProvider {
    delay: Duration,
}

impl SimulatedPaymentProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProvider for SimulatedPaymentProvider {
    async fn charge(&self, plan: SubscriptionType) -> PortResult<PaymentReceipt> {
        let amount_cents = plan.price_cents().ok_or_else(|| {
            PortError::Unexpected(format!("The '{}' plan cannot be purchased", plan))
        })?;

        info!(plan = %plan, amount_cents, "Processing simulated payment");
        tokio::time::sleep(self.delay).await;

        let paid_at = Utc::now();
        Ok(PaymentReceipt {
            plan,
            amount_cents,
            reference: format!("sim-{}-{}", plan, paid_at.timestamp_millis()),
            paid_at,
        })
    }
}
