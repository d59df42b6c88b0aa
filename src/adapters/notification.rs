use anyhow::Result;
use async_trait::async_trait;

use crate::domain::ports::NotificationService;

/// Writes confirmation messages to the log instead of sending mail
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotificationService;

#[async_trait]
impl NotificationService for LoggingNotificationService {
    async fn send_order_confirmation(
        &self,
        address: &str,
        order_id: &str,
        details: &str,
    ) -> Result<()> {
        tracing::info!(
            recipient = %address,
            subject = %format!("Order Confirmation - {}", order_id),
            "📧 Sending order confirmation\n{}",
            details
        );
        Ok(())
    }
}
