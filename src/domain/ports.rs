use anyhow::Result;
use async_trait::async_trait;

use super::customer::Customer;
use super::identity::{CustomerId, OrderId};
use super::order::{Money, Order};

// ============================================================================
// Ports - contracts the domain needs from the outside world
// ============================================================================
//
// Adapters live in src/adapters/. Storage failures are reported as
// anyhow errors; the command handlers wrap them.
//
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>>;

    /// Persist the order and return the stored representation
    async fn save(&self, order: Order) -> Result<Order>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>>;

    async fn save(&self, customer: Customer) -> Result<Customer>;
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// `true` means the charge went through; anything else is a failure
    async fn process_payment(&self, reference: &str, amount: &Money) -> bool;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_order_confirmation(
        &self,
        address: &str,
        order_id: &str,
        details: &str,
    ) -> Result<()>;
}
