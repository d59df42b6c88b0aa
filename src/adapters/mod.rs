// ============================================================================
// Adapters - concrete implementations of the domain ports
// ============================================================================

mod notification;
mod payment;
mod persistence;

pub use notification::LoggingNotificationService;
pub use payment::SimulatedPaymentService;
pub use persistence::{InMemoryCustomerRepository, InMemoryOrderRepository};
