// ============================================================================
// Order Domain - Business Logic for the Order Aggregate
// ============================================================================
//
// - Value objects (Money, OrderItem, OrderStatus)
// - Commands (CreateOrder)
// - Errors (OrderError, OrderCommandError)
// - Aggregate (Order state machine)
// - Command Handler (create / get / cancel / confirm workflow)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
