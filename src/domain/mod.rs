// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with:
// - Value objects
// - Commands
// - Errors
// - Aggregate implementation
// - Command handler
//
// Shared identifiers live in `identity`, and the contracts for storage,
// payment and notification in `ports`.
//
// ============================================================================

pub mod identity;
pub mod ports;
pub mod order;
pub mod customer;
