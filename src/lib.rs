// ============================================================================
// Order Lifecycle
// ============================================================================
//
// - domain/   Order and Customer aggregates, identifiers, ports, handlers
// - adapters/ In-memory repositories, simulated payment, logging notifier
// - metrics/  Prometheus counters for the lifecycle
// - config    Environment-driven settings
//
// ============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod metrics;
