use crate::domain::identity::CustomerId;

// ============================================================================
// Customer Business Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CustomerError {
    #[error("Customer name cannot be empty")]
    EmptyName,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CustomerCommandError {
    #[error("Customer not found: {0}")]
    NotFound(CustomerId),

    #[error(transparent)]
    Customer(#[from] CustomerError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
