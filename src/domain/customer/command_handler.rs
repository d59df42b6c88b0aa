use std::sync::Arc;

use crate::domain::identity::{CustomerId, IdGenerator, RandomIdGenerator};
use crate::domain::ports::CustomerRepository;

use super::aggregate::Customer;
use super::commands::RegisterCustomer;
use super::errors::CustomerCommandError;

// ============================================================================
// Customer Command Handler
// ============================================================================

pub struct CustomerCommandHandler {
    customers: Arc<dyn CustomerRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl CustomerCommandHandler {
    pub fn new(customers: Arc<dyn CustomerRepository>) -> Self {
        Self {
            customers,
            ids: Arc::new(RandomIdGenerator),
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Validate and persist a new customer under a fresh id
    pub async fn register_customer(
        &self,
        command: RegisterCustomer,
    ) -> Result<Customer, CustomerCommandError> {
        let id = CustomerId::new(self.ids.next_id());
        let customer = Customer::new(id, command.name, command.email)?;
        let customer = self.customers.save(customer).await?;

        tracing::info!(customer_id = %id, "Customer registered");
        Ok(customer)
    }

    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, CustomerCommandError> {
        self.customers
            .find_by_id(&id)
            .await?
            .ok_or(CustomerCommandError::NotFound(id))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
