use crate::domain::identity::CustomerId;
use super::errors::CustomerError;
use super::value_objects::Email;

// ============================================================================
// Customer - identity plus contact details
// ============================================================================
//
// Orders hold only the CustomerId; the customer is looked up when a contact
// address is needed.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: Email,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, CustomerError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CustomerError::EmptyName);
        }
        let email = Email::parse(email)?;

        Ok(Self { id, name, email })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// Customers are equal when their ids are equal
impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Customer {}

// ============================================================================
// Unit Tests
// ============================================================================
