use std::fmt;

use super::errors::CustomerError;

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Customer email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Minimal validity check: must contain both '@' and '.'
    pub fn parse(email: impl Into<String>) -> Result<Self, CustomerError> {
        let email = email.into();
        if !email.contains('@') || !email.contains('.') {
            return Err(CustomerError::InvalidEmail(email));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
