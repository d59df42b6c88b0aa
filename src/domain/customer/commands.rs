// ============================================================================
// Customer Domain Commands
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegisterCustomer {
    pub name: String,
    pub email: String,
}

impl RegisterCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
