use rust_decimal::Decimal;

use crate::domain::identity::CustomerId;

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

/// Place a new order for an existing customer
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub items: Vec<CreateOrderItem>,
}

/// Raw line item as submitted, validated when the order is built
#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub product_name: String,
    pub unit_price: Decimal,
    pub currency: String,
    pub quantity: i32,
}

impl CreateOrderItem {
    pub fn new(
        product_name: impl Into<String>,
        unit_price: Decimal,
        currency: impl Into<String>,
        quantity: i32,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            unit_price,
            currency: currency.into(),
            quantity,
        }
    }
}
