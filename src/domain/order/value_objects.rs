use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Non-negative decimal amount tagged with a currency code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn of(amount: Decimal, currency: impl Into<String>) -> Result<Self, OrderError> {
        if amount < Decimal::ZERO {
            return Err(OrderError::InvalidAmount(amount));
        }

        Ok(Self {
            amount,
            currency: currency.into(),
        })
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency: currency.into(),
        }
    }

    /// Sum of two amounts in the same currency (exact, case-sensitive match)
    pub fn add(&self, other: &Money) -> Result<Money, OrderError> {
        if self.currency != other.currency {
            return Err(OrderError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }

        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| OrderError::AmountOverflow(self.currency.clone()))?;

        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }

    pub fn times(&self, count: u32) -> Result<Money, OrderError> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(count))
            .ok_or_else(|| OrderError::AmountOverflow(self.currency.clone()))?;

        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Line item of an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    product_name: String,
    unit_price: Money,
    quantity: i32,
}

impl OrderItem {
    pub fn new(
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i32,
    ) -> Result<Self, OrderError> {
        let product_name = product_name.into();
        if product_name.trim().is_empty() {
            return Err(OrderError::InvalidProductName);
        }
        if quantity <= 0 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        Ok(Self {
            product_name,
            unit_price,
            quantity,
        })
    }

    pub fn line_total(&self) -> Result<Money, OrderError> {
        // quantity > 0 is enforced at construction
        self.unit_price.times(self.quantity.unsigned_abs())
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn unit_price(&self) -> &Money {
        &self.unit_price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Paid,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

/// Lifecycle operation attempted on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Confirm,
    MarkAsPaid,
    Cancel,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Confirm => "confirm",
            Transition::MarkAsPaid => "mark as paid",
            Transition::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
