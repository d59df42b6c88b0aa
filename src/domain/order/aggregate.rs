use chrono::{DateTime, Utc};

use crate::domain::identity::{CustomerId, OrderId};
use super::errors::OrderError;
use super::value_objects::{Money, OrderItem, OrderStatus, Transition};

/// Currency every order total is computed in
pub const SETTLEMENT_CURRENCY: &str = "USD";

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// The order owns its lifecycle. Transitions consume the current value and
// hand back the next one (or a typed error); callers persist the result
// wholesale.
//
//   CREATED --confirm--> CONFIRMED --mark_as_paid--> PAID
//      |                     |
//      +------cancel---------+-----> CANCELLED
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a new order in CREATED status
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        Ok(Self {
            id,
            customer_id,
            items,
            status: OrderStatus::Created,
            created_at,
            confirmed_at: None,
        })
    }

    /// Rebuild a stored order by replaying the transitions that lead to
    /// `status`. The status field is never assigned directly.
    pub fn restore(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
        status: OrderStatus,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, OrderError> {
        let order = Self::new(id, customer_id, items, created_at)?;

        match (status, confirmed_at) {
            (OrderStatus::Created, _) => Ok(order),
            (OrderStatus::Confirmed, Some(at)) => order.confirm(at),
            (OrderStatus::Paid, Some(at)) => order.confirm(at)?.mark_as_paid(),
            (OrderStatus::Cancelled, Some(at)) => order.confirm(at)?.cancel(),
            (OrderStatus::Cancelled, None) => order.cancel(),
            (OrderStatus::Confirmed | OrderStatus::Paid, None) => {
                Err(OrderError::MissingConfirmationTime(status))
            }
        }
    }

    pub fn confirm(mut self, at: DateTime<Utc>) -> Result<Self, OrderError> {
        if self.status != OrderStatus::Created {
            return Err(self.rejected(
                Transition::Confirm,
                "only created orders can be confirmed",
            ));
        }

        self.status = OrderStatus::Confirmed;
        self.confirmed_at = Some(at);
        Ok(self)
    }

    pub fn mark_as_paid(mut self) -> Result<Self, OrderError> {
        if self.status != OrderStatus::Confirmed {
            return Err(self.rejected(
                Transition::MarkAsPaid,
                "only confirmed orders can be marked as paid",
            ));
        }

        self.status = OrderStatus::Paid;
        Ok(self)
    }

    pub fn cancel(mut self) -> Result<Self, OrderError> {
        if self.status == OrderStatus::Paid {
            return Err(self.rejected(Transition::Cancel, "paid orders cannot be cancelled"));
        }

        self.status = OrderStatus::Cancelled;
        Ok(self)
    }

    /// Sum of the line totals, folded from zero in the settlement currency.
    /// Fails with `CurrencyMismatch` when any item is priced in another currency,
    /// and with `AmountOverflow` when the sum leaves the decimal range.
    pub fn total_amount(&self) -> Result<Money, OrderError> {
        self.items
            .iter()
            .try_fold(Money::zero(SETTLEMENT_CURRENCY), |total, item| {
                total.add(&item.line_total()?)
            })
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, OrderStatus::Confirmed | OrderStatus::Paid)
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    fn rejected(&self, transition: Transition, reason: &'static str) -> OrderError {
        OrderError::InvalidTransition {
            transition,
            status: self.status,
            reason,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
