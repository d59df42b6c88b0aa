use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::customer::Customer;
use crate::domain::identity::{CustomerId, OrderId};
use crate::domain::order::{Money, Order, OrderError, OrderItem, OrderStatus};
use crate::domain::ports::{CustomerRepository, OrderRepository};

// ============================================================================
// In-Memory Repositories
// ============================================================================
//
// Aggregates are flattened into plain records and kept as JSON text, keyed
// by id. Loading parses the record and rebuilds the aggregate through its
// constructors; order status is replayed via `Order::restore`, never set.
//
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct OrderRecord {
    id: String,
    customer_id: String,
    status: OrderStatus,
    items: Vec<OrderItemRecord>,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OrderItemRecord {
    product_name: String,
    unit_price: Decimal,
    currency: String,
    quantity: i32,
}

impl OrderRecord {
    fn from_order(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            status: order.status(),
            items: order
                .items()
                .iter()
                .map(|item| OrderItemRecord {
                    product_name: item.product_name().to_string(),
                    unit_price: item.unit_price().amount(),
                    currency: item.unit_price().currency().to_string(),
                    quantity: item.quantity(),
                })
                .collect(),
            created_at: order.created_at(),
            confirmed_at: order.confirmed_at(),
        }
    }

    fn into_order(self) -> Result<Order> {
        let id: OrderId = self.id.parse()?;
        let customer_id: CustomerId = self.customer_id.parse()?;

        let items = self
            .items
            .into_iter()
            .map(|item| {
                let unit_price = Money::of(item.unit_price, item.currency)?;
                OrderItem::new(item.product_name, unit_price, item.quantity)
            })
            .collect::<Result<Vec<_>, OrderError>>()
            .with_context(|| format!("Invalid line item in stored order {}", id))?;

        Order::restore(
            id,
            customer_id,
            items,
            self.created_at,
            self.status,
            self.confirmed_at,
        )
        .with_context(|| format!("Failed to rehydrate order {}", id))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CustomerRecord {
    id: String,
    name: String,
    email: String,
}

impl CustomerRecord {
    fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id().to_string(),
            name: customer.name().to_string(),
            email: customer.email().to_string(),
        }
    }

    fn into_customer(self) -> Result<Customer> {
        let id: CustomerId = self.id.parse()?;
        Customer::new(id, self.name, self.email)
            .with_context(|| format!("Failed to rehydrate customer {}", id))
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    rows: RwLock<HashMap<OrderId, String>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
        let rows = self.rows.read().await;
        let Some(json) = rows.get(id) else {
            return Ok(None);
        };

        let record: OrderRecord = serde_json::from_str(json)
            .with_context(|| format!("Corrupt order record {}", id))?;
        record.into_order().map(Some)
    }

    async fn save(&self, order: Order) -> Result<Order> {
        let record = OrderRecord::from_order(&order);
        let json = serde_json::to_string(&record)?;

        self.rows.write().await.insert(order.id(), json);

        tracing::debug!(
            order_id = %order.id(),
            status = %order.status(),
            "Stored order"
        );

        record.into_order()
    }
}

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    rows: RwLock<HashMap<CustomerId, String>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>> {
        let rows = self.rows.read().await;
        let Some(json) = rows.get(id) else {
            return Ok(None);
        };

        let record: CustomerRecord = serde_json::from_str(json)
            .with_context(|| format!("Corrupt customer record {}", id))?;
        record.into_customer().map(Some)
    }

    async fn save(&self, customer: Customer) -> Result<Customer> {
        let record = CustomerRecord::from_customer(&customer);
        let json = serde_json::to_string(&record)?;

        self.rows.write().await.insert(customer.id(), json);
        tracing::debug!(customer_id = %customer.id(), "Stored customer");

        record.into_customer()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
