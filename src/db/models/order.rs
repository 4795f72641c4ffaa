use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{current_timestamp, money, new_id};
use crate::api::{AppError, AppResult};
use crate::db::{Direction, FilterKind, Resource};
use crate::export::CsvRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Flujo de cocina: pending → preparing → ready → served → paid.
    /// Se puede cancelar en cualquier momento antes de servir.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing)
                | (Preparing, Ready)
                | (Ready, Served)
                | (Served, Paid)
                | (Pending | Preparing | Ready, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub food_item_id: String,
    pub name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn subtotal(&self) -> AppResult<Decimal> {
        money::mul("subtotal", self.unit_price, Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub table_id: Option<String>,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: i64,
}

impl Order {
    pub fn new(table_id: Option<String>, items: Vec<OrderItem>) -> AppResult<Self> {
        if items.is_empty() {
            return Err(AppError::validation_field("items", "an order needs at least one item"));
        }
        if items.iter().any(|item| item.quantity <= 0) {
            return Err(AppError::validation_field("quantity", "must be greater than 0"));
        }
        if items.iter().any(|item| item.quantity > money::MAX_QUANTITY) {
            return Err(AppError::validation_field(
                "quantity",
                &format!("must not exceed {}", money::MAX_QUANTITY),
            ));
        }

        let subtotals = items.iter().map(OrderItem::subtotal).collect::<AppResult<Vec<_>>>()?;
        let total = money::sum("total", subtotals)?;
        Ok(Order {
            id: new_id(),
            table_id,
            items,
            status: OrderStatus::Pending,
            total,
            created_at: current_timestamp(),
        })
    }

    /// Día (UTC) en que se creó el pedido
    pub fn day(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp(self.created_at, 0).map(|dt| dt.date_naive())
    }
}

impl Resource for Order {
    const TABLE: &'static str = "orders";
    const LABEL: &'static str = "Order";
    const FILTERS: &'static [(&'static str, FilterKind)] =
        &[("status", FilterKind::Text), ("table_id", FilterKind::Text)];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("created_at", Direction::Desc)
    }
}

impl CsvRecord for Order {
    const HEADERS: &'static [&'static str] =
        &["id", "table_id", "status", "items", "total", "created_at"];

    fn csv_row(&self) -> Vec<String> {
        let items = self
            .items
            .iter()
            .map(|item| format!("{} x{}", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join("; ");

        vec![
            self.id.clone(),
            self.table_id.clone().unwrap_or_default(),
            self.status.to_string(),
            items,
            self.total.to_string(),
            DateTime::from_timestamp(self.created_at, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, cents: i64) -> OrderItem {
        OrderItem {
            food_item_id: format!("f-{name}"),
            name: name.into(),
            quantity,
            unit_price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let order = Order::new(None, vec![item("Paella", 2, 1450), item("Agua", 3, 150)]).unwrap();
        assert_eq!(order.total, Decimal::new(3350, 2));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn empty_orders_and_zero_quantities_are_rejected() {
        assert!(Order::new(None, vec![]).is_err());
        assert!(Order::new(None, vec![item("Paella", 0, 1450)]).is_err());
        assert!(Order::new(None, vec![item("Paella", 10_000, 1450)]).is_err());
    }

    #[test]
    fn huge_amounts_fail_validation_instead_of_overflowing() {
        let mut huge = item("Caviar", 2, 0);
        huge.unit_price = Decimal::MAX;
        let err = Order::new(None, vec![huge]).unwrap_err();
        assert!(matches!(err, AppError::ValidationWithField { .. }));

        let mut half = item("Caviar", 1, 0);
        half.unit_price = Decimal::MAX;
        assert!(Order::new(None, vec![half.clone(), half]).is_err());
    }

    #[test]
    fn status_flow() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Preparing));
        assert!(Served.can_transition_to(Paid));
        assert!(Ready.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Paid));
        assert!(!Served.can_transition_to(Cancelled));
        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }
}
