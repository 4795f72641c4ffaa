//! # API de Finanzas
//!
//! Gastos (CRUD) y resumen de ingresos/gastos. Solo cuentan como ingresos los
//! pedidos pagados.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::crud;
use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{money, DateRange, Expense, Order, OrderStatus};
use crate::db::Query;

#[derive(Deserialize)]
struct RangeParams {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DayTotals {
    pub day: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct FinanceSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenses: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
    pub paid_orders: usize,
    /// Gastos por categoría, en orden alfabético
    pub by_category: Vec<CategoryTotal>,
    /// Ingresos y gastos por día, en orden cronológico
    pub by_day: Vec<DayTotals>,
}

pub fn summarize(orders: &[Order], expenses: &[Expense], range: DateRange) -> AppResult<FinanceSummary> {
    let mut summary = FinanceSummary::default();
    let mut by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

    for order in orders.iter().filter(|o| o.status == OrderStatus::Paid) {
        let Some(day) = order.day().filter(|d| range.contains(*d)) else {
            continue;
        };
        summary.revenue = money::add("revenue", summary.revenue, order.total)?;
        summary.paid_orders += 1;
        let totals = by_day.entry(day).or_default();
        totals.revenue = money::add("revenue", totals.revenue, order.total)?;
    }

    for expense in expenses {
        let day = expense.day()?;
        if !range.contains(day) {
            continue;
        }
        summary.expenses = money::add("expenses", summary.expenses, expense.amount)?;
        let category = by_category.entry(expense.category.as_str()).or_default();
        *category = money::add("expenses", *category, expense.amount)?;
        let totals = by_day.entry(day).or_default();
        totals.expenses = money::add("expenses", totals.expenses, expense.amount)?;
    }

    summary.net = summary
        .revenue
        .checked_sub(summary.expenses)
        .ok_or_else(|| AppError::validation_field("net", "amount is too large"))?;
    summary.by_category = by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    summary.by_day = by_day
        .into_iter()
        .map(|(day, totals)| DayTotals {
            day: day.to_string(),
            ..totals
        })
        .collect();
    Ok(summary)
}

async fn finance_summary(
    ctx: web::Data<AppContext>,
    params: web::Query<RangeParams>,
) -> AppResult<HttpResponse> {
    let range = DateRange::parse(params.from.as_deref(), params.to.as_deref())?;
    let orders = ctx
        .repo::<Order>()
        .list(Query::new().eq("status", OrderStatus::Paid.to_string()))
        .await?;
    let expenses = ctx.repo::<Expense>().list(Query::new()).await?;

    let summary = summarize(&orders, &expenses, range)?;
    tracing::debug!(revenue = %summary.revenue, expenses = %summary.expenses, "Finance summary computed");
    Ok(HttpResponse::Ok().json(summary))
}

/// # Rutas
/// - `GET|POST /expenses` (`category`), `GET|PUT|DELETE /expenses/{id}`
/// - `GET /finance/summary?from=&to=`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crud::collection::<Expense>("/expenses"));
    cfg.service(crud::member::<Expense>("/expenses"));
    cfg.service(web::resource("/finance/summary").route(web::get().to(finance_summary)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderItem;

    fn paid_order(total: i64, day: &str) -> Order {
        let mut order = Order::new(
            None,
            vec![OrderItem {
                food_item_id: "f1".into(),
                name: "Paella".into(),
                quantity: 1,
                unit_price: Decimal::from(total),
            }],
        )
        .unwrap();
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap();
        order.created_at = date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp();
        order.status = OrderStatus::Paid;
        order
    }

    fn expense(category: &str, amount: i64, date: &str) -> Expense {
        Expense {
            id: format!("{category}-{date}"),
            category: category.into(),
            description: None,
            amount: Decimal::from(amount),
            date: date.into(),
            created_at: 0,
        }
    }

    #[test]
    fn summary_counts_paid_orders_and_expenses_in_range() {
        let mut pending = paid_order(99, "2024-03-01");
        pending.status = OrderStatus::Pending;
        let orders = vec![
            paid_order(40, "2024-03-01"),
            paid_order(60, "2024-03-02"),
            paid_order(500, "2024-04-01"),
            pending,
        ];
        let expenses = vec![
            expense("supplies", 30, "2024-03-01"),
            expense("supplies", 5, "2024-03-02"),
            expense("rent", 20, "2024-03-02"),
            expense("rent", 1000, "2024-02-28"),
        ];
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();

        let summary = summarize(&orders, &expenses, range).unwrap();
        assert_eq!(summary.revenue, Decimal::from(100));
        assert_eq!(summary.paid_orders, 2);
        assert_eq!(summary.expenses, Decimal::from(55));
        assert_eq!(summary.net, Decimal::from(45));
        assert_eq!(
            summary.by_category,
            vec![
                CategoryTotal {
                    category: "rent".into(),
                    amount: Decimal::from(20)
                },
                CategoryTotal {
                    category: "supplies".into(),
                    amount: Decimal::from(35)
                },
            ]
        );
        assert_eq!(summary.by_day.len(), 2);
        assert_eq!(
            summary.by_day[1],
            DayTotals {
                day: "2024-03-02".into(),
                revenue: Decimal::from(60),
                expenses: Decimal::from(25)
            }
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["net"], serde_json::json!(45.0));
        assert_eq!(json["by_day"][0]["revenue"], serde_json::json!(40.0));
    }

    #[test]
    fn open_range_takes_everything() {
        let summary = summarize(
            &[paid_order(10, "2020-01-01")],
            &[expense("rent", 15, "2030-01-01")],
            DateRange::default(),
        )
        .unwrap();
        assert_eq!(summary.net, Decimal::from(-5));
    }
}
