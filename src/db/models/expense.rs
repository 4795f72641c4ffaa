use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    blank_amount, current_timestamp, money, new_id, optional_text, patch_amount, require_text,
    serialize_patch_amount, validate_date,
};
use crate::api::{AppError, AppResult};
use crate::db::{Direction, Editable, FilterKind, Resource};
use crate::export::CsvRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// YYYY-MM-DD
    pub date: String,
    pub created_at: i64,
}

impl Expense {
    pub fn day(&self) -> AppResult<NaiveDate> {
        validate_date(&self.date)
    }
}

fn require_amount(amount: Option<Decimal>) -> AppResult<Decimal> {
    match amount {
        Some(amount) if amount > Decimal::ZERO => money::require_amount("amount", amount),
        Some(_) => Err(AppError::validation_field("amount", "must be greater than 0")),
        None => Err(AppError::Validation("Category and amount are required".to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpenseCreate {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_amount")]
    pub amount: Option<Decimal>,
    pub date: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "patch_amount",
        serialize_with = "serialize_patch_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Option<Decimal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Resource for Expense {
    const TABLE: &'static str = "expenses";
    const LABEL: &'static str = "Expense";
    const FILTERS: &'static [(&'static str, FilterKind)] = &[("category", FilterKind::Text)];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("date", Direction::Desc)
    }
}

impl Editable for Expense {
    type Create = ExpenseCreate;
    type Patch = ExpenseUpdate;

    fn from_create(input: ExpenseCreate) -> AppResult<Self> {
        if input.category.trim().is_empty() {
            return Err(AppError::Validation("Category and amount are required".to_string()));
        }
        validate_date(&input.date)?;

        Ok(Expense {
            id: new_id(),
            category: input.category.trim().to_string(),
            description: optional_text(input.description),
            amount: require_amount(input.amount)?,
            date: input.date,
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: ExpenseUpdate) -> AppResult<ExpenseUpdate> {
        if let Some(category) = &patch.category {
            patch.category = Some(require_text("category", category)?);
        }
        if let Some(amount) = patch.amount {
            require_amount(amount)?;
        }
        if let Some(date) = &patch.date {
            validate_date(date)?;
        }
        Ok(patch)
    }
}

impl CsvRecord for Expense {
    const HEADERS: &'static [&'static str] = &["id", "date", "category", "description", "amount"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.date.clone(),
            self.category.clone(),
            self.description.clone().unwrap_or_default(),
            self.amount.to_string(),
        ]
    }
}
