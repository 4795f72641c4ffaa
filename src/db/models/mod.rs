//! Modelos persistidos y sus formularios de alta/edición.

mod expense;
mod inventory;
mod menu;
pub mod money;
mod order;
mod room;
mod staff;
mod table;

pub use expense::{Expense, ExpenseCreate, ExpenseUpdate};
pub use inventory::{Ingredient, IngredientCreate, IngredientUpdate};
pub use menu::{FoodItem, FoodItemCreate, FoodItemUpdate, MenuCategory, MenuCategoryCreate, MenuCategoryUpdate};
pub use order::{Order, OrderItem, OrderStatus};
pub use room::{Room, RoomCreate, RoomUpdate};
pub use staff::{StaffMember, StaffMemberCreate, StaffMemberUpdate, StaffRole, StaffShift, StaffShiftCreate, StaffShiftUpdate};
pub use table::{LayoutUpdate, RestaurantTable, TableCreate, TableShape, TableStatus, TableUpdate};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

use crate::api::{AppError, AppResult};

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Timestamp unix actual
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Devuelve el texto recortado o un error de validación si queda vacío
pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation_field(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Texto opcional: los valores en blanco se guardan como `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn require_positive(field: &str, value: i32) -> AppResult<i32> {
    if value <= 0 {
        return Err(AppError::validation_field(field, "must be greater than 0"));
    }
    Ok(value)
}

/// Importe no negativo y dentro de [`money::MAX_AMOUNT`]
pub fn require_non_negative(field: &str, value: Decimal) -> AppResult<Decimal> {
    money::require_amount(field, value)
}

/// Validación básica de email
pub fn validate_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Valida y parsea una fecha en formato YYYY-MM-DD
pub fn validate_date(date_str: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, use YYYY-MM-DD".to_string()))
}

/// Valida y parsea una hora en formato HH:MM
pub fn validate_time(time_str: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format, use HH:MM".to_string()))
}

/// Importe opcional de un formulario: acepta número, texto numérico o vacío.
/// Un campo vacío (`""`) cuenta como ausente.
pub fn blank_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => Decimal::from_str(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected an amount, got {}",
            other
        ))),
    }
}

/// Importe de una edición: ausente → `None`, vacío o `null` → `Some(None)`
pub fn patch_amount<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_amount(deserializer).map(Some)
}

/// Serializa un importe de edición como número
pub fn serialize_patch_amount<S>(value: &Option<Option<Decimal>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(Some(amount)) => rust_decimal::serde::float::serialize(amount, serializer),
        _ => serializer.serialize_none(),
    }
}

/// Texto anulable de una edición: ausente → `None`, vacío o `null` → `Some(None)`
pub fn patch_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| Some(optional_text(value)))
}

/// Rango de fechas inclusivo; los extremos ausentes no limitan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn parse(from: Option<&str>, to: Option<&str>) -> AppResult<Self> {
        let range = Self {
            from: from.map(validate_date).transpose()?,
            to: to.map(validate_date).transpose()?,
        };
        if let (Some(from), Some(to)) = (range.from, range.to) {
            if from > to {
                return Err(AppError::validation_field("from", "must not be after 'to'"));
            }
        }
        Ok(range)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "blank_amount")]
        price: Option<Decimal>,
    }

    fn price(json: &str) -> Option<Decimal> {
        serde_json::from_str::<Form>(json).unwrap().price
    }

    #[test]
    fn blank_amount_accepts_numbers_text_and_blanks() {
        assert_eq!(price(r#"{"price": 12.5}"#), Some(Decimal::new(125, 1)));
        assert_eq!(price(r#"{"price": "9.90"}"#), Some(Decimal::new(990, 2)));
        assert_eq!(price(r#"{"price": ""}"#), None);
        assert_eq!(price(r#"{"price": null}"#), None);
        assert_eq!(price(r#"{}"#), None);
        assert!(serde_json::from_str::<Form>(r#"{"price": "abc"}"#).is_err());
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
        assert!(DateRange::parse(Some("2024-04-01"), Some("2024-03-01")).is_err());
        assert!(DateRange::parse(Some("01/04/2024"), None).is_err());
    }

    #[test]
    fn text_helpers_trim() {
        assert_eq!(require_text("name", "  Patio ").unwrap(), "Patio");
        assert!(require_text("name", "   ").is_err());
        assert_eq!(optional_text(Some("  ".into())), None);
    }
}
