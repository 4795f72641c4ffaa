use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{blank_amount, current_timestamp, new_id, require_non_negative, require_text};
use crate::api::{AppError, AppResult};
use crate::db::{Direction, Editable, Resource};
use crate::export::CsvRecord;

/// Ingrediente en almacén
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    /// Por debajo (o igual) de este nivel hay que reponer
    pub min_quantity: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_per_unit: Decimal,
    pub created_at: i64,
}

impl Ingredient {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    /// Cantidad resultante de sumar `delta`; nunca por debajo de cero
    pub fn adjusted_quantity(&self, delta: f64) -> AppResult<f64> {
        if !delta.is_finite() {
            return Err(AppError::validation_field("delta", "must be a number"));
        }
        let quantity = self.quantity + delta;
        if quantity < 0.0 {
            return Err(AppError::Validation(format!(
                "Not enough {} in stock ({} {} available)",
                self.name, self.quantity, self.unit
            )));
        }
        Ok(quantity)
    }
}

fn require_stock(field: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation_field(field, "must not be negative"));
    }
    Ok(value)
}

#[derive(Debug, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub min_quantity: f64,
    #[serde(default, deserialize_with = "blank_amount")]
    pub cost_per_unit: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IngredientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<f64>,
    #[serde(
        default,
        deserialize_with = "blank_amount",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost_per_unit: Option<Decimal>,
}

impl Resource for Ingredient {
    const TABLE: &'static str = "ingredients";
    const LABEL: &'static str = "Ingredient";

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("name", Direction::Asc)
    }
}

impl Editable for Ingredient {
    type Create = IngredientCreate;
    type Patch = IngredientUpdate;

    fn from_create(input: IngredientCreate) -> AppResult<Self> {
        Ok(Ingredient {
            id: new_id(),
            name: require_text("name", &input.name)?,
            unit: require_text("unit", &input.unit)?,
            quantity: require_stock("quantity", input.quantity)?,
            min_quantity: require_stock("min_quantity", input.min_quantity)?,
            cost_per_unit: require_non_negative("cost_per_unit", input.cost_per_unit.unwrap_or_default())?,
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: IngredientUpdate) -> AppResult<IngredientUpdate> {
        if let Some(name) = &patch.name {
            patch.name = Some(require_text("name", name)?);
        }
        if let Some(unit) = &patch.unit {
            patch.unit = Some(require_text("unit", unit)?);
        }
        if let Some(quantity) = patch.quantity {
            require_stock("quantity", quantity)?;
        }
        if let Some(min) = patch.min_quantity {
            require_stock("min_quantity", min)?;
        }
        if let Some(cost) = patch.cost_per_unit {
            require_non_negative("cost_per_unit", cost)?;
        }
        Ok(patch)
    }
}

impl CsvRecord for Ingredient {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "unit", "quantity", "min_quantity", "cost_per_unit", "low_stock"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.unit.clone(),
            self.quantity.to_string(),
            self.min_quantity.to_string(),
            self.cost_per_unit.to_string(),
            self.is_low_stock().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour(quantity: f64) -> Ingredient {
        Ingredient {
            id: "i1".into(),
            name: "Flour".into(),
            unit: "kg".into(),
            quantity,
            min_quantity: 5.0,
            cost_per_unit: Decimal::new(120, 2),
            created_at: 0,
        }
    }

    #[test]
    fn low_stock_includes_threshold() {
        assert!(flour(5.0).is_low_stock());
        assert!(!flour(5.5).is_low_stock());
    }

    #[test]
    fn adjustment_cannot_go_negative() {
        assert_eq!(flour(3.0).adjusted_quantity(-3.0).unwrap(), 0.0);
        assert_eq!(flour(3.0).adjusted_quantity(2.5).unwrap(), 5.5);
        assert!(flour(3.0).adjusted_quantity(-3.5).is_err());
        assert!(flour(3.0).adjusted_quantity(f64::NAN).is_err());
    }
}
