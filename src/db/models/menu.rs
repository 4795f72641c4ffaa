use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    blank_amount, current_timestamp, new_id, optional_text, patch_amount, patch_text, require_non_negative,
    require_text, serialize_patch_amount,
};
use crate::api::{AppError, AppResult};
use crate::db::{Direction, Editable, FilterKind, Resource};
use crate::export::CsvRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct MenuCategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MenuCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl Resource for MenuCategory {
    const TABLE: &'static str = "menu_categories";
    const LABEL: &'static str = "Menu category";

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("sort_order", Direction::Asc)
    }
}

impl Editable for MenuCategory {
    type Create = MenuCategoryCreate;
    type Patch = MenuCategoryUpdate;

    fn from_create(input: MenuCategoryCreate) -> AppResult<Self> {
        Ok(MenuCategory {
            id: new_id(),
            name: require_text("name", &input.name)?,
            description: optional_text(input.description),
            sort_order: input.sort_order.unwrap_or(0),
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: MenuCategoryUpdate) -> AppResult<MenuCategoryUpdate> {
        if let Some(name) = &patch.name {
            patch.name = Some(require_text("name", name)?);
        }
        Ok(patch)
    }
}

impl CsvRecord for MenuCategory {
    const HEADERS: &'static [&'static str] = &["id", "name", "description", "sort_order"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
            self.sort_order.to_string(),
        ]
    }
}

/// Plato de la carta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category_id: Option<String>,
    pub available: bool,
    pub created_at: i64,
}

/// Formulario de alta de un plato; nombre y precio pueden llegar vacíos
#[derive(Debug, Deserialize)]
pub struct FoodItemCreate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_amount")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "patch_amount",
        serialize_with = "serialize_patch_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Option<Decimal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `""` o `null` deja el plato sin categoría
    #[serde(default, deserialize_with = "patch_text", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl Resource for FoodItem {
    const TABLE: &'static str = "food_items";
    const LABEL: &'static str = "Food item";
    const FILTERS: &'static [(&'static str, FilterKind)] = &[
        ("category_id", FilterKind::Text),
        ("available", FilterKind::Bool),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("name", Direction::Asc)
    }
}

impl Editable for FoodItem {
    type Create = FoodItemCreate;
    type Patch = FoodItemUpdate;

    fn from_create(input: FoodItemCreate) -> AppResult<Self> {
        let name = optional_text(input.name);
        let (Some(name), Some(price)) = (name, input.price) else {
            return Err(AppError::Validation("Name and price are required".to_string()));
        };

        Ok(FoodItem {
            id: new_id(),
            name,
            description: optional_text(input.description),
            price: require_non_negative("price", price)?,
            category_id: optional_text(input.category_id),
            available: input.available.unwrap_or(true),
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: FoodItemUpdate) -> AppResult<FoodItemUpdate> {
        if let Some(name) = &patch.name {
            patch.name = Some(require_text("name", name)?);
        }
        match patch.price {
            Some(None) => return Err(AppError::Validation("Name and price are required".to_string())),
            Some(Some(price)) => {
                require_non_negative("price", price)?;
            }
            None => {}
        }
        Ok(patch)
    }
}

impl CsvRecord for FoodItem {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "description", "price", "category_id", "available"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
            self.price.to_string(),
            self.category_id.clone().unwrap_or_default(),
            self.available.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str) -> FoodItemCreate {
        serde_json::from_str(&format!(r#"{{"name": "{name}", "price": "{price}"}}"#)).unwrap()
    }

    #[test]
    fn missing_name_or_price_is_rejected() {
        for input in [form("Paella", ""), form("", "12.00")] {
            let err = FoodItem::from_create(input).unwrap_err();
            assert_eq!(err.to_string(), "Name and price are required");
        }
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(FoodItem::from_create(form("Paella", "-1")).is_err());
    }

    #[test]
    fn valid_item_is_available_by_default() {
        let item = FoodItem::from_create(form("Paella", "14.50")).unwrap();
        assert_eq!(item.price, Decimal::new(1450, 2));
        assert!(item.available);
    }

    #[test]
    fn price_survives_bson_round_trip() {
        let item = FoodItem::from_create(form("Tortilla", "8.5")).unwrap();
        let doc = mongodb::bson::to_document(&item).unwrap();
        let back: FoodItem = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(back.price, Decimal::new(85, 1));
    }

    #[test]
    fn price_goes_out_as_a_number() {
        let item = FoodItem::from_create(form("Tortilla", "8.5")).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], serde_json::json!(8.5));
    }

    #[test]
    fn clearing_the_price_on_edit_is_rejected() {
        let patch: FoodItemUpdate = serde_json::from_str(r#"{"price": ""}"#).unwrap();
        let err = FoodItem::prepare_patch(patch).unwrap_err();
        assert_eq!(err.to_string(), "Name and price are required");

        let patch: FoodItemUpdate = serde_json::from_str(r#"{"name": "Paella"}"#).unwrap();
        let patch = FoodItem::prepare_patch(patch).unwrap();
        assert!(patch.price.is_none());
    }

    #[test]
    fn blank_category_detaches_the_item() {
        let patch: FoodItemUpdate = serde_json::from_str(r#"{"category_id": "", "price": 9}"#).unwrap();
        let doc = mongodb::bson::to_document(&FoodItem::prepare_patch(patch).unwrap()).unwrap();
        assert_eq!(doc.get("category_id"), Some(&mongodb::bson::Bson::Null));
        assert_eq!(doc.get_f64("price").unwrap(), 9.0);
    }
}
