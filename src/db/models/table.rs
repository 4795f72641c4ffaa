use serde::{Deserialize, Serialize};
use std::fmt;

use super::{current_timestamp, new_id, optional_text, patch_text, require_positive};
use crate::api::AppResult;
use crate::db::{Direction, Editable, FilterKind, Resource};
use crate::export::CsvRecord;
use crate::floor_plan::{clamp_dimension, normalize_rotation, TableLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Cleaning => "cleaning",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Rectangle,
    Circle,
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableShape::Rectangle => "rectangle",
            TableShape::Circle => "circle",
        })
    }
}

pub const DEFAULT_TABLE_SIZE: f64 = 100.0;

/// Mesa del plano. `room_id` nulo significa "sin sala asignada".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantTable {
    pub id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    pub table_number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    pub shape: TableShape,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub created_at: i64,
}

impl RestaurantTable {
    pub fn layout(&self) -> TableLayout {
        TableLayout {
            x: self.position_x,
            y: self.position_y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TableCreate {
    #[serde(default)]
    pub room_id: Option<String>,
    pub table_number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub status: Option<TableStatus>,
    #[serde(default)]
    pub shape: Option<TableShape>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TableUpdate {
    /// `""` o `null` deja la mesa sin sala
    #[serde(default, deserialize_with = "patch_text", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<TableShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// Posición/tamaño/rotación de una mesa tal como los guarda el editor del plano
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutUpdate {
    #[serde(skip_serializing)]
    pub id: String,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl LayoutUpdate {
    pub fn new(id: &str, layout: TableLayout) -> Self {
        Self {
            id: id.to_string(),
            position_x: layout.x,
            position_y: layout.y,
            width: layout.width,
            height: layout.height,
            rotation: layout.rotation,
        }
        .normalized()
    }

    /// Aplica el tamaño mínimo y lleva la rotación a [0, 360)
    pub fn normalized(mut self) -> Self {
        self.width = clamp_dimension(self.width);
        self.height = clamp_dimension(self.height);
        self.rotation = normalize_rotation(self.rotation);
        self
    }
}

impl Resource for RestaurantTable {
    const TABLE: &'static str = "restaurant_tables";
    const LABEL: &'static str = "Table";
    const FILTERS: &'static [(&'static str, FilterKind)] = &[
        ("room_id", FilterKind::Text),
        ("status", FilterKind::Text),
        ("shape", FilterKind::Text),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("table_number", Direction::Asc)
    }
}

impl Editable for RestaurantTable {
    type Create = TableCreate;
    type Patch = TableUpdate;

    fn from_create(input: TableCreate) -> AppResult<Self> {
        Ok(RestaurantTable {
            id: new_id(),
            room_id: optional_text(input.room_id),
            table_number: require_positive("table_number", input.table_number)?,
            capacity: require_positive("capacity", input.capacity)?,
            status: input.status.unwrap_or_default(),
            shape: input.shape.unwrap_or_default(),
            position_x: input.position_x.unwrap_or(0.0),
            position_y: input.position_y.unwrap_or(0.0),
            width: clamp_dimension(input.width.unwrap_or(DEFAULT_TABLE_SIZE)),
            height: clamp_dimension(input.height.unwrap_or(DEFAULT_TABLE_SIZE)),
            rotation: normalize_rotation(input.rotation.unwrap_or(0.0)),
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: TableUpdate) -> AppResult<TableUpdate> {
        if let Some(number) = patch.table_number {
            require_positive("table_number", number)?;
        }
        if let Some(capacity) = patch.capacity {
            require_positive("capacity", capacity)?;
        }
        patch.width = patch.width.map(clamp_dimension);
        patch.height = patch.height.map(clamp_dimension);
        patch.rotation = patch.rotation.map(normalize_rotation);
        Ok(patch)
    }
}

impl CsvRecord for RestaurantTable {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "room_id",
        "table_number",
        "capacity",
        "status",
        "shape",
        "position_x",
        "position_y",
        "width",
        "height",
        "rotation",
    ];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.room_id.clone().unwrap_or_default(),
            self.table_number.to_string(),
            self.capacity.to_string(),
            self.status.to_string(),
            self.shape.to_string(),
            self.position_x.to_string(),
            self.position_y.to_string(),
            self.width.to_string(),
            self.height.to_string(),
            self.rotation.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(number: i32) -> TableCreate {
        TableCreate {
            room_id: Some("room-1".into()),
            table_number: number,
            capacity: 4,
            status: None,
            shape: None,
            position_x: None,
            position_y: None,
            width: Some(20.0),
            height: None,
            rotation: Some(-45.0),
        }
    }

    #[test]
    fn create_applies_defaults_and_layout_rules() {
        let table = RestaurantTable::from_create(create(7)).unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert_eq!(table.shape, TableShape::Rectangle);
        assert_eq!(table.width, 50.0);
        assert_eq!(table.height, DEFAULT_TABLE_SIZE);
        assert_eq!(table.rotation, 315.0);
    }

    #[test]
    fn create_rejects_non_positive_numbers() {
        assert!(RestaurantTable::from_create(create(0)).is_err());
    }

    #[test]
    fn layout_update_skips_id_when_serialized() {
        let update = LayoutUpdate {
            id: "t1".into(),
            position_x: 10.0,
            position_y: 20.0,
            width: 10.0,
            height: 80.0,
            rotation: 405.0,
        }
        .normalized();

        let doc = mongodb::bson::to_document(&update).unwrap();
        assert!(!doc.contains_key("id"));
        assert_eq!(doc.get_f64("width").unwrap(), 50.0);
        assert_eq!(doc.get_f64("rotation").unwrap(), 45.0);
    }

    #[test]
    fn blank_room_on_edit_is_stored_as_null() {
        let patch: TableUpdate = serde_json::from_str(r#"{"room_id": "  "}"#).unwrap();
        assert_eq!(patch.room_id, Some(None));
        let doc = mongodb::bson::to_document(&patch).unwrap();
        assert_eq!(doc.get("room_id"), Some(&mongodb::bson::Bson::Null));

        let patch: TableUpdate = serde_json::from_str(r#"{"capacity": 6}"#).unwrap();
        assert!(!mongodb::bson::to_document(&patch).unwrap().contains_key("room_id"));
    }
}
