use serde::{Deserialize, Serialize};

use super::{current_timestamp, new_id, optional_text, require_text};
use crate::api::AppResult;
use crate::db::{Direction, Editable, FilterKind, Resource};
use crate::export::CsvRecord;

/// Sala del restaurante (salón, terraza, privado...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub active: bool,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct RoomCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Resource for Room {
    const TABLE: &'static str = "rooms";
    const LABEL: &'static str = "Room";
    const FILTERS: &'static [(&'static str, FilterKind)] = &[("active", FilterKind::Bool)];

    fn id(&self) -> &str {
        &self.id
    }

    fn default_order() -> (&'static str, Direction) {
        ("name", Direction::Asc)
    }
}

impl Editable for Room {
    type Create = RoomCreate;
    type Patch = RoomUpdate;

    fn from_create(input: RoomCreate) -> AppResult<Self> {
        Ok(Room {
            id: new_id(),
            name: require_text("name", &input.name)?,
            description: optional_text(input.description),
            active: input.active.unwrap_or(true),
            created_at: current_timestamp(),
        })
    }

    fn prepare_patch(mut patch: RoomUpdate) -> AppResult<RoomUpdate> {
        if let Some(name) = &patch.name {
            patch.name = Some(require_text("name", name)?);
        }
        Ok(patch)
    }
}

impl CsvRecord for Room {
    const HEADERS: &'static [&'static str] = &["id", "name", "description", "active"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
            self.active.to_string(),
        ]
    }
}
