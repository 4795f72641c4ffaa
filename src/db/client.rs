//! Cliente de consultas uniforme.
//!
//! Todo acceso a datos pasa por [`QueryClient`]: select / insert / update /
//! delete sobre tablas con nombre, filtradas por igualdad (`eq`) y ordenadas
//! (`order`). Las filas viajan como documentos BSON.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("could not encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("could not decode document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Filtros de igualdad + orden + límite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Bson)>,
    pub order: Option<(String, Direction)>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order(mut self, field: &str, direction: Direction) -> Self {
        self.order = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter_document(&self) -> Document {
        let mut filter = Document::new();
        for (field, value) in &self.filters {
            filter.insert(field.clone(), value.clone());
        }
        filter
    }

    pub fn sort_document(&self) -> Option<Document> {
        self.order.as_ref().map(|(field, direction)| {
            let mut sort = Document::new();
            let value = match direction {
                Direction::Asc => 1,
                Direction::Desc => -1,
            };
            sort.insert(field.clone(), value);
            sort
        })
    }

    /// Evalúa los filtros contra un documento en memoria.
    /// Un campo ausente se compara como `null`, igual que en MongoDB.
    pub fn matches(&self, row: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| bson_eq(row.get(field).unwrap_or(&Bson::Null), value))
    }
}

/// Interfaz del backend de datos
#[async_trait]
pub trait QueryClient: Send + Sync + std::fmt::Debug {
    async fn select(&self, table: &str, query: &Query) -> DbResult<Vec<Document>>;

    async fn insert(&self, table: &str, row: Document) -> DbResult<()>;

    /// Aplica `changes` a las filas que cumplen la consulta; devuelve cuántas coincidieron
    async fn update(&self, table: &str, query: &Query, changes: Document) -> DbResult<u64>;

    async fn delete(&self, table: &str, query: &Query) -> DbResult<u64>;

    async fn count(&self, table: &str, query: &Query) -> DbResult<u64>;
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn bson_eq(left: &Bson, right: &Bson) -> bool {
    match (as_number(left), as_number(right)) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

/// Orden total razonable entre valores BSON: null < bool < números < strings
pub fn compare_bson(left: &Bson, right: &Bson) -> Ordering {
    fn rank(value: &Bson) -> u8 {
        match value {
            Bson::Null => 0,
            Bson::Boolean(_) => 1,
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 2,
            Bson::String(_) => 3,
            _ => 4,
        }
    }

    match (left, right) {
        (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
        (Bson::String(a), Bson::String(b)) => a.cmp(b),
        _ => match (as_number(left), as_number(right)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => rank(left).cmp(&rank(right)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn query_builds_mongo_documents() {
        let query = Query::new()
            .eq("room_id", "r1")
            .eq("status", "available")
            .order("table_number", Direction::Desc);

        assert_eq!(query.filter_document(), doc! { "room_id": "r1", "status": "available" });
        assert_eq!(query.sort_document(), Some(doc! { "table_number": -1 }));
    }

    #[test]
    fn matches_treats_missing_field_as_null() {
        let row = doc! { "id": "t1", "table_number": 4 };
        assert!(Query::new().eq("room_id", Bson::Null).matches(&row));
        assert!(Query::new().eq("table_number", 4_i64).matches(&row));
        assert!(!Query::new().eq("id", "t2").matches(&row));
    }

    #[test]
    fn numbers_compare_across_widths() {
        assert_eq!(compare_bson(&Bson::Int32(2), &Bson::Double(1.5)), Ordering::Greater);
        assert_eq!(compare_bson(&Bson::Null, &Bson::String("a".into())), Ordering::Less);
    }
}
