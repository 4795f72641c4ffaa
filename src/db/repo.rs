//! Capa de acceso a datos parametrizada por recurso.
//!
//! Un único `Repo<R>` sirve para salas, mesas, platos, ingredientes, personal,
//! pedidos y gastos: sólo cambia la tabla y el tipo que se (de)serializa.

use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use super::client::{Direction, Query, QueryClient};
use crate::api::{AppError, AppResult};

/// Tipo de valor aceptado por un filtro de listado (`?room_id=...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Bool,
    Int,
}

impl FilterKind {
    pub fn parse(self, field: &str, raw: &str) -> AppResult<Bson> {
        match self {
            FilterKind::Text => Ok(Bson::String(raw.to_string())),
            FilterKind::Bool => raw
                .parse::<bool>()
                .map(Bson::Boolean)
                .map_err(|_| AppError::validation_field(field, "expected true or false")),
            FilterKind::Int => raw
                .parse::<i32>()
                .map(Bson::Int32)
                .map_err(|_| AppError::validation_field(field, "expected an integer")),
        }
    }
}

/// Registro persistido en una tabla con nombre
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;
    /// Nombre legible para mensajes ("Room", "Food item", ...)
    const LABEL: &'static str;
    /// Campos por los que se puede filtrar un listado
    const FILTERS: &'static [(&'static str, FilterKind)] = &[];

    fn id(&self) -> &str;

    fn default_order() -> (&'static str, Direction) {
        ("created_at", Direction::Asc)
    }
}

/// Recurso que se crea y edita directamente desde un formulario
pub trait Editable: Resource {
    type Create: DeserializeOwned + Send + 'static;
    type Patch: DeserializeOwned + Serialize + Send + 'static;

    /// Valida el formulario de alta y construye el registro
    fn from_create(input: Self::Create) -> AppResult<Self>;

    /// Valida (y normaliza) una edición parcial
    fn prepare_patch(patch: Self::Patch) -> AppResult<Self::Patch> {
        Ok(patch)
    }
}

pub struct Repo<R> {
    client: Arc<dyn QueryClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repo<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Repo<R> {
    pub fn new(client: Arc<dyn QueryClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn by_id(id: &str) -> Query {
        Query::new().eq("id", id)
    }

    /// Lista los registros; sin orden explícito se usa el del recurso
    pub async fn list(&self, mut query: Query) -> AppResult<Vec<R>> {
        if query.order.is_none() {
            let (field, direction) = R::default_order();
            query = query.order(field, direction);
        }

        let rows = self
            .client
            .select(R::TABLE, &query)
            .await
            .map_err(|e| AppError::database(&format!("select {}", R::TABLE), e))?;

        rows.into_iter()
            .map(|row| {
                bson::from_document(row)
                    .map_err(|e| AppError::database(&format!("decode {}", R::TABLE), e.into()))
            })
            .collect()
    }

    pub async fn find(&self, id: &str) -> AppResult<Option<R>> {
        let mut rows = self.list(Self::by_id(id).limit(1)).await?;
        Ok(rows.pop())
    }

    pub async fn get(&self, id: &str) -> AppResult<R> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::not_found_id(R::LABEL, id))
    }

    pub async fn count(&self, query: Query) -> AppResult<u64> {
        self.client
            .count(R::TABLE, &query)
            .await
            .map_err(|e| AppError::database(&format!("count {}", R::TABLE), e))
    }

    pub async fn insert(&self, record: R) -> AppResult<R> {
        let row = bson::to_document(&record)
            .map_err(|e| AppError::database(&format!("encode {}", R::TABLE), e.into()))?;

        self.client
            .insert(R::TABLE, row)
            .await
            .map_err(|e| AppError::database(&format!("insert {}", R::TABLE), e))?;

        tracing::debug!(table = R::TABLE, id = record.id(), "Record inserted");
        Ok(record)
    }

    /// Aplica los campos presentes en `changes` y devuelve el registro actualizado
    pub async fn update<P: Serialize>(&self, id: &str, changes: &P) -> AppResult<R> {
        let changes: Document = bson::to_document(changes)
            .map_err(|e| AppError::database(&format!("encode {}", R::TABLE), e.into()))?;

        if changes.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }

        let matched = self
            .client
            .update(R::TABLE, &Self::by_id(id), changes)
            .await
            .map_err(|e| AppError::database(&format!("update {}", R::TABLE), e))?;

        if matched == 0 {
            return Err(AppError::not_found_id(R::LABEL, id));
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let deleted = self
            .client
            .delete(R::TABLE, &Self::by_id(id))
            .await
            .map_err(|e| AppError::database(&format!("delete {}", R::TABLE), e))?;

        if deleted == 0 {
            return Err(AppError::not_found_id(R::LABEL, id));
        }

        tracing::debug!(table = R::TABLE, id = %id, "Record deleted");
        Ok(())
    }
}
