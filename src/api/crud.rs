//! Handlers CRUD genéricos, parametrizados por recurso.
//!
//! Cada pantalla registra las rutas que necesita con `collection::<R>` /
//! `member::<R>` y añade sus endpoints propios.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use std::collections::HashMap;

use super::middleware::ErrorLogExt;
use super::{AppError, AppResult, ResultExt};
use crate::context::AppContext;
use crate::db::{Direction, Editable, Query, Resource};
use crate::listing::{self, ListParams};

/// Respuesta de una operación que modifica datos: mensaje (toast) + registro
#[derive(Debug, Serialize)]
pub struct Notice<T> {
    pub message: String,
    pub data: T,
}

pub fn created<T: Serialize>(message: String, data: T) -> HttpResponse {
    HttpResponse::Created().json(Notice { message, data })
}

pub fn ok<T: Serialize>(message: String, data: T) -> HttpResponse {
    HttpResponse::Ok().json(Notice { message, data })
}

fn parse_number(field: &str, raw: &str) -> AppResult<usize> {
    raw.parse::<usize>()
        .map_err_validation(&format!("{}: expected a positive integer", field))
}

/// Separa los parámetros de listado de los filtros `eq` del recurso
pub fn split_query<R: Resource>(raw: &HashMap<String, String>) -> AppResult<(ListParams, Query)> {
    let mut params = ListParams::default();
    let mut query = Query::new();

    for (key, value) in raw {
        match key.as_str() {
            "search" => params.search = Some(value.clone()),
            "sort" => params.sort = Some(value.clone()),
            "order" => {
                params.order = Some(match value.to_ascii_lowercase().as_str() {
                    "asc" => Direction::Asc,
                    "desc" => Direction::Desc,
                    _ => return Err(AppError::validation_field("order", "expected asc or desc")),
                })
            }
            "page" => params.page = Some(parse_number("page", value)?),
            "per_page" => params.per_page = Some(parse_number("per_page", value)?),
            field => {
                let (_, kind) = R::FILTERS
                    .iter()
                    .find(|(name, _)| *name == field)
                    .ok_or_else(|| AppError::validation_field(field, "unknown filter"))?;
                query = query.eq(field, kind.parse(field, value)?);
            }
        }
    }

    Ok((params, query))
}

pub async fn list<R: Resource>(
    ctx: web::Data<AppContext>,
    raw: web::Query<HashMap<String, String>>,
) -> AppResult<HttpResponse> {
    let (params, query) = split_query::<R>(&raw)?;
    let rows = ctx.repo::<R>().list(query).await?;
    Ok(HttpResponse::Ok().json(listing::apply(rows, &params)?))
}

pub async fn get<R: Resource>(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let record = ctx.repo::<R>().get(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn create<R: Editable>(
    ctx: web::Data<AppContext>,
    data: web::Json<R::Create>,
) -> AppResult<HttpResponse> {
    // Validación antes de tocar la base de datos
    let record = R::from_create(data.into_inner()).log_error_warn()?;
    let record = ctx
        .repo::<R>()
        .insert(record)
        .await
        .log_error_context(&format!("creating {}", R::TABLE))?;

    tracing::info!(table = R::TABLE, id = record.id(), "Record created");
    Ok(created(format!("{} created", R::LABEL), record))
}

pub async fn update<R: Editable>(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    data: web::Json<R::Patch>,
) -> AppResult<HttpResponse> {
    let patch = R::prepare_patch(data.into_inner()).log_error_warn()?;
    let record = ctx.repo::<R>().update(&path, &patch).await?;
    Ok(ok(format!("{} updated", R::LABEL), record))
}

pub async fn delete<R: Resource>(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ctx.repo::<R>().delete(&id).await?;

    tracing::info!(table = R::TABLE, id = %id, "Record deleted");
    Ok(ok(format!("{} deleted", R::LABEL), serde_json::json!({ "id": id })))
}

/// `GET` (listado) + `POST` (alta) sobre `path`
pub fn collection<R: Editable>(path: &str) -> actix_web::Resource {
    web::resource(path)
        .route(web::get().to(list::<R>))
        .route(web::post().to(create::<R>))
}

/// `GET` / `PUT` / `DELETE` sobre `path/{id}`
pub fn member<R: Editable>(path: &str) -> actix_web::Resource {
    web::resource(format!("{}/{{id}}", path))
        .route(web::get().to(get::<R>))
        .route(web::put().to(update::<R>))
        .route(web::delete().to(delete::<R>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RestaurantTable;
    use mongodb::bson::Bson;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn known_filters_become_eq_clauses() {
        let (params, query) = split_query::<RestaurantTable>(&raw(&[
            ("room_id", "r1"),
            ("page", "2"),
            ("order", "DESC"),
        ]))
        .unwrap();

        assert_eq!(params.page, Some(2));
        assert_eq!(params.order, Some(Direction::Desc));
        assert_eq!(query.filters, vec![("room_id".to_string(), Bson::String("r1".into()))]);
    }

    #[test]
    fn unknown_filters_and_bad_numbers_are_rejected() {
        assert!(split_query::<RestaurantTable>(&raw(&[("colour", "red")])).is_err());
        let err = split_query::<RestaurantTable>(&raw(&[("page", "-1")])).unwrap_err();
        assert!(err.to_string().starts_with("page: expected a positive integer"));
    }
}
