//! # API de Salas
//!
//! Listado, alta, edición y baja de salas. Una sala con mesas no se puede borrar.

use actix_web::{web, HttpResponse};

use super::crud;
use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{RestaurantTable, Room};
use crate::db::Query;

/// Borra una sala si no tiene mesas asignadas
///
/// # Errores
/// - `404 Not Found`: la sala no existe
/// - `409 Conflict`: la sala tiene mesas
async fn delete_room(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let room = ctx.repo::<Room>().get(&id).await?;

    let tables = ctx
        .repo::<RestaurantTable>()
        .count(Query::new().eq("room_id", id.as_str()))
        .await?;

    if tables > 0 {
        return Err(AppError::Conflict(format!(
            "Room '{}' still has {} table(s)",
            room.name, tables
        )));
    }

    ctx.repo::<Room>().delete(&id).await?;
    tracing::info!(room_id = %id, "Room deleted");
    Ok(crud::ok("Room deleted".to_string(), serde_json::json!({ "id": id })))
}

/// # Rutas
/// - `GET /rooms`, `POST /rooms`
/// - `GET /rooms/{id}`, `PUT /rooms/{id}`, `DELETE /rooms/{id}`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crud::collection::<Room>("/rooms"));
    cfg.service(
        web::resource("/rooms/{id}")
            .route(web::get().to(crud::get::<Room>))
            .route(web::put().to(crud::update::<Room>))
            .route(web::delete().to(delete_room)),
    );
}
