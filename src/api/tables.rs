//! # API de Mesas
//!
//! CRUD de mesas, cambio de estado y guardado por lotes del plano (posición,
//! tamaño y rotación), que es lo que envía el editor visual al pulsar "guardar".

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::crud;
use super::middleware::ErrorLogExt;
use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{LayoutUpdate, RestaurantTable, TableCreate, TableStatus, TableUpdate};
use crate::db::{Editable, Query, Repo, Resource};

#[derive(Deserialize)]
struct StatusChange {
    status: TableStatus,
}

#[derive(Deserialize)]
struct RoomParams {
    room_id: String,
}

/// El número de mesa es único dentro de su sala
async fn ensure_number_free(
    repo: &Repo<RestaurantTable>,
    room_id: Option<&str>,
    table_number: i32,
    except: Option<&str>,
) -> AppResult<()> {
    let query = Query::new()
        .eq("room_id", room_id)
        .eq("table_number", table_number);

    let clashes = repo.list(query).await?;
    if clashes.iter().any(|t| Some(t.id.as_str()) != except) {
        return Err(AppError::Conflict(format!(
            "Table number {} already exists in this room",
            table_number
        )));
    }
    Ok(())
}

async fn create_table(
    ctx: web::Data<AppContext>,
    data: web::Json<TableCreate>,
) -> AppResult<HttpResponse> {
    let table = RestaurantTable::from_create(data.into_inner())?;
    let repo = ctx.repo::<RestaurantTable>();

    ensure_number_free(&repo, table.room_id.as_deref(), table.table_number, None).await?;

    let table = repo
        .insert(table)
        .await
        .log_error_context("creating table")?;

    tracing::info!(table_id = %table.id, table_number = table.table_number, "Table created");
    Ok(crud::created("Table created".to_string(), table))
}

async fn update_table(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    data: web::Json<TableUpdate>,
) -> AppResult<HttpResponse> {
    let patch = RestaurantTable::prepare_patch(data.into_inner())?;
    let repo = ctx.repo::<RestaurantTable>();
    let current = repo.get(&path).await?;

    if patch.table_number.is_some() || patch.room_id.is_some() {
        let room_id = match &patch.room_id {
            Some(room_id) => room_id.as_deref(),
            None => current.room_id.as_deref(),
        };
        let number = patch.table_number.unwrap_or(current.table_number);
        ensure_number_free(&repo, room_id, number, Some(&current.id)).await?;
    }

    let table = repo.update(&current.id, &patch).await?;
    Ok(crud::ok("Table updated".to_string(), table))
}

async fn set_status(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    data: web::Json<StatusChange>,
) -> AppResult<HttpResponse> {
    let patch = TableUpdate {
        status: Some(data.status),
        ..Default::default()
    };
    let table = ctx.repo::<RestaurantTable>().update(&path, &patch).await?;

    tracing::info!(table_id = %table.id, status = %table.status, "Table status changed");
    Ok(crud::ok(format!("Table {} is now {}", table.table_number, table.status), table))
}

/// Guarda por lotes la disposición del plano
///
/// Se comprueba que existan todas las mesas antes de escribir nada. Los
/// tamaños se ajustan al mínimo y la rotación se normaliza a [0, 360).
async fn save_layout(
    ctx: web::Data<AppContext>,
    data: web::Json<Vec<LayoutUpdate>>,
) -> AppResult<HttpResponse> {
    let updates = data.into_inner();
    if updates.is_empty() {
        return Err(AppError::Validation("No layout changes to save".to_string()));
    }

    let repo = ctx.repo::<RestaurantTable>();
    for update in &updates {
        repo.get(&update.id).await?;
    }

    let mut saved = Vec::with_capacity(updates.len());
    for update in updates {
        let update = update.normalized();
        let table = repo
            .update(&update.id, &update)
            .await
            .log_error_context("saving table layout")?;
        saved.push(table);
    }

    tracing::info!(count = saved.len(), "Floor plan layout saved");
    Ok(crud::ok(format!("{} table(s) saved", saved.len()), saved))
}

/// Elimina todas las mesas de una sala
async fn clear_tables(
    ctx: web::Data<AppContext>,
    query: web::Query<RoomParams>,
) -> AppResult<HttpResponse> {
    let deleted = ctx
        .db
        .delete(RestaurantTable::TABLE, &Query::new().eq("room_id", query.room_id.as_str()))
        .await
        .map_err(|e| AppError::database("clear_tables", e))?;

    tracing::info!(room_id = %query.room_id, deleted, "Tables cleared");
    Ok(crud::ok(
        "All tables deleted".to_string(),
        serde_json::json!({ "deleted": deleted }),
    ))
}

/// # Rutas
/// - `GET /tables` (`room_id`, `status`, `shape`), `POST /tables`
/// - `PUT /tables/layout`, `DELETE /tables/clear?room_id=`
/// - `GET|PUT|DELETE /tables/{id}`, `PUT /tables/{id}/status`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tables")
            .route(web::get().to(crud::list::<RestaurantTable>))
            .route(web::post().to(create_table)),
    );
    cfg.service(web::resource("/tables/layout").route(web::put().to(save_layout)));
    cfg.service(web::resource("/tables/clear").route(web::delete().to(clear_tables)));
    cfg.service(
        web::resource("/tables/{id}")
            .route(web::get().to(crud::get::<RestaurantTable>))
            .route(web::put().to(update_table))
            .route(web::delete().to(crud::delete::<RestaurantTable>)),
    );
    cfg.service(web::resource("/tables/{id}/status").route(web::put().to(set_status)));
}
