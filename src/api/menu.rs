//! # API de Carta
//!
//! Categorías y platos. Un plato necesita nombre y precio; la validación se
//! hace antes de llamar a la base de datos.

use actix_web::{web, HttpResponse};

use super::crud;
use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{FoodItem, MenuCategory};
use crate::db::{Query, Resource};
use mongodb::bson::{doc, Bson};

/// Borra una categoría; sus platos quedan sin categoría
async fn delete_category(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    ctx.repo::<MenuCategory>().delete(&id).await?;

    let detached = ctx
        .db
        .update(
            FoodItem::TABLE,
            &Query::new().eq("category_id", id.as_str()),
            doc! { "category_id": Bson::Null },
        )
        .await
        .map_err(|e| AppError::database("detach_food_items", e))?;

    tracing::info!(category_id = %id, detached, "Menu category deleted");
    Ok(crud::ok(
        "Menu category deleted".to_string(),
        serde_json::json!({ "id": id, "detached_items": detached }),
    ))
}

/// # Rutas
/// - `GET|POST /menu/categories`, `GET|PUT|DELETE /menu/categories/{id}`
/// - `GET|POST /menu/items` (`category_id`, `available`), `GET|PUT|DELETE /menu/items/{id}`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crud::collection::<MenuCategory>("/menu/categories"));
    cfg.service(
        web::resource("/menu/categories/{id}")
            .route(web::get().to(crud::get::<MenuCategory>))
            .route(web::put().to(crud::update::<MenuCategory>))
            .route(web::delete().to(delete_category)),
    );
    cfg.service(crud::collection::<FoodItem>("/menu/items"));
    cfg.service(crud::member::<FoodItem>("/menu/items"));
}
