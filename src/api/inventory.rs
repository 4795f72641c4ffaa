//! # API de Inventario

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::crud;
use super::AppResult;
use crate::context::AppContext;
use crate::db::models::{Ingredient, IngredientUpdate};
use crate::db::Query;

#[derive(Deserialize)]
struct StockAdjustment {
    /// Positivo para entradas, negativo para consumo/mermas
    delta: f64,
}

/// Ingredientes en o por debajo de su mínimo
async fn low_stock(ctx: web::Data<AppContext>) -> AppResult<HttpResponse> {
    let low: Vec<Ingredient> = ctx
        .repo::<Ingredient>()
        .list(Query::new())
        .await?
        .into_iter()
        .filter(Ingredient::is_low_stock)
        .collect();

    Ok(HttpResponse::Ok().json(low))
}

async fn adjust_stock(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    data: web::Json<StockAdjustment>,
) -> AppResult<HttpResponse> {
    let repo = ctx.repo::<Ingredient>();
    let ingredient = repo.get(&path).await?;
    let quantity = ingredient.adjusted_quantity(data.delta)?;

    let patch = IngredientUpdate {
        quantity: Some(quantity),
        ..Default::default()
    };
    let ingredient = repo.update(&ingredient.id, &patch).await?;

    if ingredient.is_low_stock() {
        tracing::warn!(ingredient = %ingredient.name, quantity, "Ingredient below minimum stock");
    }
    Ok(crud::ok(
        format!("{} stock: {} {}", ingredient.name, ingredient.quantity, ingredient.unit),
        ingredient,
    ))
}

/// # Rutas
/// - `GET|POST /ingredients`, `GET /ingredients/low-stock`
/// - `GET|PUT|DELETE /ingredients/{id}`, `POST /ingredients/{id}/adjust`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(crud::collection::<Ingredient>("/ingredients"));
    cfg.service(web::resource("/ingredients/low-stock").route(web::get().to(low_stock)));
    cfg.service(crud::member::<Ingredient>("/ingredients"));
    cfg.service(web::resource("/ingredients/{id}/adjust").route(web::post().to(adjust_stock)));
}
