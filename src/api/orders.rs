//! # API de Pedidos
//!
//! - Crear pedidos a partir de platos de la carta (precio y nombre se copian al pedido)
//! - Listar pedidos con filtros
//! - Avanzar el estado: pending → preparing → ready → served → paid, o cancelar

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::crud;
use super::middleware::ErrorLogExt;
use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{FoodItem, Order, OrderItem, OrderStatus, RestaurantTable};

#[derive(Deserialize)]
struct OrderLine {
    food_item_id: String,
    quantity: i32,
}

#[derive(Deserialize)]
struct NewOrder {
    #[serde(default)]
    table_id: Option<String>,
    items: Vec<OrderLine>,
}

#[derive(Deserialize)]
struct StatusChange {
    status: OrderStatus,
}

#[derive(serde::Serialize)]
struct StatusPatch {
    status: OrderStatus,
}

/// Crea un pedido
///
/// # Validaciones
/// - Al menos una línea, cantidades mayores que 0
/// - La mesa, si se indica, debe existir
/// - Todos los platos deben existir y estar disponibles
///
/// # Errores
/// - `400 Bad Request`: datos incorrectos o plato no disponible
/// - `404 Not Found`: mesa o plato inexistente
async fn create_order(
    ctx: web::Data<AppContext>,
    data: web::Json<NewOrder>,
) -> AppResult<HttpResponse> {
    let data = data.into_inner();
    if data.items.is_empty() {
        return Err(AppError::validation_field("items", "an order needs at least one item"));
    }

    if let Some(table_id) = &data.table_id {
        ctx.repo::<RestaurantTable>().get(table_id).await?;
    }

    let food = ctx.repo::<FoodItem>();
    let mut items = Vec::with_capacity(data.items.len());
    for line in data.items {
        let dish = food.get(&line.food_item_id).await?;
        if !dish.available {
            return Err(AppError::Validation(format!("{} is not available", dish.name)));
        }
        items.push(OrderItem {
            food_item_id: dish.id,
            name: dish.name,
            quantity: line.quantity,
            unit_price: dish.price,
        });
    }

    let order = Order::new(data.table_id, items)?;
    let order = ctx
        .repo::<Order>()
        .insert(order)
        .await
        .log_error_context("creating order")?;

    tracing::info!(order_id = %order.id, total = %order.total, "Order created");
    Ok(crud::created("Order created".to_string(), order))
}

async fn change_status(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    data: web::Json<StatusChange>,
) -> AppResult<HttpResponse> {
    let repo = ctx.repo::<Order>();
    let order = repo.get(&path).await?;

    if !order.status.can_transition_to(data.status) {
        return Err(AppError::Conflict(format!(
            "Order cannot go from {} to {}",
            order.status, data.status
        )));
    }

    let order = repo
        .update(&order.id, &StatusPatch { status: data.status })
        .await?;

    tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
    Ok(crud::ok(format!("Order is now {}", order.status), order))
}

/// # Rutas
/// - `GET /orders` (`status`, `table_id`), `POST /orders`
/// - `GET /orders/{id}`, `PUT /orders/{id}/status`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders")
            .route(web::get().to(crud::list::<Order>))
            .route(web::post().to(create_order)),
    );
    cfg.service(web::resource("/orders/{id}").route(web::get().to(crud::get::<Order>)));
    cfg.service(web::resource("/orders/{id}/status").route(web::put().to(change_status)));
}
