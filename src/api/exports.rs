//! # Exportaciones
//!
//! Descargas CSV por recurso y documentos HTML listos para imprimir.

use actix_web::{web, HttpResponse};

use super::{AppError, AppResult};
use crate::context::AppContext;
use crate::db::models::{
    Expense, FoodItem, Ingredient, MenuCategory, Order, RestaurantTable, Room, StaffMember,
    StaffShift,
};
use crate::db::{Query, Resource};
use crate::export::{self, CsvRecord};

async fn csv_response<R: Resource + CsvRecord>(ctx: &AppContext, name: &str) -> AppResult<HttpResponse> {
    let rows = ctx.repo::<R>().list(Query::new()).await?;
    tracing::debug!(resource = name, rows = rows.len(), "Exporting CSV");

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}.csv\"", name),
        ))
        .body(export::to_csv(&rows)))
}

/// `GET /export/{resource}`
async fn export_csv(ctx: web::Data<AppContext>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    match name.as_str() {
        "rooms" => csv_response::<Room>(&ctx, &name).await,
        "tables" => csv_response::<RestaurantTable>(&ctx, &name).await,
        "menu_categories" => csv_response::<MenuCategory>(&ctx, &name).await,
        "food_items" => csv_response::<FoodItem>(&ctx, &name).await,
        "ingredients" => csv_response::<Ingredient>(&ctx, &name).await,
        "staff" => csv_response::<StaffMember>(&ctx, &name).await,
        "shifts" => csv_response::<StaffShift>(&ctx, &name).await,
        "orders" => csv_response::<Order>(&ctx, &name).await,
        "expenses" => csv_response::<Expense>(&ctx, &name).await,
        other => Err(AppError::NotFound(format!("Nothing to export for '{}'", other))),
    }
}

fn html(document: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(document)
}

async fn print_order(ctx: web::Data<AppContext>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let order = ctx.repo::<Order>().get(&path).await?;

    let table_label = match &order.table_id {
        Some(table_id) => ctx
            .repo::<RestaurantTable>()
            .find(table_id)
            .await?
            .map(|t| format!("Table {}", t.table_number)),
        None => None,
    };

    Ok(html(export::order_receipt(&order, table_label.as_deref())))
}

async fn print_menu(ctx: web::Data<AppContext>) -> AppResult<HttpResponse> {
    let categories = ctx.repo::<MenuCategory>().list(Query::new()).await?;
    let items = ctx.repo::<FoodItem>().list(Query::new()).await?;

    Ok(html(export::menu_document(&categories, &items)))
}

/// # Rutas
/// - `GET /export/{resource}`
/// - `GET /print/orders/{id}`, `GET /print/menu`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/export/{resource}").route(web::get().to(export_csv)));
    cfg.service(web::resource("/print/orders/{id}").route(web::get().to(print_order)));
    cfg.service(web::resource("/print/menu").route(web::get().to(print_menu)));
}
