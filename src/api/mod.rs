//! # Módulo API
//!
//! Este módulo contiene todas las rutas y controladores de la API REST.
//!
//! ## Módulos principales
//!
//! - [`crud`] - Handlers genéricos de listado/alta/edición/borrado
//! - [`rooms`] - Salas
//! - [`tables`] - Mesas y guardado del plano
//! - [`menu`] - Categorías y platos
//! - [`inventory`] - Ingredientes y stock
//! - [`staff`] - Personal, turnos y nómina
//! - [`orders`] - Pedidos
//! - [`finance`] - Gastos y resumen financiero
//! - [`exports`] - CSV e impresión
//! - [`navigation`] - Menús de navegación por interfaz
//! - [`errors`] - Manejo de errores de la aplicación

pub mod crud;
pub mod errors;
pub mod exports;
pub mod finance;
pub mod inventory;
pub mod menu;
pub mod middleware;
pub mod navigation;
pub mod orders;
pub mod rooms;
pub mod staff;
pub mod tables;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse, ResultExt};

use actix_web::web;

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/rooms/*` - Ver [`rooms::routes`]
/// - `/tables/*` - Ver [`tables::routes`]
/// - `/menu/*` - Ver [`menu::routes`]
/// - `/ingredients/*` - Ver [`inventory::routes`]
/// - `/staff/*` - Ver [`staff::routes`]
/// - `/orders/*` - Ver [`orders::routes`]
/// - `/expenses/*`, `/finance/*` - Ver [`finance::routes`]
/// - `/export/*`, `/print/*` - Ver [`exports::routes`]
/// - `/navigation/*` - Ver [`navigation::routes`]
///
/// # Ejemplo
///
/// ```no_run
/// use actix_web::{web, App};
/// use bistro_backoffice::{api, context::AppContext};
///
/// let app = App::new()
///     .app_data(web::Data::new(AppContext::in_memory()))
///     .app_data(api::json_config())
///     .configure(api::init_routes);
/// ```
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    rooms::routes(cfg);
    tables::routes(cfg);
    menu::routes(cfg);
    inventory::routes(cfg);
    staff::routes(cfg);
    orders::routes(cfg);
    finance::routes(cfg);
    exports::routes(cfg);
    navigation::routes(cfg);
}

/// Los cuerpos JSON mal formados responden con el mismo formato de error que el resto
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected JSON body: {}", err);
        AppError::Validation(err.to_string()).into()
    })
}
