//! # Bistro Backoffice Server
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! # Almacenamiento: mongodb | memory
//! STORAGE=mongodb
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=bistro_backoffice
//!
//! # Servidor
//! BIND_ADDRESS=0.0.0.0:8080
//! STATIC_DIR=./static
//!
//! # Logging
//! RUST_LOG=debug,mongodb=info
//! ```
//!
//! ## Ejecución
//!
//! ```bash
//! # Con MongoDB local
//! docker run -d --name mongo -p 27017:27017 mongo:latest
//! cargo run
//!
//! # Sin base de datos (los datos se pierden al parar)
//! STORAGE=memory cargo run
//! ```

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use bistro_backoffice::api;
use bistro_backoffice::config::AppConfig;
use bistro_backoffice::context::AppContext;

fn to_io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el sistema de logging con tracing
/// 3. Construye el [`AppContext`] (conexión e índices si es MongoDB)
/// 4. Configura el servidor HTTP con logging, rutas de la API, archivos
///    estáticos y redirección de la ruta raíz
/// 5. Libera el contexto al terminar
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida, no se puede
/// conectar a MongoDB o no se puede bindear al puerto.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bistro_backoffice=debug,mongodb=info,actix_web=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env().map_err(to_io_error)?;
    tracing::info!(storage = ?config.storage, "Starting Bistro Backoffice server");

    let ctx = match AppContext::init(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Failed to initialise storage: {}", e);
            return Err(to_io_error(e));
        }
    };

    let bind_address = ctx.config.bind_address.clone();
    let static_dir = ctx.config.static_dir.clone();
    let data = web::Data::new(ctx.clone());

    tracing::info!("Server listening on {}", bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(api::json_config())
            .wrap(Logger::default())
            .configure(api::init_routes)
            .service(Files::new("/static", static_dir.clone()).index_file("index.html"))
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/static/index.html"))
                        .finish()
                }),
            )
    })
    .bind(&bind_address)?
    .run()
    .await?;

    ctx.shutdown();
    Ok(())
}
