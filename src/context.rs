//! Contexto de aplicación: configuración + cliente de datos, creado una vez
//! en el arranque e inyectado en los handlers con `web::Data`.

use std::sync::Arc;

use crate::api::{AppError, AppResult};
use crate::config::{AppConfig, Storage};
use crate::db::{MemoryClient, MongoClient, QueryClient, Repo, Resource};

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub db: Arc<dyn QueryClient>,
}

impl AppContext {
    pub fn new(config: AppConfig, db: Arc<dyn QueryClient>) -> Self {
        Self { config, db }
    }

    /// Conecta con el backend configurado
    pub async fn init(config: AppConfig) -> AppResult<Self> {
        let db: Arc<dyn QueryClient> = match config.storage {
            Storage::MongoDb => {
                let client = MongoClient::connect(&config.mongodb_uri, &config.mongodb_database)
                    .await
                    .map_err(|e| AppError::database("connect", e))?;

                // No es un error fatal, continuamos sin índices
                if let Err(e) = client.create_indexes().await {
                    tracing::warn!("Advertencia creando índices: {}", e);
                }
                Arc::new(client)
            }
            Storage::Memory => {
                tracing::warn!("Using in-memory storage: data is lost on shutdown");
                Arc::new(MemoryClient::new())
            }
        };

        Ok(Self::new(config, db))
    }

    /// Contexto con almacenamiento en memoria (tests y demos)
    pub fn in_memory() -> Self {
        let config = AppConfig {
            storage: Storage::Memory,
            ..AppConfig::default()
        };
        Self::new(config, Arc::new(MemoryClient::new()))
    }

    pub fn repo<R: Resource>(&self) -> Repo<R> {
        Repo::new(Arc::clone(&self.db))
    }

    pub fn shutdown(&self) {
        tracing::info!(storage = ?self.config.storage, "Application context shut down");
    }
}
