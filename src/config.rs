//! Configuración del proceso a partir de variables de entorno (`.env`).

use std::env;
use std::path::PathBuf;

use crate::api::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub storage: Storage,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            storage: Storage::MongoDb,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "bistro_backoffice".to_string(),
            static_dir: PathBuf::from("./static"),
        }
    }
}

impl AppConfig {
    /// Lee la configuración del entorno
    ///
    /// - `BIND_ADDRESS` (default: 0.0.0.0:8080)
    /// - `STORAGE`: `mongodb` | `memory` (default: mongodb)
    /// - `MONGODB_URI` (default: mongodb://localhost:27017)
    /// - `MONGODB_DATABASE` (default: bistro_backoffice)
    /// - `STATIC_DIR` (default: ./static)
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();

        let storage = match lookup("STORAGE").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("mongodb") | Some("mongo") => Storage::MongoDb,
            Some("memory") => Storage::Memory,
            Some(other) => {
                return Err(AppError::Internal(format!(
                    "STORAGE must be 'mongodb' or 'memory', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            storage,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            mongodb_database: lookup("MONGODB_DATABASE").unwrap_or(defaults.mongodb_database),
            static_dir: lookup("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])).unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STORAGE", "Memory"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
        ]))
        .unwrap();
        assert_eq!(config.storage, Storage::Memory);
        assert_eq!(config.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn rejects_unknown_storage() {
        assert!(AppConfig::from_lookup(lookup(&[("STORAGE", "redis")])).is_err());
    }
}
