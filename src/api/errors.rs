//! # Manejo de errores
//!
//! Jerarquía de errores de la aplicación construida con thiserror. Cada
//! variante sabe qué código HTTP le corresponde y qué mensaje (el "toast")
//! recibe el front-end.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

use crate::db::DbError;

/// Tipos de error de la aplicación con contexto
#[derive(Error, Debug)]
pub enum AppError {
    /// Error de base de datos con la operación que lo provocó
    #[error("Database error during '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: DbError,
    },

    /// Error de validación con campo específico
    #[error("Validation error on field '{field}': {message}")]
    ValidationWithField { field: String, message: String },

    /// Error de validación general
    #[error("{0}")]
    Validation(String),

    /// Recurso no encontrado por ID
    #[error("{resource_type} with id '{id}' not found")]
    NotFoundWithId { resource_type: String, id: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Error interno con código de rastreo
    #[error("Internal error (trace: {trace_id}): {message}")]
    InternalWithTrace { trace_id: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// Métodos helper para crear errores con contexto
impl AppError {
    /// Crea un error de base de datos con contexto de operación
    pub fn database(operation: &str, source: DbError) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Crea un error de no encontrado con ID
    pub fn not_found_id(resource_type: &str, id: &str) -> Self {
        Self::NotFoundWithId {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Crea un error interno con trace ID (se genera uno si no se pasa)
    pub fn internal_trace(message: &str, trace_id: Option<String>) -> Self {
        Self::InternalWithTrace {
            trace_id: trace_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            message: message.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::ValidationWithField { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::NotFoundWithId { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database { .. } | Self::InternalWithTrace { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Log detallado del error antes de responder
        let body = match self {
            Self::Database { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "Database error occurred"
                );
                ErrorResponse::new("Database error", "The request could not be completed")
            }
            Self::ValidationWithField { field, message } => {
                tracing::warn!(field = %field, message = %message, "Validation error");
                ErrorResponse::new("Validation error", &format!("{}: {}", field, message))
            }
            Self::Validation(message) => {
                tracing::warn!(message = %message, "Validation error");
                ErrorResponse::new("Validation error", message)
            }
            Self::NotFoundWithId { resource_type, id } => {
                tracing::info!(resource_type = %resource_type, id = %id, "Resource not found");
                ErrorResponse::new("Not found", &self.to_string())
            }
            Self::NotFound(message) => {
                tracing::info!(message = %message, "Resource not found");
                ErrorResponse::new("Not found", message)
            }
            Self::Conflict(message) => {
                tracing::warn!(message = %message, "Conflict");
                ErrorResponse::new("Conflict", message)
            }
            Self::InternalWithTrace { trace_id, message } => {
                tracing::error!(trace_id = %trace_id, message = %message, "Internal error with trace");
                ErrorResponse::new("Internal error", &format!("Internal error (trace: {})", trace_id))
            }
            Self::Internal(message) => {
                tracing::error!(message = %message, "Internal error");
                ErrorResponse::new("Internal error", "Internal server error")
            }
        };

        HttpResponse::build(status).json(body)
    }
}

/// Cuerpo JSON de todas las respuestas de error
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(error: DbError) -> Self {
        Self::Database {
            operation: "database_operation".to_string(),
            source: error,
        }
    }
}

pub trait ResultExt<T> {
    fn map_err_validation(self, message: &str) -> AppResult<T>;
    fn map_err_internal(self, message: &str) -> AppResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + 'static,
{
    fn map_err_validation(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::Validation(format!("{}: {}", message, e)))
    }

    fn map_err_internal(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::internal_trace(&format!("{}: {}", message, e), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found_id("Room", "1").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::database("select rooms", DbError::Unavailable("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_trace_generates_id_when_missing() {
        match AppError::internal_trace("boom", None) {
            AppError::InternalWithTrace { trace_id, .. } => assert!(!trace_id.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn map_err_validation_keeps_source_message() {
        let parsed: Result<i32, std::num::ParseIntError> = "abc".parse();
        let err = parsed.map_err_validation("page").unwrap_err();
        assert!(err.to_string().starts_with("page: "));
    }
}
