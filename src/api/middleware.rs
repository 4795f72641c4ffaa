//! # Utilidades de logging para errores
//!
//! Registra la cadena completa de `source()` de un error con tracing.

use std::error::Error as StdError;

/// Recorre la cadena de errores y devuelve cada mensaje en orden
pub fn error_chain<E>(error: &E) -> Vec<String>
where
    E: StdError + 'static,
{
    let mut chain = Vec::new();
    let mut current: Option<&dyn StdError> = Some(error);

    while let Some(err) = current {
        chain.push(err.to_string());
        current = err.source();
    }

    chain
}

/// Registra la cadena completa de errores
///
/// # Parámetros
/// - `error`: Error a analizar y registrar
/// - `context`: Contexto opcional (p. ej. "saving floor plan")
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let chain = error_chain(error);

    if let Some(ctx) = context {
        tracing::error!(context = %ctx, error_chain = ?chain, "Error with full chain (with context)");
    } else {
        tracing::error!(error_chain = ?chain, "Error with full chain");
    }
}

/// Extension trait para Results que añade logging automático de error chains
///
/// ```ignore
/// repo.insert(room).await.log_error_context("creating room")?;
/// ```
pub trait ErrorLogExt<T, E> {
    /// Loggea la cadena de errores con contexto adicional
    fn log_error_context(self, context: &str) -> Result<T, E>;

    /// Loggea sólo como advertencia (errores esperables, p. ej. validación)
    fn log_error_warn(self) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }

    fn log_error_warn(self) -> Result<T, E> {
        if let Err(ref error) = self {
            tracing::warn!(error_chain = ?error_chain(error), "Warning with error chain");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AppError;
    use crate::db::DbError;

    #[test]
    fn chain_includes_sources() {
        let err = AppError::database("update restaurant_tables", DbError::Unavailable("offline".into()));
        let chain = error_chain(&err);
        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("update restaurant_tables"));
        assert!(chain[1].contains("offline"));
    }

    #[test]
    fn log_helpers_pass_result_through() {
        let ok: Result<u8, AppError> = Ok(3);
        assert_eq!(ok.log_error_context("noop").unwrap(), 3);

        let err: Result<u8, AppError> = Err(AppError::Validation("bad".into()));
        assert!(err.log_error_warn().is_err());
    }
}
