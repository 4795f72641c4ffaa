//! Importes: límites y aritmética sin desbordamiento.
//!
//! Internamente todo es `Decimal`; en JSON y en la base de datos los importes
//! viajan como números (`rust_decimal::serde::float`).

use rust_decimal::Decimal;

use crate::api::{AppError, AppResult};

/// Importe máximo de un precio, tarifa o gasto (1.000.000)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Cantidad máxima de una línea de pedido
pub const MAX_QUANTITY: i32 = 9999;

fn too_large(field: &str) -> AppError {
    AppError::validation_field(field, "amount is too large")
}

/// Importe no negativo y dentro del máximo
pub fn require_amount(field: &str, value: Decimal) -> AppResult<Decimal> {
    if value.is_sign_negative() {
        return Err(AppError::validation_field(field, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation_field(
            field,
            &format!("must not exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(value)
}

pub fn add(field: &str, left: Decimal, right: Decimal) -> AppResult<Decimal> {
    left.checked_add(right).ok_or_else(|| too_large(field))
}

pub fn mul(field: &str, left: Decimal, right: Decimal) -> AppResult<Decimal> {
    left.checked_mul(right).ok_or_else(|| too_large(field))
}

/// Suma sin desbordamiento
pub fn sum(field: &str, values: impl IntoIterator<Item = Decimal>) -> AppResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(field, total, value))
}
