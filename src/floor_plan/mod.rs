//! # Editor del plano de mesas
//!
//! Modelo del editor visual: cada mesa ([`TableElement`]) sigue los gestos de
//! mover / redimensionar / rotar, y el [`FloorPlanEditor`] lleva el modo de
//! edición, la herramienta activa, la selección y los cambios sin guardar.
//!
//! Las posiciones durante un arrastre son provisionales: sólo se persisten al
//! guardar explícitamente.

mod editor;
mod element;

pub use editor::{ExitOutcome, FloorPlanEditor};
pub use element::TableElement;

use serde::{Deserialize, Serialize};

/// Tamaño mínimo (ancho y alto) de una mesa en el plano
pub const MIN_TABLE_SIZE: f64 = 50.0;

/// Grados que avanza la herramienta de rotar en cada clic
pub const ROTATION_STEP: f64 = 45.0;

pub fn clamp_dimension(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_TABLE_SIZE;
    }
    value.max(MIN_TABLE_SIZE)
}

/// Lleva cualquier ángulo a [0, 360)
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    degrees.rem_euclid(360.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Posición, tamaño y rotación de una mesa
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTool {
    #[default]
    Select,
    Move,
    Resize,
    Rotate,
}

/// Cambio emitido por una mesa durante un gesto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutChange {
    Position { x: f64, y: f64 },
    Size { width: f64, height: f64 },
    Rotation { degrees: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_never_drop_below_minimum() {
        assert_eq!(clamp_dimension(-400.0), MIN_TABLE_SIZE);
        assert_eq!(clamp_dimension(49.9), MIN_TABLE_SIZE);
        assert_eq!(clamp_dimension(120.0), 120.0);
        assert_eq!(clamp_dimension(f64::NAN), MIN_TABLE_SIZE);
    }

    #[test]
    fn rotation_wraps() {
        assert_eq!(normalize_rotation(360.0), 0.0);
        assert_eq!(normalize_rotation(405.0), 45.0);
        assert_eq!(normalize_rotation(-90.0), 270.0);
    }
}
