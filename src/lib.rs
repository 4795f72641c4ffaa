//! # Bistro Backoffice
//!
//! Servidor de gestión interna de un restaurante construido con Rust, Actix Web y MongoDB.
//!
//! ## Características principales
//!
//! - **Carta**: categorías y platos con precio y disponibilidad
//! - **Inventario**: ingredientes, ajustes de stock y avisos de mínimo
//! - **Personal**: fichas, turnos y nómina por rango de fechas
//! - **Salas y mesas**: plano editable (mover, redimensionar, rotar)
//! - **Pedidos y finanzas**: flujo de cocina, gastos y resumen de ingresos
//! - **Exportación**: CSV por recurso y documentos imprimibles
//!
//! ## Arquitectura
//!
//! ```text
//! Frontend (HTML/CSS/JS)
//!     ↓ HTTP/JSON
//! API REST (Actix Web) ── Repo<R> ── QueryClient
//!                                       ├─ MongoClient
//!                                       └─ MemoryClient
//! ```

pub mod api;
pub mod config;
pub mod context;
pub mod db;
pub mod export;
pub mod floor_plan;
pub mod listing;
pub mod navigation;
