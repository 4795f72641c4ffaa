// src/db/mod.rs
pub mod client;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repo;

pub use client::{DbError, DbResult, Direction, Query, QueryClient};
pub use memory::MemoryClient;
pub use self::mongodb::MongoClient;
pub use repo::{Editable, FilterKind, Repo, Resource};
