//! Database layer - store trait, backends, pool and schema
//!
//! # Design Principles
//!
//! - Handlers depend on `TriviaStore`, never on a concrete backend
//! - Connection pool (max 5 connections by default)
//! - Lookups that miss return `DbError::NotFound`, not `Option`

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use postgres::PgStore;
pub use store::{DbError, TriviaStore};
