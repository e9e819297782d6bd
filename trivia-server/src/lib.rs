//! trivia-server: HTTP API over a trivia question store
//!
//! Lists categories, pages/searches/creates/deletes questions, lists
//! questions by category and serves quiz questions drawn at random from
//! those not yet asked.

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, MemoryStore, PgStore, TriviaStore};
pub use http::{build_router, run_server, ApiError, ServerConfig};
