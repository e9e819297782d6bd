//! Command implementations for the trivia CLI

pub mod db;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use db::{run_migrate, run_seed};
pub use serve::run_serve;
