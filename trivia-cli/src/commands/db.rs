//! Schema and seed commands
//!
//! Both operate on the PostgreSQL store only; the in-memory store is
//! created and seeded by `serve --in-memory`.

use anyhow::{Context, Result};
use clap::Parser;

use trivia_server::db::{create_pool_with_options, migrations, PgStore, TriviaStore};
use trivia_server::models::DEFAULT_CATEGORIES;

/// Database connection arguments
#[derive(Parser, Debug)]
pub struct DbArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "TRIVIA_MAX_CONNECTIONS", default_value_t = trivia_server::db::DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

async fn connect(args: &DbArgs) -> Result<PgStore> {
    let pool = create_pool_with_options(&args.database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;
    Ok(PgStore::new(pool))
}

/// Create the trivia tables
pub async fn run_migrate(args: DbArgs) -> Result<()> {
    let store = connect(&args).await?;
    migrations::run(store.pool())
        .await
        .context("Failed to run migrations")?;
    println!("Schema is up to date");
    Ok(())
}

/// Create the tables and insert the default categories into an empty table
pub async fn run_seed(args: DbArgs) -> Result<()> {
    let store = connect(&args).await?;
    migrations::run(store.pool())
        .await
        .context("Failed to run migrations")?;

    let inserted = store
        .seed_categories(&DEFAULT_CATEGORIES)
        .await
        .context("Failed to seed categories")?;

    if inserted == 0 {
        println!("Categories already present, nothing seeded");
    } else {
        println!("Seeded {} categories", inserted);
    }
    Ok(())
}
