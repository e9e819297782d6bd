//! HTTP server command
//!
//! Runs the trivia API against PostgreSQL, or against an in-memory store
//! for local poking around.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use trivia_server::db::{
    create_pool_with_options, migrations, MemoryStore, PgStore, TriviaStore, DEFAULT_MAX_CONNECTIONS,
};
use trivia_server::http::{run_server, ServerConfig};
use trivia_server::models::DEFAULT_CATEGORIES;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TRIVIA_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Database URL (overrides environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "TRIVIA_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Serve from an in-memory store seeded with the default categories
    #[arg(long)]
    pub in_memory: bool,

    /// Insert the default categories if the category table is empty
    #[arg(long)]
    pub seed: bool,

    /// Skip creating missing tables on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store: Arc<dyn TriviaStore> = if args.in_memory {
        tracing::warn!("Serving from an in-memory store; data is lost on exit");
        Arc::new(MemoryStore::with_categories(&DEFAULT_CATEGORIES))
    } else {
        let database_url = args
            .database_url
            .as_deref()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env or .env, or use --in-memory")?;

        let pool = create_pool_with_options(database_url, args.max_connections)
            .await
            .context("Failed to create database pool")?;

        if !args.no_migrate {
            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;
        }

        let store = PgStore::new(pool);
        if args.seed {
            let inserted = store
                .seed_categories(&DEFAULT_CATEGORIES)
                .await
                .context("Failed to seed categories")?;
            tracing::info!(inserted, "category seed complete");
        }
        Arc::new(store)
    };

    tracing::info!("Starting trivia server on {}", args.bind);

    // Run server (blocks until shutdown)
    run_server(store, ServerConfig { bind_addr: args.bind })
        .await
        .context("Server error")?;

    Ok(())
}
