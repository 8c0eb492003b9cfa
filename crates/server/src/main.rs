//! Pizzeria Server
//!
//! Axum server exposing the sauce/topping catalog and pizza composition API.

mod api;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pizzeria_core::state::PizzeriaDb;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::api::{router, AppState};
use crate::config::{PersistedConfig, ServerConfig};

#[derive(Parser, Clone)]
#[command(author, version, about = "Pizzeria - pizza composition API")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the Pizzeria server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Do not seed default sauces and toppings on startup
        #[arg(long)]
        no_seed: bool,
    },
    /// Seed default sauces and toppings into an empty catalog and exit
    Seed {
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let db = PizzeriaDb::open_at(&config.db_path)?;
    if config.seed {
        db.seed_ingredients().context("Failed to seed catalog")?;
    }

    let state = Arc::new(AppState::new(&db));
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Pizzeria Server running at http://{}", addr);
    tracing::info!("   Catalog: /pizza/sauces, /pizza/toppings, /pizza/{{sauce|topping}}/:name");
    tracing::info!("   Pizzas:  /pizza, /pizza/:id");
    tracing::info!("   OpenAPI: /api/v1/openapi.json");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().context("Failed to close database")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }
    init_tracing();

    let args = Args::parse();

    match args.command {
        Some(CliCommand::Seed { db }) => {
            let config = ServerConfig::resolve(PersistedConfig {
                db_path: db,
                ..Default::default()
            });
            let db = PizzeriaDb::open_at(&config.db_path)?;
            let inserted = db.seed_ingredients()?;
            println!("Seeded {} ingredients into {:?}", inserted, config.db_path);
            db.close()?;
            Ok(())
        }
        Some(CliCommand::Serve { port, db, no_seed }) => {
            let config = ServerConfig::resolve(PersistedConfig {
                port,
                db_path: db,
                seed: no_seed.then_some(false),
            });
            run_server(config).await
        }
        None => run_server(ServerConfig::resolve(PersistedConfig::default())).await,
    }
}
