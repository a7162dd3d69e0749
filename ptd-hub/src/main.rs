//! ptd-hub - Program tracking store hub
//!
//! Holds the shared `programs` and `history` collections, runs every partial
//! update through the audit-diff pipeline, and mirrors each change to all
//! connected clients over SSE.

use anyhow::Result;
use clap::Parser;
use ptd_common::config::HubConfig;
use ptd_hub::store::ProgramStore;
use ptd_hub::{build_router, db, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ptd-hub", about = "Program tracking store hub")]
struct Args {
    /// Data folder holding the SQLite database
    #[arg(long, env = "PTD_DATA_DIR")]
    data_dir: Option<String>,

    /// Listen address (host:port)
    #[arg(long, env = "PTD_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting PTD Hub (ptd-hub) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = HubConfig::resolve(args.data_dir.as_deref(), args.bind.as_deref());

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path).await?;
    info!("✓ Database ready");

    let state = AppState::new(ProgramStore::new(pool));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("ptd-hub listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
