//! # datakit-api server binary
//!
//! Parses flags, initializes tracing, and serves the application router.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use datakit_api::{app, AppState};

/// Schema-driven CRUD backend.
///
/// Define apps with JSON-Schema resource types, store validated records
/// under datasets, and browse the per-app API via Swagger UI.
#[derive(Parser, Debug)]
#[command(name = "datakit-api", version, about, long_about = None)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0", env = "DATAKIT_BIND")]
    bind: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080, env = "DATAKIT_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.bind, args.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "datakit-api listening");

    axum::serve(listener, app(AppState::new())).await?;
    Ok(())
}
