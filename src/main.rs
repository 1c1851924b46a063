use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use portfolio_api::auth::GoogleIdentityVerifier;
use portfolio_api::config;
use portfolio_api::database::{DatabasePool, MemoryStore};
use portfolio_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "portfolio-api")]
#[command(about = "Portfolio backend - blog, calendar and admin sign-in")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port to listen on (defaults to PORT or the configured port)
    #[arg(long)]
    port: Option<u16>,

    /// Serve from an in-process store instead of Postgres
    #[arg(long)]
    memory: bool,

    /// Admin account to register in memory mode (repeatable)
    #[arg(long = "admin-email", requires = "memory")]
    admin_emails: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("portfolio_api=info,tower_http=info")))
        .init();

    let args = Args::parse();

    let config = config::config().clone();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Portfolio API in {:?} mode", config.environment);

    let port = args.port.unwrap_or(config.api.port);
    let addr: SocketAddr = format!("{}:{}", args.bind, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, port))?;

    let (state, pool) = if args.memory {
        let store = MemoryStore::new();
        for email in &args.admin_emails {
            store.add_user(email, None).await;
            tracing::info!("Registered admin {}", email);
        }
        let identity = Arc::new(GoogleIdentityVerifier::new(config.google.client_id.clone()));
        tracing::warn!("Running with the in-memory store; data is lost on exit");
        (AppState::memory(config, store, identity)?, None)
    } else {
        let pool = DatabasePool::connect(&config.database).context("failed to create database pool")?;
        (AppState::postgres(config, pool.clone())?, Some(pool))
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Portfolio API listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
