use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config;
use crate::database::{MemoryNoteRepository, NoteRepository};

use super::connect_postgres;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides NOTES_API_PORT / PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep notes in process memory instead of PostgreSQL")]
    pub in_memory: bool,

    #[arg(
        long = "user",
        value_name = "USERNAME",
        requires = "in_memory",
        help = "Seed a user into the in-memory store (repeatable)"
    )]
    pub users: Vec<String>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    info!("Starting Notes API in {:?} mode", config.environment);

    let notes: Arc<dyn NoteRepository> = if args.in_memory {
        let repo = MemoryNoteRepository::new();
        for username in &args.users {
            let user = repo.add_user(username).await;
            info!(user_id = %user.id, username = %user.username, "Seeded in-memory user");
        }
        Arc::new(repo)
    } else {
        let repo = connect_postgres().await?;
        repo.migrate().await.context("failed to prepare schema")?;
        Arc::new(repo)
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    let state = AppState::new(notes.clone(), config);
    info!("Notes API listening on http://{} ({} store)", bind_addr, notes.backend_tag());

    let served = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Dispose of the store handle whether or not the server exited cleanly
    notes.close().await;
    served.context("server failed")?;

    info!("Notes API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}
