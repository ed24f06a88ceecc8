use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use voxsync_server::config::ServerConfig;
use voxsync_server::state::ServerState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config_path: Option<PathBuf> = std::env::args()
        .skip_while(|a| a != "--config")
        .nth(1)
        .map(PathBuf::from);

    let mut config = match &config_path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if let Some(bind) = std::env::args().skip_while(|a| a != "--bind").nth(1) {
        config.bind = bind;
    }
    if let Some(seed) = std::env::args().skip_while(|a| a != "--seed").nth(1) {
        config.world.seed = seed
            .parse()
            .with_context(|| format!("--seed expects an integer, got {:?}", seed))?;
    }
    config.world.validate()?;

    tracing::info!(
        "voxsync -- seed {}, chunks {}x{}x{}",
        config.world.seed,
        config.world.chunk_size,
        config.world.chunk_size,
        config.world.world_height,
    );

    let state = Arc::new(ServerState::new(config.world.clone()));

    // Warm the spawn neighborhood so the first welcome is instant.
    let started = Instant::now();
    let around = config.world.spawn_chunk().neighborhood(1);
    state.chunks.get_many(&around);
    tracing::info!(
        "Spawn area ready: {} chunks in {:?}",
        state.chunks.chunk_count(),
        started.elapsed()
    );

    tokio::select! {
        result = voxsync_server::net::listener::run(Arc::clone(&state), &config.bind) => {
            result.with_context(|| format!("listener on {}", config.bind))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down...");
        }
    }

    let snap = state.metrics_snapshot();
    tracing::info!(
        "Served {} events, generated {} chunks",
        snap.events_total,
        snap.chunks_generated
    );
    Ok(())
}
