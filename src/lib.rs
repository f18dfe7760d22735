pub mod types;
pub mod config;
pub mod error;
pub mod seeding;
pub mod bracket;
pub mod draw;
pub mod view;
pub mod export;
pub mod commands;
pub mod server;

use types::*;
use config::*;

use std::{
    fs,
    sync::{Arc, Mutex},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── Entry point ────────────────────────────────────────────────────────

pub fn run() {
    load_env_file();

    // Initialize tracing with daily rolling file output
    let logs_dir = logs_dir();
    fs::create_dir_all(&logs_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    info!("Bracket Draw starting");

    let config = match load_config_inner() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}; falling back to defaults");
            apply_env_defaults(AppConfig::default())
        }
    };
    log_config_warnings(&config);

    let state = ServerState {
        draw_state: Arc::new(Mutex::new(DrawState::default())),
        config,
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to start async runtime: {e}");
            return;
        }
    };
    runtime.block_on(server::start_draw_server(state));
}
