use std::path::PathBuf;
use std::process::ExitCode;

use chromatics::{KeyboardConfig, LogBackend, spawn_engine, terminal};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match KeyboardConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => KeyboardConfig::default(),
    };

    let octaves = config.octaves;
    let engine = match spawn_engine(config, LogBackend::new()) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to start audio: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = terminal::run(&engine, octaves);
    engine.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal error: {}", e);
            ExitCode::FAILURE
        }
    }
}
