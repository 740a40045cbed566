//! jinxecho — the console where JinxEcho wakes, breathes, and remembers.
//! Reads one line at a time from stdin; memory is written through to JSON.

mod app;
mod command;
mod mirror;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use jinx_core::config::Config;
use jinx_core::persona::{self, Persona};
use jinx_core::store::RelationshipStore;

use app::App;

/// Tracing goes to a file, never stdout, since the dialogue owns the terminal.
fn init_tracing(log_file: &Path) {
    let log_file = log_file.to_path_buf();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(move || -> Box<dyn io::Write> {
            match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
            {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        })
        .try_init();
}

fn load_persona(config: &Config) -> Persona {
    let Some(path) = config.persona_file() else {
        return Persona::default();
    };
    match persona::load_persona_from(&path) {
        Ok(Some(p)) => p,
        Ok(None) => {
            warn!("No persona at {}, using JinxEcho", path.display());
            Persona::default()
        }
        Err(e) => {
            warn!("{:#}; using JinxEcho", e);
            Persona::default()
        }
    }
}

fn main() -> Result<()> {
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_from_dir(&project_root).context("Failed to load configuration")?;

    init_tracing(&config.log_file());

    let store = RelationshipStore::load_or_empty(config.state_file());
    let persona = load_persona(&config);
    info!(
        "{} waking with {} relationships from {}",
        persona.name,
        store.len(),
        store.path().display()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = App::new(stdin.lock(), stdout.lock(), store, config, persona);
    let exit = app.run()?;
    info!(
        "Session ended ({:?}), {} conversations remembered",
        exit,
        app.store().conversations().len()
    );
    Ok(())
}
