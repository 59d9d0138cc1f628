//! File logging, enabled through the `SHOOTINGSTAR_LOG` environment variable.
//!
//! The terminal is busy drawing stars, so log lines go to
//! `shootingstar.log` in the platform data directory instead of stderr.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `debug` or `shootingstar_engine=trace`.
pub const LOG_ENV: &str = "SHOOTINGSTAR_LOG";

const LOG_FILE_NAME: &str = "shootingstar.log";

/// Install the global subscriber when `SHOOTINGSTAR_LOG` holds a valid filter.
pub fn init() -> color_eyre::Result<()> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return Ok(());
    };

    let dir = log_dir();
    fs::create_dir_all(&dir)?;
    let file = File::create(dir.join(LOG_FILE_NAME))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!(e))
}

fn log_dir() -> PathBuf {
    ProjectDirs::from("", "", "shootingstar")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
}
