// Logging setup for NeuroPong
// The terminal UI owns stdout/stderr, so an interactive run logs to a file instead

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;

const LOG_FILE_NAME: &str = "neuropong.log";

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Default log file location, next to the config file
pub fn default_log_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("neuropong");
    path.push(LOG_FILE_NAME);
    path
}

/// Install the global tracing subscriber. Call once, before anything logs.
///
/// `debug` lowers the level from INFO to DEBUG, which adds per-agent retirement
/// and reproduction events.
pub fn init(target: LogTarget, debug: bool) -> io::Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = create_log_file(&path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }
    Ok(())
}

fn create_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    File::create(path)
}
