//! Diagnostic logging setup.
//!
//! stdout carries the JSON-RPC stream, so logs go to stderr and to a log
//! file in the user's home directory.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::error::{McpError, Result};

/// File name of the log inside the home directory.
pub const LOG_FILE_NAME: &str = ".mcp-bridge.log";

/// `~/.mcp-bridge.log`, if a home directory is known.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Filter honoring `RUST_LOG`, with this crate at info (or debug).
pub fn env_filter(debug: bool) -> Result<EnvFilter> {
    let level = if debug { "debug" } else { "info" };
    let directive = format!("chroma_mcp_bridge={}", level)
        .parse::<Directive>()
        .map_err(|e| McpError::Internal(format!("invalid log directive: {}", e)))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Install the global subscriber.
///
/// A log file that cannot be opened is reported and skipped; stderr logging
/// still comes up.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = env_filter(debug)?;
    let file = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "Warning: cannot open log file {}: {}",
                path.display(),
                e
            );
            None
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);

    let installed = match file {
        Some(file) => builder
            .with_writer(std::io::stderr.and(Mutex::new(file)))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| McpError::Internal(format!("failed to install logger: {}", e)))
}
