//! Diagnostic log for roster-audit runs.
//!
//! Verdict events and probe failures land in a file under the XDG state
//! directory. The per-player console lines are written separately and never
//! pass through here.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const APP_PREFIX: &str = "roster-audit";
const DEFAULT_FILTER: &str = "info,roster_core=debug";

/// Append-mode log file shared by every event; an event whose handle
/// cannot be duplicated goes to stderr instead.
struct AppendLog(fs::File);

impl<'a> MakeWriter<'a> for AppendLog {
    type Writer = Box<dyn io::Write>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::stderr()),
        }
    }
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already set: {e}"))
}

/// `~/.local/state/roster-audit/roster-audit.log`, creating the directory if needed.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(xdg_dirs.place_state_file(format!("{APP_PREFIX}.log"))?)
}

/// Send logs to the state-dir file. `RUST_LOG` overrides the default filter.
///
/// Errors leave no subscriber installed; follow up with `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    install(AppendLog(file))?;
    tracing::info!(log = %path.display(), "roster-audit run started");
    Ok(path)
}

/// Send logs to stderr. Silently does nothing if a subscriber is already set.
pub fn init_logging_stderr() {
    let _ = install(io::stderr);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn append_log_writers_share_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster-audit.log");
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        let log = AppendLog(file);
        log.make_writer().write_all(b"first\n").unwrap();
        log.make_writer().write_all(b"second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
