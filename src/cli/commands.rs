//! CLI command implementations
//!
//! Startup order: configuration, logging, store replay, then the command.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::run_session;
use super::logging::{init_logging, LogConfig};
use super::menu::MenuSession;
use crate::directory::DirectoryService;
use crate::storage::{FileStore, LOG_FILE_NAME};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let config = Config::load_or_default(cli.config.as_deref())?;
    let log_config = LogConfig {
        level: config.level()?,
        format: config.log_format,
    }
    .with_verbosity(cli.verbose);
    init_logging(&log_config)?;

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_path());
    run_command(cli.command(), &data_dir)
}

/// Run the appropriate command
pub fn run_command(cmd: Command, data_dir: &Path) -> CliResult<()> {
    match cmd {
        Command::Init => init(data_dir),
        Command::Run => start(data_dir),
    }
}

/// Creates the data directory and an empty contact log.
///
/// Fails if a contact log already exists there.
pub fn init(data_dir: &Path) -> CliResult<()> {
    if is_initialized(data_dir) {
        return Err(CliError::already_initialized(&data_dir.display().to_string()));
    }

    let store = FileStore::open(data_dir)?;
    info!(path = %store.path().display(), "contact log created");
    println!("Initialized contact directory at {}", data_dir.display());

    Ok(())
}

/// Opens the store and runs the interactive menu on stdin/stdout.
pub fn start(data_dir: &Path) -> CliResult<()> {
    let store = FileStore::open(data_dir)?;
    info!(path = %store.path().display(), contacts = store.len(), "contact directory opened");

    let mut session = MenuSession::new(DirectoryService::new(store));
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    run_session(&mut session, stdin.lock(), &mut stdout)
}

/// Returns true if `data_dir` already holds a contact log.
pub fn is_initialized(data_dir: &Path) -> bool {
    log_path(data_dir).exists()
}

fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_once() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("contacts");

        assert!(!is_initialized(&data_dir));
        init(&data_dir).unwrap();
        assert!(is_initialized(&data_dir));

        let err = init(&data_dir).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }
}
