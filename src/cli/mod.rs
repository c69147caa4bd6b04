//! CLI module for contactdir
//!
//! Provides command-line interface for:
//! - init: Create the data directory and contact log
//! - run: Interactive add/update/find/page menu

mod args;
mod commands;
mod config;
mod errors;
mod input;
mod io;
mod logging;
mod menu;

pub use args::{Cli, Command};
pub use commands::{init, is_initialized, run, run_command, start};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use input::{parse_add_line, parse_find_line, parse_update_line};
pub use io::run_session;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use menu::{Flow, MenuSession, MenuState, MAIN_MENU_TEXT, NO_RECORDS_FOUND};
