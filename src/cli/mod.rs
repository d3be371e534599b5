//! Report shell over one user's ledger snapshot.
//!
//! Set `FINANCE_CORE_CLI_SCRIPT` to read newline-separated commands from
//! stdin instead of running the interactive prompt.

pub mod commands;
pub mod context;
pub mod output;
mod shell;
pub mod table;

pub use context::{CliError, CliMode, CommandError, CommandResult, ShellContext};
pub use shell::run_cli;
