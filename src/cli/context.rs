use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::cli::commands::{all_definitions, CommandRegistry};
use crate::cli::output;
use crate::config::{Config, ConfigManager};
use crate::core::{Clock, FixedClock, SystemClock};
use crate::currency::{
    format_currency_value, format_date, CurrencyCode, FormatOptions, LocaleConfig,
};
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::storage::json_backend::load_data_from_path;

const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("no ledger loaded; use `load <path> [user]` first")]
    LedgerNotLoaded,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<LoopControl, CommandError>;

/// Mutable state shared by every shell command.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config: Config,
    pub ledger: Option<Ledger>,
    pub source: Option<PathBuf>,
    pub last_command: Option<String>,
    pub running: bool,
    clock: Box<dyn Clock>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let mut context = Self::with_config(mode, config);
        if mode == CliMode::Interactive {
            context.auto_load();
        }
        Ok(context)
    }

    pub fn with_config(mode: CliMode, config: Config) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(all_definitions()),
            config,
            ledger: None,
            source: None,
            last_command: None,
            running: true,
            clock: Box::new(SystemClock),
        }
    }

    fn auto_load(&mut self) {
        let Some(path) = self.config.data_file.clone() else {
            return;
        };
        if !path.exists() {
            return;
        }
        match self.load_file(&path, None) {
            Ok(summary) => output::info(summary),
            Err(err) => output::warning(format!("could not open {}: {err}", path.display())),
        }
    }

    pub fn prompt(&self) -> String {
        match &self.ledger {
            Some(ledger) if !ledger.user_id.is_empty() => format!("finance [{}]> ", ledger.user_id),
            _ => "finance> ".into(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Pins the reporting date used by every date-relative command.
    pub fn set_today(&mut self, date: NaiveDate) {
        self.clock = Box::new(FixedClock::new(date));
    }

    /// Opens a store snapshot and keeps the ledger of `user`, or of the
    /// first user found when none is given.
    pub fn load_file(&mut self, path: &Path, user: Option<&str>) -> Result<String, CommandError> {
        let data = load_data_from_path(path)?;
        let user_id = match user {
            Some(user) => user.to_string(),
            None => data.user_ids().into_iter().next().unwrap_or_default(),
        };
        let ledger = data.ledger_for(&user_id);
        if ledger.is_empty() && user.is_some() {
            return Err(CommandError::InvalidArguments(format!(
                "no records for user `{user_id}` in {}",
                path.display()
            )));
        }
        let summary = format!(
            "Loaded {} expenses, {} incomes, {} budgets and {} goals for `{}` from {}",
            ledger.expenses.len(),
            ledger.incomes.len(),
            ledger.budgets.len(),
            ledger.savings_goals.len(),
            ledger.user_id,
            path.display()
        );
        tracing::info!(user = %ledger.user_id, path = %path.display(), "ledger loaded");
        for warning in ledger.warnings() {
            output::warning(warning);
        }
        self.ledger = Some(ledger);
        self.source = Some(path.to_path_buf());
        Ok(summary)
    }

    pub fn ledger(&self) -> Result<&Ledger, CommandError> {
        self.ledger.as_ref().ok_or(CommandError::LedgerNotLoaded)
    }

    fn locale(&self) -> LocaleConfig {
        self.config.locale_config()
    }

    /// Formats an amount in the configured display currency.
    pub fn format_amount(&self, amount: f64) -> String {
        self.format_in(amount, &CurrencyCode::new(self.config.currency.as_str()))
    }

    pub fn format_in(&self, amount: f64, code: &CurrencyCode) -> String {
        format_currency_value(amount, code, &self.locale(), &FormatOptions::default())
    }

    pub fn format_day(&self, date: NaiveDate) -> String {
        format_date(&self.locale(), date)
    }

    pub fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> CommandResult {
        match self.registry.get(command).map(|definition| definition.handler) {
            Some(handler) => handler(self, args),
            None => {
                self.suggest_command(raw);
                Err(CommandError::UnknownCommand(raw.to_string()))
            }
        }
    }

    fn suggest_command(&self, input: &str) {
        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (name, levenshtein(&needle, name)))
            .min_by_key(|(_, distance)| *distance);
        if let Some((name, distance)) = best {
            if distance <= SUGGESTION_DISTANCE {
                output::hint(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub fn report_error(&mut self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {
                self.running = false;
                Ok(())
            }
            CommandError::UnknownCommand(name) => {
                output::error(format!("Unknown command `{name}`. Type `help` for a list."));
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ExpenseDraft, IncomeDraft};
    use crate::storage::{json_backend::save_data_to_path, StoreData};
    use tempfile::tempdir;

    fn context() -> ShellContext {
        ShellContext::with_config(CliMode::Script, Config::default())
    }

    #[test]
    fn reports_need_a_loaded_ledger() {
        let mut ctx = context();
        let err = ctx.dispatch("summary", "summary", &[]).unwrap_err();
        assert!(matches!(err, CommandError::LedgerNotLoaded));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut ctx = context();
        let err = ctx.dispatch("sumary", "sumary", &[]).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(name) if name == "sumary"));
    }

    #[test]
    fn loads_first_user_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let data = StoreData {
            expenses: vec![ExpenseDraft::new("Cafe", "2026-10-02", 4.5, "Dining").into_record("e1", "u1")],
            incomes: vec![IncomeDraft::new("Salary", "2026-10-01", 100.0).into_record("i1", "u1")],
            ..StoreData::default()
        };
        save_data_to_path(&data, &path).unwrap();

        let mut ctx = context();
        let summary = ctx.load_file(&path, None).unwrap();
        assert!(summary.contains("1 expenses"));
        assert_eq!(ctx.ledger().unwrap().user_id, "u1");

        let err = ctx.load_file(&path, Some("nobody")).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn fixed_today_drives_reports() {
        let mut ctx = context();
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        ctx.set_today(day);
        assert_eq!(ctx.today(), day);
    }

    #[test]
    fn exit_request_stops_the_loop() {
        let mut ctx = context();
        ctx.report_error(CommandError::ExitRequested).unwrap();
        assert!(!ctx.running);
    }

    #[test]
    fn shell_errors_wrap_their_sources() {
        let err = CliError::from(LedgerError::not_found("user", "u9"));
        assert!(matches!(err, CliError::Core(LedgerError::NotFound { .. })));
        assert_eq!(err.to_string(), "user not found: u9");

        let err = CliError::from(io::Error::other("stdin closed"));
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.to_string(), "stdin closed");
    }
}
