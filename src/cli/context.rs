//! Shell state, dispatch and error reporting.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

use feebook_config::{resolve_base_dir, Config, ConfigError, ConfigManager};
use feebook_core::{
    Clock, CoreError, CurrencyFormatter, DateFormatter, DisplayFormatter, LedgerStore, SystemClock,
};
use feebook_storage_json::JsonLedgerStorage;

use crate::cli::args::{parse_date, ParsedArgs};
use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::output::{self, OutputPreferences};
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
    /// A single command passed on the process command line.
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub(crate) registry: CommandRegistry,
    pub(crate) store: LedgerStore,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) formatter: DisplayFormatter,
    clock: Box<dyn Clock>,
    base_dir: PathBuf,
}

impl ShellContext {
    /// Opens the ledger under the resolved base directory and applies first-run seeding.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = resolve_base_dir();
        let config_manager = ConfigManager::with_base_dir(&base_dir)?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let ledger_dir = config.resolve_ledger_dir(&base_dir);
        debug!(base = %base_dir.display(), ledger = %ledger_dir.display(), "resolved data directories");
        let storage = JsonLedgerStorage::new(ledger_dir)?;
        let mut store = LedgerStore::open(Box::new(storage))?;
        store.initialize(config.seed_sample_data)?;

        Ok(Self {
            mode,
            running: true,
            registry: CommandRegistry::new(commands::all_definitions()),
            formatter: DisplayFormatter::new(config.date_format.clone()),
            store,
            config,
            config_manager,
            clock: Box::new(SystemClock),
            base_dir,
        })
    }

    pub fn prompt(&self) -> String {
        "feebook> ".into()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    /// `--as-of` when given, otherwise today's date.
    pub(crate) fn as_of(&self, parsed: &ParsedArgs<'_>) -> Result<NaiveDate, CommandError> {
        match parsed.value("as-of") {
            Some(raw) => parse_date(raw),
            None => Ok(self.clock.today()),
        }
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        self.formatter
            .format_amount(amount, &self.config.currency_symbol)
    }

    pub(crate) fn date(&self, date: NaiveDate) -> String {
        self.formatter.format_date(date)
    }

    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        self.formatter = DisplayFormatter::new(self.config.date_format.clone());
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            Err(CommandError::UnknownCommand(raw.to_string()))
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::hint(format!("Did you mean `{}`?", best));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::UnknownCommand(raw) => self.suggest_command(&raw),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::StudentNotFound(id)) => {
                output::error(format!("Student {id} not found."));
                output::hint("Use `students` to list student ids.");
            }
            other => output::error(other),
        }
    }
}
