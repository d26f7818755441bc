//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::{
        errors::MoneyNoteError,
        format::format_amount,
        services::{note_service::validate_amount, CategoryService},
        time::{Clock, SystemClock, YearMonth},
        utils::PathResolver,
    },
    domain::CustomCategory,
    storage::{JsonFileStore, KeyValueStore},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] MoneyNoteError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {}", usage))
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] MoneyNoteError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Io(inner) => CliError::Io(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl ShellContext {
    /// Opens the store and config under `$MONEY_NOTE_HOME` (or `~/.money_note`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base_dir = PathResolver::base_dir();
        let store = JsonFileStore::new(PathResolver::store_dir_in(&base_dir))
            .map_err(MoneyNoteError::from)?;
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        tracing::debug!(base = %base_dir.display(), "opening shell");
        Self::with_parts(
            mode,
            Box::new(store),
            Box::new(SystemClock),
            config_manager,
            base_dir,
        )
    }

    pub fn with_parts(
        mode: CliMode,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        config_manager: ConfigManager,
        base_dir: PathBuf,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        cli_io::apply_config(&config, mode);

        let today = clock.today();
        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            store,
            clock,
            config_manager,
            config,
            base_dir,
            selected_date: today,
            selected_month: YearMonth::of(today),
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        format!("money-note [{}]> ", self.selected_date)
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            tracing::debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes one input line and runs it.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(MoneyNoteError::CategoryNotFound(id)) => {
                self.print_error(&format!("Category not found: {}", id));
                cli_io::print_hint("Run `category list` to see category ids.");
                Ok(())
            }
            CommandError::Core(MoneyNoteError::NoteNotFound(id)) => {
                self.print_error(&format!("Note not found: {}", id));
                cli_io::print_hint("Run `day` to see the ids of the selected day's notes.");
                Ok(())
            }
            CommandError::Core(MoneyNoteError::InvalidSettings(reason)) => {
                self.print_error("Invalid settings file");
                cli_io::print_info(format!("  {}", reason));
                Ok(())
            }
            CommandError::Dialoguer(dialoguer::Error::IO(err))
                if err.kind() == io::ErrorKind::Interrupted =>
            {
                cli_io::print_info("Cancelled.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        cli_io::apply_config(&self.config, self.mode);
        Ok(())
    }

    pub(crate) fn categories(&self) -> Vec<CustomCategory> {
        CategoryService::list(self.store())
    }

    /// Finds a category by id, or by case-insensitive name when no id matches.
    pub(crate) fn resolve_category(&self, needle: &str) -> Result<CustomCategory, CommandError> {
        let categories = self.categories();
        categories
            .iter()
            .find(|category| category.id == needle)
            .or_else(|| {
                categories
                    .iter()
                    .find(|category| category.name.eq_ignore_ascii_case(needle.trim()))
            })
            .cloned()
            .ok_or_else(|| MoneyNoteError::CategoryNotFound(needle.to_string()).into())
    }

    /// Amount in the configured currency and locale.
    pub(crate) fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.config.currency, &self.config.locale)
    }
}

/// Parses a user-entered amount; `,` and `_` digit separators are ignored.
pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let amount: f64 = cleaned.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a valid amount", input))
    })?;
    validate_amount(amount)?;
    Ok(amount)
}
