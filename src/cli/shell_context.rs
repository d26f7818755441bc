use std::path::PathBuf;

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::time::{Clock, YearMonth},
    storage::KeyValueStore,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command for the lifetime of a shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: Box<dyn KeyValueStore>,
    pub clock: Box<dyn Clock>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub base_dir: PathBuf,
    /// Day shown by `day` and used as the date of new notes.
    pub selected_date: NaiveDate,
    /// Month shown by `stats`.
    pub selected_month: YearMonth,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, day: {}, month: {}, last_command: {:?} }}",
            self.running, self.selected_date, self.selected_month, self.last_command
        )
    }
}
