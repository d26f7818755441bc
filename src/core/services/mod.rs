pub mod category_service;
pub mod note_service;
pub mod settings_service;
pub mod stats_service;

pub use category_service::CategoryService;
pub use note_service::NoteService;
pub use settings_service::{ImportOutcome, SettingsExport, SettingsService};
pub use stats_service::{CategoryTotal, MonthlyStats, StatsService, TimeRangeGroups};

use crate::core::errors::MoneyNoteError;

pub type ServiceResult<T> = Result<T, MoneyNoteError>;

#[cfg(test)]
mod tests;
