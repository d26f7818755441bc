use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::MoneyNoteError;
use crate::core::time::Clock;
use crate::core::utils::ensure_dir;
use crate::domain::note::DATE_FORMAT;
use crate::domain::CustomCategory;
use crate::storage::KeyValueStore;

use super::{CategoryService, ServiceResult};

const EXPORT_FILE_PREFIX: &str = "money-note-settings";

/// Exported settings document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsExport {
    pub categories: Vec<CustomCategory>,
    #[serde(rename = "exportDate")]
    pub export_date: String,
}

/// Result of applying a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The category collection was replaced by this many entries.
    Replaced(usize),
    /// The document carried no `categories` array; nothing changed.
    NoCategories,
}

pub struct SettingsService;

impl SettingsService {
    pub fn export(store: &dyn KeyValueStore, clock: &dyn Clock) -> SettingsExport {
        SettingsExport {
            categories: CategoryService::list(store),
            export_date: clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// `money-note-settings-<YYYY-MM-DD>.json`
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("{}-{}.json", EXPORT_FILE_PREFIX, date.format(DATE_FORMAT))
    }

    /// Writes the settings document into `dir` and returns its path.
    pub fn export_to_dir(
        store: &dyn KeyValueStore,
        clock: &dyn Clock,
        dir: &Path,
    ) -> ServiceResult<PathBuf> {
        ensure_dir(dir)?;
        let export = Self::export(store, clock);
        let path = dir.join(Self::export_file_name(clock.now().date_naive()));
        let json = serde_json::to_string_pretty(&export)?;
        fs::write(&path, json)?;
        tracing::info!(path = %path.display(), categories = export.categories.len(), "settings exported");
        Ok(path)
    }

    /// Validates the whole document, then replaces the categories in one write.
    ///
    /// Notes are never touched, so references to removed categories dangle.
    pub fn import_str(store: &dyn KeyValueStore, raw: &str) -> ServiceResult<ImportOutcome> {
        let document: Value = serde_json::from_str(raw)
            .map_err(|err| MoneyNoteError::InvalidSettings(err.to_string()))?;
        let entries = match document.get("categories") {
            Some(Value::Array(entries)) => entries,
            _ => return Ok(ImportOutcome::NoCategories),
        };

        let categories = parse_categories(entries)?;
        CategoryService::replace_all(store, &categories)?;
        tracing::info!(count = categories.len(), "settings imported");
        Ok(ImportOutcome::Replaced(categories.len()))
    }

    pub fn import_file(store: &dyn KeyValueStore, path: &Path) -> ServiceResult<ImportOutcome> {
        let raw = fs::read_to_string(path).map_err(|err| {
            MoneyNoteError::InvalidSettings(format!("cannot read `{}`: {}", path.display(), err))
        })?;
        Self::import_str(store, &raw)
    }
}

fn parse_categories(entries: &[Value]) -> ServiceResult<Vec<CustomCategory>> {
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mut category: CustomCategory =
            serde_json::from_value(entry.clone()).map_err(|err| {
                MoneyNoteError::InvalidSettings(format!("category #{}: {}", index + 1, err))
            })?;
        // Stored under the canonical name; unknown icons become the default, as on load.
        category.icon = category.icon().as_str().to_string();
        CategoryService::validate(&category).map_err(|err| {
            MoneyNoteError::InvalidSettings(format!("category #{}: {}", index + 1, err))
        })?;
        if !seen.insert(category.id.clone()) {
            return Err(MoneyNoteError::InvalidSettings(format!(
                "duplicate category id `{}`",
                category.id
            )));
        }
        categories.push(category);
    }
    Ok(categories)
}
