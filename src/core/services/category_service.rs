use crate::core::errors::MoneyNoteError;
use crate::core::time::Clock;
use crate::domain::category::is_hex_color;
use crate::domain::common::time_based_id;
use crate::domain::{CategoryIcon, CategoryLabel, CustomCategory};
use crate::storage::{Collection, KeyValueStore, CATEGORIES_KEY};

use super::ServiceResult;

pub struct CategoryService;

impl CategoryService {
    fn collection(store: &dyn KeyValueStore) -> Collection<'_, CustomCategory> {
        Collection::new(store, CATEGORIES_KEY)
    }

    pub fn list(store: &dyn KeyValueStore) -> Vec<CustomCategory> {
        Self::collection(store).list()
    }

    pub fn find(store: &dyn KeyValueStore, id: &str) -> Option<CustomCategory> {
        Self::list(store)
            .into_iter()
            .find(|category| category.id == id)
    }

    /// Inserts the category, or replaces the stored category with the same id.
    pub fn save(store: &dyn KeyValueStore, category: CustomCategory) -> ServiceResult<()> {
        Self::validate(&category)?;
        tracing::debug!(id = %category.id, name = %category.name, "saving category");
        Self::collection(store).upsert(category)?;
        Ok(())
    }

    /// Removes the category. Notes referencing it are left untouched.
    pub fn delete(store: &dyn KeyValueStore, id: &str) -> ServiceResult<()> {
        let removed = Self::collection(store).remove(id)?;
        tracing::debug!(id, removed, "deleted category");
        Ok(())
    }

    pub fn create(
        store: &dyn KeyValueStore,
        clock: &dyn Clock,
        name: &str,
        color: &str,
        icon: CategoryIcon,
    ) -> ServiceResult<CustomCategory> {
        let existing = Self::list(store);
        let id = time_based_id(clock.now().timestamp_millis(), |candidate| {
            existing.iter().any(|category| category.id == candidate)
        });
        let category = CustomCategory::new(id, name.trim(), color.trim(), icon);
        Self::save(store, category.clone())?;
        tracing::info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn edit(
        store: &dyn KeyValueStore,
        id: &str,
        name: &str,
        color: &str,
        icon: CategoryIcon,
    ) -> ServiceResult<CustomCategory> {
        if Self::find(store, id).is_none() {
            return Err(MoneyNoteError::CategoryNotFound(id.to_string()));
        }
        let category = CustomCategory::new(id, name.trim(), color.trim(), icon);
        Self::save(store, category.clone())?;
        Ok(category)
    }

    /// Writes `categories` as the whole collection in a single store call.
    pub fn replace_all(
        store: &dyn KeyValueStore,
        categories: &[CustomCategory],
    ) -> ServiceResult<()> {
        for category in categories {
            Self::validate(category)?;
        }
        Self::collection(store).replace_all(categories)?;
        Ok(())
    }

    /// Display attributes for a category id, with fallbacks when it no longer exists.
    pub fn label(categories: &[CustomCategory], id: &str) -> CategoryLabel {
        CategoryLabel::resolve(categories, id)
    }

    pub(crate) fn validate(category: &CustomCategory) -> ServiceResult<()> {
        if category.id.trim().is_empty() {
            return Err(MoneyNoteError::InvalidInput(
                "category id must not be empty".into(),
            ));
        }
        if category.name.trim().is_empty() {
            return Err(MoneyNoteError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        if !is_hex_color(&category.color) {
            return Err(MoneyNoteError::InvalidInput(format!(
                "`{}` is not a hex color such as #ff8800",
                category.color
            )));
        }
        category
            .icon
            .parse::<CategoryIcon>()
            .map_err(MoneyNoteError::InvalidInput)?;
        Ok(())
    }
}
