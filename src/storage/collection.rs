use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::Identifiable;

use super::{KeyValueStore, Result};

/// A JSON array of entities persisted under a single store key.
///
/// Every mutation loads the whole array, changes it and writes it back.
pub struct Collection<'a, T> {
    store: &'a dyn KeyValueStore,
    key: &'static str,
    marker: PhantomData<T>,
}

impl<'a, T> Collection<'a, T>
where
    T: Identifiable + Serialize + DeserializeOwned,
{
    pub fn new(store: &'a dyn KeyValueStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Loads every entity. Missing, unreadable or malformed data reads as empty.
    pub fn list(&self) -> Vec<T> {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "store unavailable, using empty collection");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "stored collection is malformed, using empty collection");
                Vec::new()
            }
        }
    }

    /// Replaces the entity with the same id in place, or appends it.
    pub fn upsert(&self, entity: T) -> Result<()> {
        let mut items = self.list();
        match items.iter().position(|item| item.id() == entity.id()) {
            Some(index) => items[index] = entity,
            None => items.push(entity),
        }
        self.write(&items)
    }

    /// Removes every entity with the given id. Unknown ids leave the data as is.
    pub fn remove(&self, id: &str) -> Result<usize> {
        let mut items = self.list();
        let before = items.len();
        items.retain(|item| item.id() != id);
        self.write(&items)?;
        Ok(before - items.len())
    }

    /// Writes `items` as the complete collection in one store call.
    pub fn replace_all(&self, items: &[T]) -> Result<()> {
        self.write(items)
    }

    fn write(&self, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(self.key, &json)?;
        tracing::debug!(key = self.key, count = items.len(), "collection saved");
        Ok(())
    }
}
