pub mod collection;
pub mod file_store;
pub mod memory;

use thiserror::Error;

/// Key holding the JSON array of money notes.
pub const MONEY_NOTES_KEY: &str = "money-notes";
/// Key holding the JSON array of custom categories.
pub const CATEGORIES_KEY: &str = "custom-categories";

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string key-value capability the persistence layer depends on.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub use collection::Collection;
pub use file_store::JsonFileStore;
pub use memory::MemoryStore;
