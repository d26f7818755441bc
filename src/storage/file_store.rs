use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::core::utils::write_atomic;

use super::{KeyValueStore, Result};

const DOCUMENT_EXTENSION: &str = "json";

/// Directory-backed store keeping one JSON document per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), DOCUMENT_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.document_path(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.document_path(key);
        write_atomic(&path, value)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "store document written");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "store".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::tmp_path;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(temp.path().join("store")).expect("file store");
        (store, temp)
    }

    #[test]
    fn unwritten_key_reads_as_none() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.get("money-notes").expect("read").is_none());
    }

    #[test]
    fn set_then_get_returns_document() {
        let (store, _guard) = store_with_temp_dir();
        store.set("custom-categories", "[]").expect("write");
        assert_eq!(
            store.get("custom-categories").expect("read").as_deref(),
            Some("[]")
        );
        let path = store.document_path("custom-categories");
        assert!(path.ends_with("custom-categories.json"));
        assert!(!tmp_path(&path).exists(), "temporary file should be renamed");
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let (store, _guard) = store_with_temp_dir();
        let path = store.document_path("../Money Notes");
        assert_eq!(path.parent(), Some(store.root()));
        assert!(path.ends_with("___money_notes.json"));
    }
}
