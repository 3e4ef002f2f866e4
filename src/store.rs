//! Key-value persistence for saved programs.

use crate::error::StoreError;
use ahash::AHashMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bytes escaped in file names. `%` is escaped too, so distinct keys never
/// share a file.
const FILE_NAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

/// `"<namespace_prefix>.<model_id>"`.
pub fn program_key(namespace_prefix: &str, model_id: &str) -> String {
    format!("{}.{}", namespace_prefix, model_id)
}

/// A string key-value store. One writer per key is assumed.
pub trait ProgramStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgramStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Stores each key as `<directory>/<key>.json`, percent-encoding every byte of
/// the key outside `[A-Za-z0-9._-]`.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name = utf8_percent_encode(key, FILE_NAME_ESCAPES);
        self.directory.join(format!("{}.json", file_name))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl ProgramStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory).map_err(|e| io_error(&self.directory, e))?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| io_error(&path, e))?;
        debug!(key, path = %path.display(), "stored program");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_escaped() {
        let store = FileStore::new("/tmp/programs");
        let path = store.path_for("program.alpha/../beta");
        assert_eq!(path, PathBuf::from("/tmp/programs/program.alpha%2F..%2Fbeta.json"));
        assert_eq!(
            store.path_for("program.alpha"),
            PathBuf::from("/tmp/programs/program.alpha.json")
        );
    }

    #[test]
    fn distinct_keys_get_distinct_files() {
        let store = FileStore::new("/tmp/programs");
        let keys = ["program.a/b", "program.a_b", "program.a%2Fb", "program.a b", "program.á"];
        let paths: std::collections::HashSet<PathBuf> =
            keys.iter().map(|key| store.path_for(key)).collect();
        assert_eq!(paths.len(), keys.len());
        assert_eq!(store.path_for("program.a%2Fb"), PathBuf::from("/tmp/programs/program.a%252Fb.json"));
    }

    #[test]
    fn colliding_keys_keep_separate_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set("program.a/b", "slash".to_string()).unwrap();
        store.set("program.a_b", "underscore".to_string()).unwrap();

        assert_eq!(store.get("program.a/b").unwrap().as_deref(), Some("slash"));
        assert_eq!(store.get("program.a_b").unwrap().as_deref(), Some("underscore"));
    }
}
