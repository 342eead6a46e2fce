//! File storage

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::{StorageBackend, StorageError};

/// Stores each key as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file store rooted at `base_path`. The directory is created on first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && !key.contains("..")
            && !key.contains(['/', '\\', '\0']);

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.base_path)?;

        // Write then rename so a crash never leaves a half-written cart behind.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path).inspect_err(|_err| {
            _ = fs::remove_file(&staging);
        })?;

        Ok(())
    }
}
