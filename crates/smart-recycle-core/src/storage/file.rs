use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;

use super::KeyValueStore;

/// Slots persisted as `<dir>/<key>.json`, one file per key.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        debug!(slot = key, bytes = contents.len(), "Read slot");
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.slot_path(key), value)?;
        debug!(slot = key, bytes = value.len(), "Wrote slot");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
            debug!(slot = key, "Removed slot");
        }
        Ok(())
    }
}
