use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use viewsim_core::config::StorageKey;
use viewsim_core::error::Result;
use viewsim_core::snapshot::{self, ViewSnapshot};
use viewsim_core::sync::SnapshotStore;

/// Snapshot store backed by a JSON file holding one record per storage key.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    saves: usize,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            saves: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn read_records(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, key: &StorageKey) -> Result<Option<ViewSnapshot>> {
        let mut records = self.read_records()?;
        records
            .remove(&key.0)
            .map(snapshot::decode_value)
            .transpose()
    }

    fn save(&mut self, key: &StorageKey, snapshot: &ViewSnapshot) -> Result<()> {
        let mut records = self.read_records()?;
        records.insert(key.0.clone(), serde_json::to_value(snapshot)?);
        fs::write(&self.path, serde_json::to_string_pretty(&records)?)?;
        self.saves += 1;
        debug!(path = %self.path.display(), %key, "view state written");
        Ok(())
    }
}
