use serde::{Deserialize, Serialize};

use crate::data::{MapStore, Record};
use crate::Result;

/// The raw persisted records of a store, as other systems would read them.
///
/// Inherited fields appear with their empty sentinel since inherited values
/// are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSnapshot {
    pub records: Vec<Record>,
}

impl JsonSnapshot {
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl MapStore {
    /// Records ordered by id, so the output is stable across runs.
    pub fn take_json_snapshot(&self) -> JsonSnapshot {
        let mut records: Vec<Record> = self.records().cloned().collect();
        records.sort_by_key(|record| record.entity_id);
        JsonSnapshot { records }
    }

    /// Replaces all records with the snapshot's. Schemas must already be
    /// registered; on any invalid record the store keeps its current contents.
    pub fn restore_json_snapshot(&mut self, snapshot: &JsonSnapshot) -> Result<()> {
        self.replace_records(&snapshot.records)?;

        log::debug!("Restored {} record(s) from snapshot", snapshot.records.len());
        Ok(())
    }
}
