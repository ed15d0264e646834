use super::{LookupError, RecordStore};
use async_trait::async_trait;
use certforge_types::{CertificateRecord, DisplayId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Records held in memory, keyed by canonical display ID.
///
/// Every record must carry a well-formed display ID and IDs are unique
/// ignoring case, mirroring the hosted table's constraint.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, CertificateRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = CertificateRecord>,
    {
        let store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Parses a JSON array of store rows.
    pub fn from_json(json: &str) -> Result<Self, LookupError> {
        let records: Vec<CertificateRecord> =
            serde_json::from_str(json).map_err(|e| LookupError::InvalidSeed(e.to_string()))?;
        Self::with_records(records)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, LookupError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| LookupError::InvalidSeed(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_json(&json)?;
        log::info!("Loaded {} certificates from {}", store.len(), path.display());
        Ok(store)
    }

    /// Adds a record, canonicalising its display ID.
    pub fn insert(&self, mut record: CertificateRecord) -> Result<(), LookupError> {
        let id: DisplayId = record
            .display_id
            .parse()
            .map_err(|e| LookupError::InvalidSeed(format!("{}", e)))?;
        record
            .validate()
            .map_err(|e| LookupError::InvalidSeed(format!("{}: {}", id, e)))?;
        record.display_id = id.to_string();

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(id.as_str()) {
            return Err(LookupError::InvalidSeed(format!(
                "duplicate certificate ID {}",
                id
            )));
        }
        records.insert(id.to_string(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_display_id(
        &self,
        display_id: &str,
    ) -> Result<Option<CertificateRecord>, LookupError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(display_id).cloned())
    }

    fn name(&self) -> &'static str {
        "InMemoryRecordStore"
    }
}
