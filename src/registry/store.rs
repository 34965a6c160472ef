//! Committed records, in insertion order

use crate::models::{Record, RecordId};

use super::RegistryError;

/// A committed record together with its identity
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub record: Record,
}

/// Ordered list of committed records.
///
/// Position is only a display concern; every mutation addresses records by id.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    entries: Vec<StoredRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredRecord> {
        self.entries.iter()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.record)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Id of the record currently displayed at `position`
    pub fn id_at(&self, position: usize) -> Option<RecordId> {
        self.entries.get(position).map(|e| e.id)
    }

    /// Append a record under a freshly generated id
    pub fn insert(&mut self, record: Record) -> RecordId {
        let id = RecordId::new();
        self.entries.push(StoredRecord { id, record });
        id
    }

    /// Overwrite a record in place
    pub fn replace(&mut self, id: RecordId, record: Record) -> Result<(), RegistryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RegistryError::RecordNotFound(id))?;
        entry.record = record;
        Ok(())
    }

    /// Remove a record, shifting later ones down by one
    pub fn remove(&mut self, id: RecordId) -> Result<Record, RegistryError> {
        let position = self.position(id).ok_or(RegistryError::RecordNotFound(id))?;
        Ok(self.entries.remove(position).record)
    }
}
