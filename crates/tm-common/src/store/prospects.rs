use std::path::PathBuf;

use crate::schema::ProspectRecord;

use super::json::{load_array, save_array};
use super::StoreError;

/// Append-only log of candidate-vaga interactions. Rows are never unique:
/// one candidate accumulates a row per process they entered.
pub struct ProspectLog {
    path: Option<PathBuf>,
    records: Vec<ProspectRecord>,
}

impl ProspectLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = load_array(&path)?;
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    pub fn memory() -> Self {
        Self {
            path: None,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full log in append order, the shape the history scorer consumes.
    pub fn all(&self) -> &[ProspectRecord] {
        &self.records
    }

    pub fn append(&mut self, record: ProspectRecord) -> Result<(), StoreError> {
        self.records.push(record);
        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => save_array(path, &self.records),
            None => Ok(()),
        }
    }
}
