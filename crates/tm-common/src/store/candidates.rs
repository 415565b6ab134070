use std::path::PathBuf;

use crate::schema::CandidateRecord;

use super::json::{load_array, save_array};
use super::{next_numeric_id, StoreError};

/// First candidate id when the collection is empty.
pub const CANDIDATE_ID_FLOOR: i64 = 10000;

/// Persisted collection of candidate profiles.
pub struct CandidateStore {
    path: Option<PathBuf>,
    records: Vec<CandidateRecord>,
}

impl CandidateStore {
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

    pub fn iter(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CandidateRecord> {
        self.records.iter().find(|r| r.id.as_deref() == Some(id))
    }

    pub fn append(&mut self, mut record: CandidateRecord) -> Result<String, StoreError> {
        let id = self.next_id().to_string();
        record.id = Some(id.clone());
        self.records.push(record);

        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(err);
        }
        Ok(id)
    }

    fn next_id(&self) -> i64 {
        next_numeric_id(
            self.records.iter().map(|r| r.id.as_deref()),
            CANDIDATE_ID_FLOOR,
        )
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => save_array(path, &self.records),
            None => Ok(()),
        }
    }
}
