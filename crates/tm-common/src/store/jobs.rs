use std::path::PathBuf;

use crate::schema::JobRecord;

use super::json::{load_array, save_array};
use super::{next_numeric_id, StoreError};

/// First vaga id when the collection is empty.
pub const JOB_ID_FLOOR: i64 = 5000;

/// Persisted collection of vagas.
pub struct JobStore {
    path: Option<PathBuf>,
    records: Vec<JobRecord>,
}

impl JobStore {
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

    pub fn iter(&self) -> impl Iterator<Item = &JobRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.records.iter().find(|r| r.id.as_deref() == Some(id))
    }

    /// Assign the next id, persist, and return the id. The in-memory list is
    /// rolled back if the file write fails so memory never runs ahead of
    /// disk.
    pub fn append(&mut self, mut record: JobRecord) -> Result<String, StoreError> {
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
        next_numeric_id(self.records.iter().map(|r| r.id.as_deref()), JOB_ID_FLOOR)
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => save_array(path, &self.records),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> JobRecord {
        JobRecord {
            title: Some(title.into()),
            ..JobRecord::default()
        }
    }

    #[test]
    fn first_id_is_the_floor_then_increments() {
        let mut store = JobStore::memory();
        assert_eq!(store.append(job("a")).unwrap(), "5000");
        assert_eq!(store.append(job("b")).unwrap(), "5001");
        assert_eq!(store.get("5001").unwrap().title.as_deref(), Some("b"));
    }

    #[test]
    fn next_id_ignores_non_numeric_ids() {
        let mut store = JobStore::memory();
        store.records.push(JobRecord {
            id: Some("vaga_anon_3".into()),
            ..job("legacy")
        });
        assert_eq!(store.append(job("novo")).unwrap(), "5000");
    }

    #[test]
    fn append_persists_and_reload_sees_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vagas.json");

        let mut store = JobStore::open(&path).unwrap();
        let id = store.append(job("Dev Rust")).unwrap();

        let reloaded = JobStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get(&id).unwrap().title.as_deref(), Some("Dev Rust"));
    }

    #[test]
    fn malformed_file_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vagas.json");
        std::fs::write(&path, b"{\"oops\"").unwrap();

        assert!(matches!(
            JobStore::open(&path),
            Err(StoreError::Malformed { .. })
        ));
    }
}
