use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::StoreError;

/// Load a JSON array of records. A missing file is a fresh deployment and
/// yields an empty collection; a malformed file is a hard error.
pub(crate) fn load_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "record file absent; starting empty");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|err| StoreError::Malformed {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Replace the collection file atomically: serialize everything, write to a
/// sibling temp file, rename over the target.
pub(crate) fn save_array<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let bytes = serde_json::to_vec_pretty(records).map_err(|err| StoreError::Malformed {
        path: path.to_path_buf(),
        source: err,
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}
