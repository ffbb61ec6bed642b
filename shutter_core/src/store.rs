//! File-backed `TargetStore`: one JSON record per shutter id.
//!
//! Layout: `<dir>/<sanitized id>.json` containing
//! `{"id": "...", "target_position": 42.0}`. Records are replaced
//! atomically on every save.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use shutter_traits::{BoxError, TargetStore};

use crate::util::{sanitize_id, write_atomic};

#[derive(Debug, Serialize, Deserialize)]
struct PersistedTarget {
    id: String,
    target_position: f64,
}

#[derive(Debug, Clone)]
pub struct FileTargetStore {
    dir: PathBuf,
}

impl FileTargetStore {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> eyre::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("create storage dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_id(id)))
    }
}

impl TargetStore for FileTargetStore {
    fn load(&self, id: &str) -> Result<Option<f64>, BoxError> {
        let path = self.record_path(id);
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("read {}: {e}", path.display()).into()),
        };
        let rec: PersistedTarget = serde_json::from_str(&text)
            .map_err(|e| format!("parse {}: {e}", path.display()))?;
        Ok(Some(rec.target_position))
    }

    fn save(&self, id: &str, target: f64) -> Result<(), BoxError> {
        let path = self.record_path(id);
        let rec = PersistedTarget {
            id: id.to_string(),
            target_position: target,
        };
        let body = serde_json::to_vec_pretty(&rec)?;
        write_atomic(&path, &body).map_err(|e| format!("write {}: {e}", path.display()))?;
        Ok(())
    }
}
