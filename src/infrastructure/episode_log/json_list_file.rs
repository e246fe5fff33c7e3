use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::RecordSink;

/// Record log persisted as one JSON array
///
/// The file is rewritten in full after every append, through a sibling
/// temporary file that is renamed over the target, so a reader never sees a
/// half-written list.
#[derive(Debug)]
pub struct JsonListFile<R> {
    path: PathBuf,
    records: Vec<R>,
}

impl<R: Serialize> JsonListFile<R> {
    /// Start an empty log at `path`, creating parent directories. Nothing is
    /// written until the first append.
    pub fn create(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::Persistence(format!("{}: {e}", parent.display()))
            })?;
        }
        Ok(Self {
            path,
            records: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    fn flush(&self) -> DomainResult<()> {
        let body = serde_json::to_vec_pretty(&self.records)?;
        let tmp = self.path.with_extension("json.tmp");

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| DomainError::Persistence(format!("{}: {e}", self.path.display())))
    }
}

impl<R: Serialize + Send> RecordSink<R> for JsonListFile<R> {
    fn append(&mut self, record: R) -> DomainResult<()> {
        self.records.push(record);
        self.flush()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[test]
    fn test_rewrites_whole_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/log.json");
        let mut log = JsonListFile::create(&path).unwrap();
        assert!(!path.exists());

        log.append(json!({"action": "ETWT"})).unwrap();
        log.append(json!({"action": "NTST"})).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, json!([{"action": "ETWT"}, {"action": "NTST"}]));
        assert_eq!(log.len(), 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_unwritable_target_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the file makes the rename fail
        let path = dir.path().join("taken.json");
        fs::create_dir(&path).unwrap();

        let mut log = JsonListFile::create(&path).unwrap();
        let err = log.append(1_u32).unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }
}
