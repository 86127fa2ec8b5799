use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable load/save of single JSON records.
///
/// Saves go through a temp file in the same directory followed by a rename,
/// so a reader (or a crash) never observes a half-written record. There is
/// no locking: concurrent writers resolve as last-write-wins.
pub struct RecordStore;

impl RecordStore {
    /// Load and parse a record. A missing file is `PathNotFound`; content
    /// that does not parse is `CorruptDatabase`.
    pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| Error::CorruptDatabase {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Like `load`, but a missing file is `Ok(None)`.
    pub fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match Self::load(path) {
            Ok(record) => Ok(Some(record)),
            Err(Error::PathNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn save<T: Serialize>(path: &Path, record: &T) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::PathNotFound(path.to_path_buf()))?;
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record
            .serialize(&mut ser)
            .map_err(|e| Error::io(path, e.into()))?;

        let temp_path = temp_path_for(path);
        let write_result = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&buf)?;
            file.sync_all()?;
            Ok(())
        })();
        if let Err(e) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(&temp_path, e));
        }

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::io(path, e)
        })?;
        debug!("Record written: {}", path.display());
        Ok(())
    }

    pub fn remove(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Record already gone: {}", path.display());
                Ok(())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

/// `CharA.json` → `CharA.json.tmp.<pid>`
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.tmp.{}", file_name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/sample.json");
        let sample = Sample {
            name: "CharA".into(),
            count: 3,
        };
        RecordStore::save(&path, &sample).unwrap();
        let loaded: Sample = RecordStore::load(&path).unwrap();
        assert_eq!(loaded, sample);

        // no temp file left behind
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordStore::load::<Sample>(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
        assert!(RecordStore::load_optional::<Sample>(&dir.path().join("nope.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unparsable_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ \"name\": \"CharA\", ").unwrap();
        let err = RecordStore::load::<Sample>(&path).unwrap_err();
        assert!(matches!(err, Error::CorruptDatabase { .. }));
    }

    #[test]
    fn test_save_overwrites_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        RecordStore::save(&path, &Sample { name: "a-much-longer-name".into(), count: 1 }).unwrap();
        RecordStore::save(&path, &Sample { name: "b".into(), count: 2 }).unwrap();
        let loaded: Sample = RecordStore::load(&path).unwrap();
        assert_eq!(loaded, Sample { name: "b".into(), count: 2 });
    }
}
