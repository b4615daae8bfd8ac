//! JSON file session store
//!
//! All keys live in one JSON object. Writes go to a sibling temp file that is
//! renamed over the original, so a crash never leaves a half-written session.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use synvia_common::auth::{SessionStore, StoreError};
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// [`SessionStore`] persisted to a JSON file
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => {
                return Err(StoreError::Unavailable(format!(
                    "cannot read {}: {err}",
                    self.path.display()
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt {
            key: self.path.display().to_string(),
            reason: err.to_string(),
        })
    }

    /// Current entries for a write, and whether the file on disk was corrupt
    /// and therefore must be rewritten even if nothing changes
    fn load_for_write(&self) -> Result<(Entries, bool), StoreError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Corrupt { reason, .. }) => {
                warn!(path = %self.path.display(), %reason, "session file is corrupt; starting over");
                Ok((Entries::new(), true))
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| write_error(parent, &err))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|err| StoreError::Write(err.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|err| write_error(&tmp, &err))?;
        fs::rename(&tmp, &self.path).map_err(|err| write_error(&self.path, &err))?;

        debug!(path = %self.path.display(), keys = entries.len(), "session file written");
        Ok(())
    }
}

fn write_error(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::Write(format!("cannot write {}: {err}", path.display()))
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let (mut entries, corrupt) = self.load_for_write()?;
        if entries.remove(key).is_none() && !corrupt {
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.get("accessToken").unwrap(), None);
        store.remove("accessToken").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn values_survive_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).set("refreshToken", "R1").unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get("refreshToken").unwrap().as_deref(), Some("R1"));
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[test]
    fn remove_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.set("accessToken", "T1").unwrap();
        store.set("user", r#"{"nome":"Ana"}"#).unwrap();

        store.remove("accessToken").unwrap();

        assert_eq!(store.get("accessToken").unwrap(), None);
        assert_eq!(store.get("user").unwrap().as_deref(), Some(r#"{"nome":"Ana"}"#));
    }

    #[test]
    fn corrupt_file_is_reported_then_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        let store = FileSessionStore::new(&path);

        assert!(matches!(store.get("accessToken"), Err(StoreError::Corrupt { .. })));

        store.set("accessToken", "T2").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("T2"));
    }

    #[test]
    fn removing_from_corrupt_file_rewrites_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        let store = FileSessionStore::new(&path);

        store.remove("accessToken").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
        assert_eq!(store.get("accessToken").unwrap(), None);
    }
}
