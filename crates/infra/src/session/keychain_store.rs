//! Platform keychain session store
//!
//! One keychain entry per session key under a configurable service name.
//! Platform backends are selected by the `keychain-native` feature; without
//! it `keyring` falls back to its in-process mock store.

use std::collections::HashMap;

use keyring::Entry;
use parking_lot::Mutex;
use synvia_common::auth::{SessionStore, StoreError};
use synvia_domain::SynviaError;
use tracing::debug;

use crate::errors::InfraError;

/// [`SessionStore`] backed by the platform keychain
pub struct KeychainSessionStore {
    service: String,
    entries: Mutex<HashMap<String, Entry>>,
}

impl KeychainSessionStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into(), entries: Mutex::new(HashMap::new()) }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn with_entry<T>(
        &self,
        key: &str,
        op: impl FnOnce(&Entry) -> Result<T, keyring::Error>,
    ) -> Result<T, keyring::Error> {
        let mut entries = self.entries.lock();
        let entry = match entries.entry(key.to_string()) {
            std::collections::hash_map::Entry::Occupied(slot) => slot.into_mut(),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(Entry::new(&self.service, key)?)
            }
        };
        op(entry)
    }
}

impl std::fmt::Debug for KeychainSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainSessionStore").field("service", &self.service).finish_non_exhaustive()
    }
}

fn describe(err: keyring::Error) -> String {
    SynviaError::from(InfraError::from(err)).to_string()
}

impl SessionStore for KeychainSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.with_entry(key, Entry::get_password) {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(StoreError::Unavailable(describe(err))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        debug!(service = %self.service, key, "storing session value in keychain");
        self.with_entry(key, |entry| entry.set_password(value))
            .map_err(|err| StoreError::Write(describe(err)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self.with_entry(key, Entry::delete_credential) {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(StoreError::Write(describe(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_store() -> KeychainSessionStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeychainSessionStore::new("Synvia.session.test")
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let store = mock_store();

        assert_eq!(store.get("accessToken").unwrap(), None);
        store.set("accessToken", "T1").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("T1"));

        store.remove("accessToken").unwrap();
        store.remove("accessToken").unwrap();
        assert_eq!(store.get("accessToken").unwrap(), None);
    }

    #[test]
    fn debug_hides_entries() {
        let store = mock_store();
        store.set("refreshToken", "R1").unwrap();
        let printed = format!("{store:?}");
        assert!(printed.contains("Synvia.session.test"));
        assert!(!printed.contains("R1"));
    }
}
