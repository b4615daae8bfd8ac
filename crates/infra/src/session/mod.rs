//! Session store backends
//!
//! Selected by [`SessionConfig::backend`](synvia_domain::SessionConfig):
//! `memory`, `file` or `keychain`.

pub mod file_store;
pub mod keychain_store;

use std::sync::Arc;

pub use file_store::FileSessionStore;
pub use keychain_store::KeychainSessionStore;
use synvia_common::auth::{MemorySessionStore, SessionStore};
use synvia_domain::{SessionBackend, SessionConfig};
use tracing::info;

/// Open the session store configured in `config`
pub fn open_store(config: &SessionConfig) -> Arc<dyn SessionStore> {
    info!(backend = %config.backend, "opening session store");
    match config.backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::File => Arc::new(FileSessionStore::new(&config.path)),
        SessionBackend::Keychain => Arc::new(KeychainSessionStore::new(&config.keychain_service)),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn file_backend_writes_to_configured_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessao.json");
        let config = SessionConfig {
            backend: SessionBackend::File,
            path: path.display().to_string(),
            ..SessionConfig::default()
        };

        let store = open_store(&config);
        store.set("accessToken", "T1").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn memory_backend_starts_empty() {
        let config = SessionConfig { backend: SessionBackend::Memory, ..SessionConfig::default() };
        assert_eq!(open_store(&config).get("user").unwrap(), None);
    }
}
