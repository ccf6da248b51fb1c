//! Pick the storage backend named by the config.
//!
//! Priority for `Auto`: localStorage → Memory (fallback)

use std::rc::Rc;
use stillpoint_core::ports::StoragePort;
use stillpoint_types::config::StorageBackendType;
use super::{LocalStorage, MemoryStorage};

/// Open the requested backend, degrading to memory when the browser refuses.
/// Returns a trait object so callers are backend-agnostic.
pub fn open_storage(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    if *backend == StorageBackendType::Memory {
        log::info!("Storage backend: memory (configured)");
        return Rc::new(MemoryStorage::new());
    }

    match LocalStorage::open() {
        Ok(local) => {
            log::info!("Storage backend: localStorage");
            Rc::new(local)
        }
        Err(e) => {
            log::warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}
