//! `window.localStorage` backend.
//! Persistent across page reloads, synchronous, string values only.

use stillpoint_core::ports::StoragePort;
use stillpoint_types::{MeditationError, Result};
use wasm_bindgen::JsValue;

const PROBE_KEY: &str = "__stillpoint_probe__";

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open `localStorage` and make sure it accepts writes.
    ///
    /// Some private-browsing modes expose the object but throw on `setItem`.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| MeditationError::Storage("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| MeditationError::Storage("localStorage not available".to_string()))?;

        storage.set_item(PROBE_KEY, "1").map_err(js_err)?;
        storage.remove_item(PROBE_KEY).map_err(js_err)?;

        Ok(Self { storage })
    }
}

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}

fn js_err(e: JsValue) -> MeditationError {
    MeditationError::Storage(format!("{:?}", e))
}
