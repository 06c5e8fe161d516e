//! `localStorage` as a [`KeyValueStore`].

use log::warn;
use voicefx_core::FxError;
use voicefx_site::KeyValueStore;
use web_sys::Storage;

use crate::{host_err, window};

/// Browser local storage. When the browser denies storage (private mode,
/// disabled cookies) every call fails and callers fall back to defaults.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = match window().and_then(|w| {
            w.local_storage()
                .map_err(|e| host_err("localStorage", e))
        }) {
            Ok(storage) => storage,
            Err(e) => {
                warn!("local storage unavailable: {e}");
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, FxError> {
        self.storage
            .as_ref()
            .ok_or_else(|| FxError::Storage("local storage unavailable".into()))
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, FxError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| FxError::Storage(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), FxError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| FxError::Storage(format!("{e:?}")))
    }
}
