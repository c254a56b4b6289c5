//! Browser Local Storage
//!
//! `KeyValueStore` over `window.localStorage`. Failures are logged and
//! otherwise ignored.

use bingo_core::KeyValueStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageKv;

impl KeyValueStore for LocalStorageKv {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        match local_storage() {
            Some(s) => {
                if s.set_item(key, value).is_err() {
                    log::warn!("localStorage rejected {}", key);
                }
            }
            None => log::warn!("localStorage unavailable, {} not saved", key),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(s) = local_storage() {
            let _ = s.remove_item(key);
        }
    }
}
