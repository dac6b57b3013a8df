//! Key-value persistence
//!
//! A small string store behind a trait so the simulation never touches
//! browser APIs directly. LocalStorage backs it on web, a `HashMap` everywhere
//! else (native demo, tests). Failures never propagate: an unavailable store
//! reads as empty and rejects writes.

use std::collections::HashMap;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Returns false when the store is unavailable or rejects the write
    fn set(&mut self, key: &str, value: &str) -> bool;

    fn remove(&mut self, key: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.entries.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's LocalStorage; private modes may deny it
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        match &self.storage {
            Some(storage) => storage.set_item(key, value).is_ok(),
            None => false,
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}
