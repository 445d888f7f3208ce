use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const POSTS_KEY: &str = "posts";
pub const LIKED_POSTS_KEY: &str = "likedPosts";
pub const BOOKMARKED_POSTS_KEY: &str = "bookmarkedPosts";
pub const POST_COMMENTS_KEY: &str = "postComments";
pub const PROFILE_KEY: &str = "profile";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
    #[error("stored value is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key/value persistence for client-side state.
pub trait StateStore {
    /// `Ok(None)` when nothing was stored under `key`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

/// Browser `localStorage`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalStore;

impl StateStore for LocalStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match LocalStorage::get::<T>(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(StoreError::Read {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        LocalStorage::set(key, value).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: err.to_string(),
        })
    }
}

/// In-memory store holding JSON text, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, json: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), json.to_string());
    }
}

impl StateStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.entries.borrow().get(key) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.entries.borrow_mut().insert(key.to_string(), json);
        Ok(())
    }
}

pub fn load_or<S: StateStore, T: DeserializeOwned>(
    store: &S,
    key: &str,
    fallback: impl FnOnce() -> T,
) -> T {
    match store.load::<T>(key) {
        Ok(Some(value)) => value,
        Ok(None) => fallback(),
        Err(err) => {
            warn!("Falling back to default '{}': {}", key, err);
            fallback()
        }
    }
}

pub fn persist<S: StateStore, T: Serialize>(store: &S, key: &str, value: &T) {
    if let Err(err) = store.save(key, value) {
        warn!("Failed to persist '{}': {}", key, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_uses_fallback() {
        let store = MemoryStore::new();
        let value: Vec<String> = load_or(&store, "tags", || vec!["2".to_string()]);
        assert_eq!(value, vec!["2".to_string()]);
    }

    #[test]
    fn corrupt_value_uses_fallback() {
        let store = MemoryStore::new();
        store.put_raw("tags", "{not json");
        assert!(store.load::<Vec<String>>("tags").is_err());
        let value: Vec<String> = load_or(&store, "tags", Vec::new);
        assert!(value.is_empty());
    }

    #[test]
    fn saved_value_is_shared_between_clones() {
        let store = MemoryStore::new();
        let other = store.clone();
        persist(&store, "count", &3u32);
        assert_eq!(other.raw("count").as_deref(), Some("3"));
        assert_eq!(other.load::<u32>("count").unwrap(), Some(3));
    }
}
