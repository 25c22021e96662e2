//! String-keyed JSON storage.
//!
//! [`KeyValueStore`] is the raw backend contract: text in, text out, one key
//! at a time. [`JsonStoreExt`] layers typed access on top of any backend:
//!
//! - [`JsonStoreExt::get`] yields the caller's fallback for absent keys,
//!   stored `null` and values that no longer decode. A backend that cannot
//!   be read is an error, never an empty value.
//! - [`JsonStoreExt::try_get`] keeps the distinction between "absent" and
//!   "corrupt" for callers that care.
//! - [`JsonStoreExt::set`] overwrites the whole value. Backend failures are
//!   propagated untouched; nothing is retried.
//!
//! Backends are handed to repositories by reference, so every test can work
//! against its own isolated [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app_response::AppResponse;

/// Raw text storage under string keys.
pub trait KeyValueStore {
    /// Returns the text stored at `key`, or `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse>;

    /// Stores `value` at `key`, replacing whatever was there.
    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse>;
}

/// Why a stored value could not be turned back into the requested type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The stored text is not valid JSON for the requested shape.
    Corrupt { key: String, reason: String },
    /// The backend failed while reading the key.
    Unreadable { key: String, reason: String },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Corrupt { key, reason } => {
                write!(f, "value at '{}' does not decode: {}", key, reason)
            }
            DecodeError::Unreadable { key, reason } => {
                write!(f, "value at '{}' could not be read: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Typed JSON access for every [`KeyValueStore`].
pub trait JsonStoreExt: KeyValueStore {
    /// Reads and decodes the value at `key`.
    ///
    /// `Ok(None)` means the key is absent or holds JSON `null`.
    fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        let raw = self.read(key).map_err(|e| DecodeError::Unreadable {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let Some(text) = raw else {
            return Ok(None);
        };

        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| DecodeError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DecodeError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Reads the value at `key`, substituting `fallback` when it is absent or
    /// cannot be decoded. Backend read failures are returned as
    /// `DatabaseError`.
    fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Result<T, AppResponse> {
        match self.try_get(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(fallback),
            Err(e @ DecodeError::Corrupt { .. }) => {
                warn!("Falling back to default: {e}");
                Ok(fallback)
            }
            Err(e @ DecodeError::Unreadable { .. }) => Err(e.into()),
        }
    }

    /// Serializes `value` and stores it at `key`.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppResponse> {
        let text = serde_json::to_string(value)?;
        debug!("Writing {} bytes to '{}'", text.len(), key);
        self.write(key, &text)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}

/// Process-local store backed by a hash map.
///
/// Each instance is its own namespace; nothing is shared or persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
