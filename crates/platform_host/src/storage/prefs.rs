//! Lightweight preference storage contracts and adapters.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by preference stores and the typed helpers built on them.
pub enum PrefsError {
    /// The backing store rejected or could not service the request.
    #[error("preference store failure: {0}")]
    Store(String),
    /// The value could not be encoded as JSON.
    #[error("preference serialize failed: {0}")]
    Serialize(String),
    /// The stored text was not valid JSON for the requested type.
    #[error("preference `{key}` is malformed: {reason}")]
    Deserialize {
        /// Key that held the malformed value.
        key: String,
        /// Decoder message.
        reason: String,
    },
}

/// Host service for lightweight preference values (JSON stored as text per key).
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>>;

    /// Deletes a preference key.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for unsupported targets and baseline tests.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, which lets tests simulate a page reload by handing a
/// clone of the store to a fresh session. Writes can be made to fail to exercise quota-style
/// errors.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
}

impl MemoryPrefsStore {
    /// Makes every subsequent save/delete fail (or succeed again when `false`).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Returns the raw stored text for `key`, bypassing the async contract.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Writes raw text for `key`, bypassing the async contract.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.inner.borrow_mut().insert(key.into(), raw_json.into());
    }

    fn check_writable(&self) -> Result<(), PrefsError> {
        if self.reject_writes.get() {
            Err(PrefsError::Store("quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, PrefsError>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async move {
            self.check_writable()?;
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), PrefsError>> {
        Box::pin(async move {
            self.check_writable()?;
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, PrefsError> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| PrefsError::Deserialize {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or store save fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), PrefsError> {
    let raw = serde_json::to_string(value).map_err(|e| PrefsError::Serialize(e.to_string()))?;
    store.save_pref(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Placement {
        x: i32,
        y: i32,
    }

    #[test]
    fn memory_prefs_store_round_trip_and_delete() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("pref.key", "{\"k\":1}")).expect("save");
        assert_eq!(
            block_on(store_obj.load_pref("pref.key")).expect("load"),
            Some("{\"k\":1}".to_string())
        );
        block_on(store_obj.delete_pref("pref.key")).expect("delete");
        assert_eq!(
            block_on(store_obj.load_pref("pref.key")).expect("load"),
            None
        );
    }

    #[test]
    fn typed_pref_helpers_round_trip() {
        let store = MemoryPrefsStore::default();
        block_on(save_pref_with(&store, "placement", &Placement { x: 4, y: 9 }))
            .expect("save typed pref");

        let loaded: Option<Placement> =
            block_on(load_pref_with(&store, "placement")).expect("load typed pref");
        assert_eq!(loaded, Some(Placement { x: 4, y: 9 }));
    }

    #[test]
    fn malformed_json_reports_the_offending_key() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("placement", "{not json");

        let err = block_on(load_pref_with::<_, Placement>(&store, "placement"))
            .expect_err("malformed");
        assert!(matches!(err, PrefsError::Deserialize { ref key, .. } if key == "placement"));
    }

    #[test]
    fn rejected_writes_leave_previous_value() {
        let store = MemoryPrefsStore::default();
        block_on(save_pref_with(&store, "volume", &40u8)).expect("first save");
        store.set_reject_writes(true);

        let err = block_on(save_pref_with(&store, "volume", &90u8)).expect_err("quota");
        assert!(matches!(err, PrefsError::Store(_)));
        assert_eq!(store.raw("volume").as_deref(), Some("40"));
    }

    #[test]
    fn clones_share_backing_map() {
        let store = MemoryPrefsStore::default();
        let reloaded = store.clone();
        block_on(save_pref_with(&store, "k", &true)).expect("save");
        assert_eq!(reloaded.raw("k").as_deref(), Some("true"));
    }

    #[test]
    fn noop_prefs_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        let store_obj: &dyn PrefsStore = &store;
        assert_eq!(block_on(store_obj.load_pref("k")).expect("load"), None);
        block_on(store_obj.save_pref("k", "{}")).expect("save");
        block_on(store_obj.delete_pref("k")).expect("delete");
    }
}
