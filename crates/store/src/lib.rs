//! Pluggable key-value persistence.
//!
//! Crash recovery and error dumps both go through the [`KeyValue`]
//! trait: a string key to JSON document mapping, backend-agnostic by
//! construction (the reference deployment uses a managed document
//! store; [`MemoryStore`] is the in-process implementation and the test
//! double). Typed access goes through [`KeyValueExt`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// String key to JSON document mapping.
#[async_trait]
pub trait KeyValue: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
    async fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>>;
}

/// Typed document access on top of any [`KeyValue`] backend.
#[async_trait]
pub trait KeyValueExt: KeyValue {
    async fn get_doc<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
    async fn put_doc<T: Serialize + Sync>(&self, key: &str, doc: &T) -> anyhow::Result<()> {
        self.put(key, serde_json::to_string(doc)?).await
    }
}

impl<S: KeyValue + ?Sized> KeyValueExt for S {}

/// In-process reference backend.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValue for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
    async fn keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Key namespaces used by the session layer.
pub const SESSIONS_PREFIX: &str = "session/";
pub const CONNECTIONS_PREFIX: &str = "connection/";
pub const ERRORS_PREFIX: &str = "error/";

pub fn session_key(code: &str) -> String {
    format!("{}{}", SESSIONS_PREFIX, code)
}
pub fn connection_key(id: &str) -> String {
    format!("{}{}", CONNECTIONS_PREFIX, id)
}
pub fn error_key(id: &str) -> String {
    format!("{}{}", ERRORS_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Doc {
        code: String,
        round: u32,
    }

    #[tokio::test]
    async fn typed_round_trip() {
        let store = MemoryStore::new();
        let doc = Doc {
            code: "ABCDEFGH".into(),
            round: 7,
        };
        store.put_doc(&session_key("ABCDEFGH"), &doc).await.unwrap();
        let back: Option<Doc> = store.get_doc(&session_key("ABCDEFGH")).await.unwrap();
        assert_eq!(back, Some(doc));
    }
    #[tokio::test]
    async fn delete_and_prefix_listing() {
        let store = MemoryStore::new();
        store.put(&session_key("AAAA"), "{}".into()).await.unwrap();
        store.put(&session_key("BBBB"), "{}".into()).await.unwrap();
        store.put(&error_key("x"), "{}".into()).await.unwrap();
        let mut keys = store.keys(SESSIONS_PREFIX).await.unwrap();
        keys.sort();
        assert_eq!(keys, vec![session_key("AAAA"), session_key("BBBB")]);
        store.delete(&session_key("AAAA")).await.unwrap();
        assert_eq!(store.get(&session_key("AAAA")).await.unwrap(), None);
    }
    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryStore::new();
        let got: Option<Doc> = store.get_doc("nope").await.unwrap();
        assert!(got.is_none());
    }
}
