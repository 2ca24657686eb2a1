use df_cards::Catalog;
use df_gameroom::Coordinator;
use df_gameroom::Participant;
use df_gameroom::RoomHandle;
use df_gameroom::Scorer;
use df_gameroom::Session;
use df_store::KeyValue;
use df_store::KeyValueExt;
use df_store::session_key;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Manages live session coordinators and their lifecycles.
///
/// Sessions are created on first join to an unknown code; a code with a
/// parked mid-draft session in the store is revived instead.
pub struct Lobby {
    catalog: Arc<Catalog>,
    store: Arc<dyn KeyValue>,
    scorer: Arc<dyn Scorer>,
    rooms: RwLock<HashMap<String, RoomHandle>>,
}

impl Lobby {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn KeyValue>, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            catalog,
            store,
            scorer,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Handle for an already-live session, if any.
    pub async fn peek(&self, code: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(code).cloned()
    }

    /// Handle for a session code, spawning or reviving the coordinator on
    /// demand. `founder` becomes the owner when the code is brand new.
    pub async fn room(self: &Arc<Self>, code: &str, founder: Participant) -> RoomHandle {
        if let Some(handle) = self.peek(code).await {
            return handle;
        }
        let mut rooms = self.rooms.write().await;
        if let Some(handle) = rooms.get(code) {
            return handle.clone();
        }
        let session = self.revive(code).await.unwrap_or_else(|| {
            log::info!("[lobby] opening session {}", code);
            Session::new(code, founder)
        });
        let seed = rand::rng().random();
        let (handle, done_rx) = Coordinator::spawn(
            session,
            self.catalog.clone(),
            self.store.clone(),
            self.scorer.clone(),
            seed,
        );
        rooms.insert(code.to_string(), handle.clone());
        let lobby = self.clone();
        let code = code.to_string();
        tokio::spawn(async move {
            let _ = done_rx.await;
            lobby.rooms.write().await.remove(&code);
            log::info!("[lobby] session {} cleaned up", code);
        });
        handle
    }

    /// Codes of every live session, for the operator endpoints.
    pub async fn codes(&self) -> Vec<String> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// Handles of every live session, for the operator endpoints.
    pub async fn handles(&self) -> Vec<(String, RoomHandle)> {
        self.rooms
            .read()
            .await
            .iter()
            .map(|(code, handle)| (code.clone(), handle.clone()))
            .collect()
    }

    /// Pulls a parked session out of the store, consuming the record.
    async fn revive(&self, code: &str) -> Option<Session> {
        let key = session_key(code);
        let parked: Option<Session> = self
            .store
            .get_doc(&key)
            .await
            .inspect_err(|e| log::error!("[lobby] unreadable parked session {}: {}", code, e))
            .ok()
            .flatten();
        if parked.is_some() {
            let _ = self.store.delete(&key).await;
            log::info!("[lobby] revived parked session {}", code);
        }
        parked
    }
}
