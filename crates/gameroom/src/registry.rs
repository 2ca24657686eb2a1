//! Connection registry: durable identity to live channel.
//!
//! Owned by the session coordinator task, so access is already
//! serialized. The registry only moves messages; roster membership lives
//! on the [`Session`](crate::Session).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::sync::mpsc;

use df_core::LIVENESS_TIMEOUT;

use crate::ParticipantId;
use crate::ServerMessage;

struct Connection {
    tx: mpsc::Sender<ServerMessage>,
    pong: Arc<Notify>,
}

/// Whether an identity is free to claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// No live channel held the identity.
    Free,
    /// The old channel did not answer the probe and was force-closed.
    Reclaimed,
    /// The old channel is alive; the claimant needs a fresh identity.
    Refused,
}

#[derive(Default)]
pub struct Registry {
    connections: HashMap<ParticipantId, Connection>,
}

impl Registry {
    /// `pong` is answered by the connection's bridge directly, outside
    /// the coordinator mailbox, so a probe can resolve while the
    /// coordinator is blocked inside [`claim`](Registry::claim).
    pub fn attach(&mut self, id: ParticipantId, tx: mpsc::Sender<ServerMessage>, pong: Arc<Notify>) {
        self.connections.insert(id, Connection { tx, pong });
    }
    pub fn detach(&mut self, id: ParticipantId) {
        self.connections.remove(&id);
    }
    pub fn is_connected(&self, id: ParticipantId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Best-effort delivery; a full or closed channel drops the message
    /// and the bridge's own teardown handles the disconnect.
    pub fn send(&self, id: ParticipantId, message: &ServerMessage) {
        if let Some(connection) = self.connections.get(&id) {
            if connection.tx.try_send(message.clone()).is_err() {
                log::debug!("dropping message for unreachable participant {}", id);
            }
        }
    }
    pub fn broadcast(&self, message: &ServerMessage) {
        for id in self.connections.keys() {
            self.send(*id, message);
        }
    }

    /// Records a pong from the participant's channel.
    pub fn pong(&self, id: ParticipantId) {
        if let Some(connection) = self.connections.get(&id) {
            connection.pong.notify_one();
        }
    }

    /// Resolves an identity race: probes the channel currently holding
    /// the identity and decides who keeps it.
    pub async fn claim(&mut self, id: ParticipantId) -> Claim {
        let Some(connection) = self.connections.get(&id) else {
            return Claim::Free;
        };
        let pong = connection.pong.clone();
        self.send(id, &ServerMessage::Ping);
        let wait = Duration::from_secs(LIVENESS_TIMEOUT);
        match tokio::time::timeout(wait, pong.notified()).await {
            Ok(()) => Claim::Refused,
            Err(_) => {
                self.connections.remove(&id);
                Claim::Reclaimed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_core::ID;

    fn channel() -> (mpsc::Sender<ServerMessage>, mpsc::Receiver<ServerMessage>) {
        mpsc::channel(8)
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_identity_is_free() {
        let mut registry = Registry::default();
        assert_eq!(registry.claim(ID::default()).await, Claim::Free);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_channel_is_reclaimed() {
        let mut registry = Registry::default();
        let id = ID::default();
        let (tx, mut rx) = channel();
        registry.attach(id, tx, Arc::new(Notify::new()));
        let claim = registry.claim(id).await;
        assert_eq!(claim, Claim::Reclaimed);
        assert!(!registry.is_connected(id));
        assert!(matches!(rx.recv().await, Some(ServerMessage::Ping)));
    }

    #[tokio::test(start_paused = true)]
    async fn answering_channel_keeps_its_identity() {
        let mut registry = Registry::default();
        let id = ID::default();
        let (tx, _rx) = channel();
        registry.attach(id, tx, Arc::new(Notify::new()));
        registry.pong(id);
        assert_eq!(registry.claim(id).await, Claim::Refused);
        assert!(registry.is_connected(id));
    }

    #[tokio::test]
    async fn broadcast_reaches_every_channel() {
        let mut registry = Registry::default();
        let (a_tx, mut a_rx) = channel();
        let (b_tx, mut b_rx) = channel();
        registry.attach(ID::default(), a_tx, Arc::new(Notify::new()));
        registry.attach(ID::default(), b_tx, Arc::new(Notify::new()));
        registry.broadcast(&ServerMessage::DraftEnded);
        assert!(matches!(a_rx.recv().await, Some(ServerMessage::DraftEnded)));
        assert!(matches!(b_rx.recv().await, Some(ServerMessage::DraftEnded)));
    }
}
