use serde::Deserialize;
use serde::Serialize;

use df_cards::CardId;
use df_core::Seat;
use df_drafting::DraftAction;
use df_drafting::DraftSync;
use df_drafting::Variant;

use crate::ErrorPayload;
use crate::LogRecipients;
use crate::ParticipantId;
use crate::SessionConfig;
use crate::StartRequest;

/// Messages sent from client to server over WebSocket.
/// Every call is answered with an [`ServerMessage::Ack`] carrying the
/// session code and, on failure, the error payload.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Toggle own readiness in the lobby.
    SetReady { ready: bool },
    /// Owner-only: replace the session configuration wholesale.
    UpdateConfig { config: SessionConfig },
    /// Owner-only: start a draft of the given variant.
    StartDraft { request: StartRequest },
    /// Owner-only.
    StopDraft,
    /// Owner-only.
    PauseDraft,
    /// Owner-only.
    ResumeDraft,
    /// One draft action, validated against the live variant.
    Action { action: DraftAction },
    /// Owner-only: serve a delayed draft log in full from now on.
    UnlockLog,
    /// Owner-only: hand a disconnected participant's seat to their bot.
    ReplaceDisconnected { participant: ParticipantId },
    /// Answer to a liveness probe.
    Pong,
}

/// Messages sent from server to client over WebSocket.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Answer to any client call.
    Ack {
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorPayload>,
    },
    /// Initial connection confirmation with durable identity.
    Connected {
        code: String,
        participant: ParticipantId,
    },
    /// Lobby state changed: roster, owner or config.
    SessionUpdate {
        owner: ParticipantId,
        roster: Vec<RosterEntry>,
        config: SessionConfig,
        recipients: LogRecipients,
    },
    /// A draft began; every seat receives its own filtered snapshot.
    DraftStarted { variant: Variant, seat: Seat, sync: DraftSync },
    /// Full state snapshot for seats whose view changed.
    Sync { seat: Seat, sync: DraftSync },
    /// Partial progress notice for everyone else.
    Progress {
        seat: Seat,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        advanced: bool,
    },
    /// Reconnection payload: snapshot plus private pick history.
    Rejoin {
        seat: Seat,
        sync: DraftSync,
        picks: Vec<CardId>,
    },
    /// Seconds left on the pick timer.
    TimerTick { seconds: u32 },
    DraftPaused,
    DraftResumed,
    DraftEnded,
    /// Liveness probe; answered with [`ClientMessage::Pong`].
    Ping,
}

/// One roster line in a session update.
#[derive(Clone, Debug, Serialize)]
pub struct RosterEntry {
    pub id: ParticipantId,
    pub name: String,
    pub ready: bool,
    pub bot: bool,
    pub connected: bool,
}

impl ServerMessage {
    pub fn ack(code: &str) -> Self {
        Self::Ack {
            code: code.to_string(),
            error: None,
        }
    }
    pub fn nack(code: &str, error: ErrorPayload) -> Self {
        Self::Ack {
            code: code.to_string(),
            error: Some(error),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_calls_parse_from_tagged_json() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"set_ready","ready":true}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SetReady { ready: true }));
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"start_draft","request":{"variant":"winston"}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::StartDraft {
                request: StartRequest::Winston { piles: 3 }
            }
        ));
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"action","action":{"type":"take_pile"}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Action {
                action: DraftAction::TakePile
            }
        ));
    }

    #[test]
    fn acks_omit_absent_errors() {
        let json = ServerMessage::ack("TESTCODE").to_json();
        assert_eq!(json, r#"{"type":"ack","code":"TESTCODE"}"#);
    }

    #[test]
    fn nacks_carry_the_payload() {
        let error = crate::RoomError::capacity("session is full").payload();
        let json = ServerMessage::nack("TESTCODE", error).to_json();
        assert!(json.contains(r#""kind":"capacity""#));
        assert!(json.contains("session is full"));
    }
}
