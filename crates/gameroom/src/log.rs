//! Append-only draft log.
//!
//! The log records everything regardless of the recipients policy; the
//! policy only gates what [`DraftLog::view`] serves to a given requester.

use df_cards::CardId;
use df_core::Seat;
use df_drafting::LogPick;

use crate::ParticipantId;

/// Who may read the draft log, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogRecipients {
    /// Recorded but never served.
    None,
    /// Owner only.
    Owner,
    /// Stripped view until the owner unlocks it.
    Delayed,
    #[default]
    Everyone,
}

/// One seat's slice of the log.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SeatLog {
    pub id: ParticipantId,
    pub name: String,
    pub picks: Vec<LogPick>,
}

/// Complete record of a draft: the packs as generated plus every pick in
/// order, per seat. Always written in full; see [`LogRecipients`].
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DraftLog {
    pub session: String,
    pub variant: String,
    pub recipients: LogRecipients,
    pub seats: Vec<SeatLog>,
    /// Pack contents at generation time, before any pick.
    pub packs: Vec<Vec<CardId>>,
    /// Set by the owner once a `Delayed` log may be served in full.
    pub unlocked: bool,
}

impl DraftLog {
    pub fn new(
        session: impl Into<String>,
        variant: impl Into<String>,
        recipients: LogRecipients,
        roster: &[(ParticipantId, String)],
    ) -> Self {
        Self {
            session: session.into(),
            variant: variant.into(),
            recipients,
            seats: roster
                .iter()
                .map(|(id, name)| SeatLog {
                    id: *id,
                    name: name.clone(),
                    picks: Vec::new(),
                })
                .collect(),
            packs: Vec::new(),
            unlocked: false,
        }
    }

    pub fn record_packs(&mut self, packs: &[Vec<CardId>]) {
        self.packs.extend(packs.iter().cloned());
    }

    pub fn append(&mut self, record: LogPick) {
        let seat: Seat = record.seat;
        if let Some(log) = self.seats.get_mut(seat) {
            log.picks.push(record);
        } else {
            log::warn!("dropping pick record for unknown seat {}", seat);
        }
    }

    pub fn unlock(&mut self) {
        self.unlocked = true;
    }

    /// The log as served to a requester. `None` means the requester may
    /// not see it at all.
    pub fn view(&self, owner: bool) -> Option<DraftLog> {
        match self.recipients {
            LogRecipients::None => None,
            LogRecipients::Owner if owner => Some(self.clone()),
            LogRecipients::Owner => None,
            LogRecipients::Delayed if owner || self.unlocked => Some(self.clone()),
            LogRecipients::Delayed => Some(self.stripped()),
            LogRecipients::Everyone => Some(self.clone()),
        }
    }

    /// Roster and variant only: what a `Delayed` log looks like before
    /// the owner unlocks it.
    fn stripped(&self) -> DraftLog {
        DraftLog {
            session: self.session.clone(),
            variant: self.variant.clone(),
            recipients: self.recipients,
            seats: self
                .seats
                .iter()
                .map(|seat| SeatLog {
                    id: seat.id,
                    name: seat.name.clone(),
                    picks: Vec::new(),
                })
                .collect(),
            packs: Vec::new(),
            unlocked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_core::ID;

    fn sample(recipients: LogRecipients) -> DraftLog {
        let roster = vec![
            (ID::default(), "Ada".to_string()),
            (ID::default(), "Grace".to_string()),
        ];
        let mut log = DraftLog::new("TESTCODE", "booster", recipients, &roster);
        log.record_packs(&[vec![CardId::default(); 3]]);
        log.append(LogPick {
            seat: 0,
            snapshot: vec![Some(CardId::default()); 3],
            picked: vec![0],
            burned: vec![],
        });
        log
    }

    #[test]
    fn none_serves_nobody() {
        let log = sample(LogRecipients::None);
        assert!(log.view(true).is_none());
        assert!(log.view(false).is_none());
    }
    #[test]
    fn owner_policy_gates_non_owners() {
        let log = sample(LogRecipients::Owner);
        assert!(log.view(true).is_some());
        assert!(log.view(false).is_none());
    }
    #[test]
    fn delayed_strips_until_unlocked() {
        let mut log = sample(LogRecipients::Delayed);
        let before = log.view(false).unwrap();
        assert!(before.packs.is_empty());
        assert!(before.seats.iter().all(|s| s.picks.is_empty()));
        assert_eq!(before.seats[0].name, "Ada");
        log.unlock();
        let after = log.view(false).unwrap();
        assert_eq!(after, log);
    }
    #[test]
    fn record_is_complete_regardless_of_policy() {
        let log = sample(LogRecipients::None);
        assert_eq!(log.packs.len(), 1);
        assert_eq!(log.seats[0].picks.len(), 1);
    }
}
