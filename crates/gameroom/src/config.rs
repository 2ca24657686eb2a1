use crate::LogRecipients;
use df_cards::CardId;
use df_core::DEFAULT_PACKS_PER_PLAYER;
use df_core::DEFAULT_PACK_SIZE;
use df_core::DEFAULT_PICK_TIMER;
use df_packs::DuplicateCaps;

/// Owner-tunable session settings. Patches that fail [`validate`]
/// locally are ignored silently before ever reaching the session.
///
/// [`validate`]: SessionConfig::validate
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub packs_per_player: usize,
    pub cards_per_pack: usize,
    pub picks_per_round: usize,
    pub burns_per_round: usize,
    /// Set code restricting the pool; `None` drafts the whole catalog.
    pub set_code: Option<String>,
    /// Fixed pack contents per pack slot, overriding generation.
    pub custom_packs: Vec<Vec<CardId>>,
    pub bots: usize,
    /// Per-pick seconds at pick 0; decays with the pick number. 0 turns
    /// the timer off.
    pub timer: u32,
    pub recipients: LogRecipients,
    pub color_balance: bool,
    pub foil: bool,
    pub duplicate_caps: Option<DuplicateCaps>,
    /// Whether the session owner occupies a seat.
    pub owner_is_player: bool,
    pub max_players: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            packs_per_player: DEFAULT_PACKS_PER_PLAYER,
            cards_per_pack: DEFAULT_PACK_SIZE,
            picks_per_round: 1,
            burns_per_round: 0,
            set_code: None,
            custom_packs: Vec::new(),
            bots: 0,
            timer: DEFAULT_PICK_TIMER,
            recipients: LogRecipients::Everyone,
            color_balance: false,
            foil: false,
            duplicate_caps: None,
            owner_is_player: true,
            max_players: 8,
        }
    }
}

impl SessionConfig {
    /// Local sanity bounds. Anything outside them never reaches the
    /// session.
    pub fn validate(&self) -> bool {
        self.packs_per_player >= 1
            && self.packs_per_player <= 24
            && self.cards_per_pack >= 1
            && self.cards_per_pack <= 32
            && self.picks_per_round >= 1
            && self.picks_per_round + self.burns_per_round <= self.cards_per_pack
            && self.bots <= 30
            && self.timer <= 3600
            && self.max_players >= 1
            && self.max_players <= 32
    }
    /// Applies a patch only if the patched config validates; returns
    /// whether anything changed.
    pub fn apply(&mut self, patch: SessionConfig) -> bool {
        if patch.validate() && patch != *self {
            *self = patch;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates() {
        assert!(SessionConfig::default().validate());
    }
    #[test]
    fn malformed_patch_ignored() {
        let mut config = SessionConfig::default();
        let mut bad = config.clone();
        bad.cards_per_pack = 0;
        assert!(!config.apply(bad));
        assert_eq!(config, SessionConfig::default());
    }
    #[test]
    fn burns_bounded_by_pack_size() {
        let mut config = SessionConfig::default();
        config.burns_per_round = config.cards_per_pack;
        assert!(!config.validate());
    }
}
