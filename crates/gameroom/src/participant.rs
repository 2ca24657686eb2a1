use df_cards::CardId;
use df_core::ID;
use df_core::Unique;

pub type ParticipantId = ID<Participant>;

/// A session member. Identity is durable: it survives reconnects and is
/// what pick records and the draft log key on.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Participant {
    id: ParticipantId,
    name: String,
    pub ready: bool,
    /// Seat-filling automaton, not a human channel.
    pub bot: bool,
    /// Private pick record, duplicated into the draft log.
    pub picks: Vec<CardId>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ready: false,
            bot: false,
            picks: Vec::new(),
        }
    }
    pub fn bot(index: usize) -> Self {
        Self {
            id: ID::default(),
            name: format!("Bot #{}", index + 1),
            ready: true,
            bot: true,
            picks: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Unique for Participant {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
