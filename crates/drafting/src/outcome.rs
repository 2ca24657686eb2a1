use df_cards::CardId;
use df_core::Seat;

/// What a successful apply produced.
#[derive(Debug, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Outcome {
    /// Cards credited to seats by this action. Usually one entry; round
    /// boundaries may credit several seats at once (Housman hands).
    pub credited: Vec<(Seat, Vec<CardId>)>,
    /// Draft-log record of the action, when the action is loggable.
    pub record: Option<LogPick>,
    /// Whether the protocol crossed a round or pack boundary.
    pub advanced: bool,
}

impl Outcome {
    pub fn credit(seat: Seat, cards: Vec<CardId>) -> Self {
        Self {
            credited: vec![(seat, cards)],
            record: None,
            advanced: false,
        }
    }
    pub fn with_record(mut self, record: LogPick) -> Self {
        self.record = Some(record);
        self
    }
    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }
}

/// One draft-log entry: the offer as the actor saw it, and what they did
/// with it. `snapshot` is the pack, pile set or grid flattened in the
/// variant's natural order, with `None` for spent cells.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LogPick {
    pub seat: Seat,
    pub snapshot: Vec<Option<CardId>>,
    pub picked: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub burned: Vec<usize>,
}

impl LogPick {
    pub fn new(seat: Seat, snapshot: Vec<Option<CardId>>, picked: Vec<usize>) -> Self {
        Self {
            seat,
            snapshot,
            picked,
            burned: Vec::new(),
        }
    }
}
