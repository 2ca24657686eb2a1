/// Typed failures from [`DraftState::apply`](super::DraftState::apply).
///
/// Every participant-visible draft failure is one of these; they travel
/// back to the caller in the call's acknowledgement, never as a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftError {
    /// No draft is active in this session.
    NotDrafting,
    /// The action does not belong to the active variant.
    WrongVariant,
    NotYourTurn,
    /// The action shape is invalid for the current state.
    InvalidAction { reason: String },
    /// Simultaneous variants: this seat already submitted this round.
    AlreadySubmitted,
    /// Optimistic claims: the target card already has an owner.
    AlreadyTaken,
    /// A pool, pile or pack has no cards left to serve the action.
    Empty,
}

impl DraftError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        DraftError::InvalidAction {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::NotDrafting => write!(f, "no draft in progress"),
            DraftError::WrongVariant => write!(f, "action does not match the active draft variant"),
            DraftError::NotYourTurn => write!(f, "not your turn"),
            DraftError::InvalidAction { reason } => write!(f, "invalid action: {}", reason),
            DraftError::AlreadySubmitted => write!(f, "already submitted this round"),
            DraftError::AlreadyTaken => write!(f, "card already taken"),
            DraftError::Empty => write!(f, "nothing left to take"),
        }
    }
}

impl std::error::Error for DraftError {}
