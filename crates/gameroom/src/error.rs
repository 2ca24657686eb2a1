use df_drafting::DraftError;

/// Session-boundary error taxonomy. Every participant-visible failure is
/// returned inside the call's acknowledgement as an [`ErrorPayload`];
/// nothing crosses the session boundary as a panic.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoomError {
    /// Malformed call: wrong shape, unknown session, unknown participant.
    Protocol { reason: String },
    /// Draft-level rejection (turn, variant, shape, ownership).
    Turn { source: DraftError },
    /// Session full, or wrong headcount for a fixed-seat variant.
    Capacity { reason: String },
    /// A pool or pack could not serve the request.
    Resource { reason: String },
    /// The bot scorer was unreachable or answered garbage. Recoverable,
    /// never blocks drafting.
    External { reason: String },
    /// Unexpected failure during mutation. The session state is left
    /// unmodified; diagnostics go to the error store.
    Internal,
}

impl RoomError {
    pub fn protocol(reason: impl Into<String>) -> Self {
        RoomError::Protocol {
            reason: reason.into(),
        }
    }
    pub fn capacity(reason: impl Into<String>) -> Self {
        RoomError::Capacity {
            reason: reason.into(),
        }
    }
    pub fn resource(reason: impl Into<String>) -> Self {
        RoomError::Resource {
            reason: reason.into(),
        }
    }
    pub fn external(reason: impl Into<String>) -> Self {
        RoomError::External {
            reason: reason.into(),
        }
    }
    /// The dismissible notice shown to the participant.
    pub fn payload(&self) -> ErrorPayload {
        let (kind, title, text) = match self {
            RoomError::Protocol { reason } => ("protocol", "Invalid request", reason.clone()),
            RoomError::Turn { source } => ("turn", "Rejected", source.to_string()),
            RoomError::Capacity { reason } => ("capacity", "Session capacity", reason.clone()),
            RoomError::Resource { reason } => ("resource", "Not available", reason.clone()),
            RoomError::External { reason } => ("external", "Advisor unavailable", reason.clone()),
            RoomError::Internal => (
                "internal",
                "Something went wrong",
                "The action was not applied.".to_string(),
            ),
        };
        ErrorPayload {
            kind: kind.to_string(),
            title: title.to_string(),
            text,
        }
    }
}

impl From<DraftError> for RoomError {
    fn from(source: DraftError) -> Self {
        RoomError::Turn { source }
    }
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let payload = self.payload();
        write!(f, "{}: {}", payload.title, payload.text)
    }
}

impl std::error::Error for RoomError {}

/// Wire shape of an error inside an acknowledgement.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub title: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_errors_map_to_turn() {
        let err: RoomError = DraftError::NotYourTurn.into();
        assert_eq!(err.payload().kind, "turn");
    }
    #[test]
    fn internal_reveals_no_detail() {
        let payload = RoomError::Internal.payload();
        assert_eq!(payload.kind, "internal");
        assert!(!payload.text.contains("panic"));
    }
}
