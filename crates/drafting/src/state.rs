use super::BoosterState;
use super::BoosterSync;
use super::DraftAction;
use super::DraftError;
use super::GridState;
use super::GridSync;
use super::HousmanState;
use super::HousmanSync;
use super::MinesweeperState;
use super::MinesweeperSync;
use super::Outcome;
use super::RochesterState;
use super::RochesterSync;
use super::RotisserieState;
use super::RotisserieSync;
use super::SolomonState;
use super::SolomonStep;
use super::SolomonSync;
use super::TeamSealedState;
use super::TeamSealedSync;
use super::WinchesterState;
use super::WinchesterSync;
use super::WinstonState;
use super::WinstonSync;
use df_cards::CardId;
use df_core::Score;
use df_core::Seat;

/// Variant discriminant, used for start requests and wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Booster,
    Winston,
    Winchester,
    Grid,
    Rochester,
    Rotisserie,
    Minesweeper,
    Housman,
    Solomon,
    TeamSealed,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Variant::Booster => "booster",
            Variant::Winston => "winston",
            Variant::Winchester => "winchester",
            Variant::Grid => "grid",
            Variant::Rochester => "rochester",
            Variant::Rotisserie => "rotisserie",
            Variant::Minesweeper => "minesweeper",
            Variant::Housman => "housman",
            Variant::Solomon => "solomon",
            Variant::TeamSealed => "team_sealed",
        };
        write!(f, "{}", name)
    }
}

/// The active draft of a session: one tagged union over every protocol,
/// dispatched exhaustively. `Clone + Serialize` so the coordinator can
/// mutate a working copy (swap on success) and the store can persist a
/// mid-flight draft verbatim.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum DraftState {
    Booster(BoosterState),
    Winston(WinstonState),
    Winchester(WinchesterState),
    Grid(GridState),
    Rochester(RochesterState),
    Rotisserie(RotisserieState),
    Minesweeper(MinesweeperState),
    Housman(HousmanState),
    Solomon(SolomonState),
    TeamSealed(TeamSealedState),
}

/// Per-seat snapshot served on (re)connection, private information
/// already filtered for the requesting seat.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum DraftSync {
    Booster(BoosterSync),
    Winston(WinstonSync),
    Winchester(WinchesterSync),
    Grid(GridSync),
    Rochester(RochesterSync),
    Rotisserie(RotisserieSync),
    Minesweeper(MinesweeperSync),
    Housman(HousmanSync),
    Solomon(SolomonSync),
    TeamSealed(TeamSealedSync),
}

impl DraftState {
    pub fn variant(&self) -> Variant {
        match self {
            DraftState::Booster(_) => Variant::Booster,
            DraftState::Winston(_) => Variant::Winston,
            DraftState::Winchester(_) => Variant::Winchester,
            DraftState::Grid(_) => Variant::Grid,
            DraftState::Rochester(_) => Variant::Rochester,
            DraftState::Rotisserie(_) => Variant::Rotisserie,
            DraftState::Minesweeper(_) => Variant::Minesweeper,
            DraftState::Housman(_) => Variant::Housman,
            DraftState::Solomon(_) => Variant::Solomon,
            DraftState::TeamSealed(_) => Variant::TeamSealed,
        }
    }
    /// Whose turn it is; `None` for the simultaneous variants.
    pub fn current_actor(&self) -> Option<Seat> {
        match self {
            DraftState::Booster(_) => None,
            DraftState::Winston(s) => s.current_actor(),
            DraftState::Winchester(s) => s.current_actor(),
            DraftState::Grid(s) => s.current_actor(),
            DraftState::Rochester(s) => s.current_actor(),
            DraftState::Rotisserie(s) => s.current_actor(),
            DraftState::Minesweeper(s) => s.current_actor(),
            DraftState::Housman(s) => s.current_actor(),
            DraftState::Solomon(s) => s.current_actor(),
            DraftState::TeamSealed(_) => None,
        }
    }
    pub fn is_complete(&self) -> bool {
        match self {
            DraftState::Booster(s) => s.is_complete(),
            DraftState::Winston(s) => s.is_complete(),
            DraftState::Winchester(s) => s.is_complete(),
            DraftState::Grid(s) => s.is_complete(),
            DraftState::Rochester(s) => s.is_complete(),
            DraftState::Rotisserie(s) => s.is_complete(),
            DraftState::Minesweeper(s) => s.is_complete(),
            DraftState::Housman(s) => s.is_complete(),
            DraftState::Solomon(s) => s.is_complete(),
            DraftState::TeamSealed(s) => s.is_complete(),
        }
    }
    /// Validate and apply one action. Action shapes that do not belong
    /// to the active variant fail with `WrongVariant`; other validation
    /// is delegated to the variant.
    pub fn apply(&mut self, seat: Seat, action: &DraftAction) -> Result<Outcome, DraftError> {
        match (self, action) {
            (DraftState::Booster(s), DraftAction::Pick { picked, burned }) => {
                s.apply_pick(seat, picked, burned)
            }
            (DraftState::Winston(s), DraftAction::TakePile) => s.take_pile(seat),
            (DraftState::Winston(s), DraftAction::SkipPile) => s.skip_pile(seat),
            (DraftState::Winchester(s), DraftAction::TakeStack { pile }) => {
                s.take_stack(seat, *pile)
            }
            (DraftState::Grid(s), DraftAction::PickLine { line }) => s.pick_line(seat, *line),
            (DraftState::Rochester(s), DraftAction::PickIndices { indices }) => {
                s.pick_indices(seat, indices)
            }
            (DraftState::Rotisserie(s), DraftAction::Claim { card }) => s.claim(seat, *card),
            (DraftState::Minesweeper(s), DraftAction::PickCell { row, col }) => {
                s.pick_cell(seat, *row, *col)
            }
            (DraftState::Housman(s), DraftAction::Exchange { hand, revealed }) => {
                s.exchange(seat, *hand, *revealed)
            }
            (DraftState::Solomon(s), DraftAction::Divide { first }) => s.divide(seat, first),
            (DraftState::Solomon(s), DraftAction::Confirm) => s.confirm(seat),
            (DraftState::Solomon(s), DraftAction::ChoosePile { pile }) => {
                s.choose_pile(seat, *pile)
            }
            (DraftState::TeamSealed(s), DraftAction::ClaimTeamCard { card }) => {
                s.claim(seat, *card)
            }
            (DraftState::TeamSealed(s), DraftAction::ReturnTeamCard { card }) => {
                s.unclaim(seat, *card)
            }
            _ => Err(DraftError::WrongVariant),
        }
    }
    /// Seats expected to act right now: the current actor for sequential
    /// variants, every seat that has not yet submitted for simultaneous
    /// ones. Empty when the draft is complete or untimed.
    pub fn pending_seats(&self) -> Vec<Seat> {
        match self {
            DraftState::Booster(s) if !s.is_complete() => {
                (0..s.seats()).filter(|seat| !s.has_submitted(*seat)).collect()
            }
            DraftState::Booster(_) => Vec::new(),
            DraftState::TeamSealed(_) => Vec::new(),
            _ => self.current_actor().into_iter().collect(),
        }
    }
    /// The cards a seat is choosing from, when the choice is over a
    /// private offer a scorer can rank. `None` for open-information
    /// variants.
    pub fn offer(&self, seat: Seat) -> Option<Vec<CardId>> {
        match self {
            DraftState::Booster(s) => s.pack_for(seat).map(|p| p.cards.clone()),
            _ => None,
        }
    }
    /// A synthesized valid action for a seat that timed out or is run by
    /// a bot. `scores` rank the seat's offer when available. `None` when
    /// the seat has nothing to do.
    pub fn auto_action(&self, seat: Seat, scores: Option<&[Score]>) -> Option<DraftAction> {
        if self.is_complete() {
            return None;
        }
        match self {
            DraftState::Booster(s) => s
                .auto_pick(seat, scores)
                .map(|(picked, burned)| DraftAction::Pick { picked, burned }),
            DraftState::Winston(_) => Some(DraftAction::TakePile),
            DraftState::Winchester(s) => s
                .piles()
                .iter()
                .position(|p| !p.is_empty())
                .map(|pile| DraftAction::TakeStack { pile }),
            DraftState::Grid(s) => s.auto_line().map(|line| DraftAction::PickLine { line }),
            DraftState::Rochester(s) => Some(DraftAction::PickIndices {
                indices: s.auto_indices(),
            }),
            DraftState::Rotisserie(s) => {
                s.first_unowned().map(|card| DraftAction::Claim { card })
            }
            DraftState::Minesweeper(s) => {
                s.auto_cell().map(|(row, col)| DraftAction::PickCell { row, col })
            }
            DraftState::Housman(_) => Some(DraftAction::Exchange {
                hand: 0,
                revealed: 0,
            }),
            DraftState::Solomon(s) => Some(match s.step() {
                SolomonStep::Picking => DraftAction::ChoosePile { pile: 0 },
                SolomonStep::Dividing if s.piles().iter().all(|p| !p.is_empty()) => {
                    DraftAction::Confirm
                }
                SolomonStep::Dividing => {
                    let total: usize = s.piles().iter().map(Vec::len).sum();
                    DraftAction::Divide {
                        first: (0..total / 2).collect(),
                    }
                }
            }),
            DraftState::TeamSealed(_) => None,
        }
    }
    pub fn sync(&self, seat: Seat) -> DraftSync {
        match self {
            DraftState::Booster(s) => DraftSync::Booster(s.sync(seat)),
            DraftState::Winston(s) => DraftSync::Winston(s.sync()),
            DraftState::Winchester(s) => DraftSync::Winchester(s.sync()),
            DraftState::Grid(s) => DraftSync::Grid(s.sync()),
            DraftState::Rochester(s) => DraftSync::Rochester(s.sync()),
            DraftState::Rotisserie(s) => DraftSync::Rotisserie(s.sync()),
            DraftState::Minesweeper(s) => DraftSync::Minesweeper(s.sync()),
            DraftState::Housman(s) => DraftSync::Housman(s.sync(seat)),
            DraftState::Solomon(s) => DraftSync::Solomon(s.sync()),
            DraftState::TeamSealed(s) => DraftSync::TeamSealed(s.sync(seat)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_cards::CardId;

    #[test]
    fn mismatched_action_is_wrong_variant() {
        let cards: Vec<CardId> = (0..4).map(|_| CardId::default()).collect();
        let mut state = DraftState::Rotisserie(RotisserieState::new(cards, 2));
        assert_eq!(
            state.apply(0, &DraftAction::TakePile),
            Err(DraftError::WrongVariant)
        );
        assert_eq!(
            state.apply(
                0,
                &DraftAction::Pick {
                    picked: vec![0],
                    burned: vec![]
                }
            ),
            Err(DraftError::WrongVariant)
        );
    }
    #[test]
    fn failed_apply_leaves_state_untouched() {
        let cards: Vec<CardId> = (0..4).map(|_| CardId::default()).collect();
        let mut state = DraftState::Rotisserie(RotisserieState::new(cards.clone(), 2));
        let before = state.clone();
        assert!(state.apply(1, &DraftAction::Claim { card: cards[0] }).is_err());
        assert_eq!(state, before);
    }
    #[test]
    fn sync_round_trips_through_serde() {
        let cards: Vec<CardId> = (0..4).map(|_| CardId::default()).collect();
        let state = DraftState::Rotisserie(RotisserieState::new(cards, 2));
        let json = serde_json::to_string(&state.sync(0)).unwrap();
        assert!(json.contains("\"variant\":\"rotisserie\""));
        let back: DraftSync = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state.sync(0));
    }
    #[test]
    fn auto_actions_always_apply_cleanly() {
        let cards: Vec<CardId> = (0..6).map(|_| CardId::default()).collect();
        let mut state = DraftState::Rotisserie(RotisserieState::new(cards, 2));
        while !state.is_complete() {
            let seat = state.current_actor().unwrap();
            let action = state.auto_action(seat, None).unwrap();
            state.apply(seat, &action).unwrap();
        }
        assert!(state.pending_seats().is_empty());
    }
    #[test]
    fn state_persists_verbatim_through_serde() {
        let cards: Vec<CardId> = (0..6).map(|_| CardId::default()).collect();
        let mut state = DraftState::Rotisserie(RotisserieState::new(cards.clone(), 2));
        state.apply(0, &DraftAction::Claim { card: cards[2] }).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: DraftState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
