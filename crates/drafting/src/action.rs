use df_cards::CardId;

/// Every action a participant can submit against an active draft.
///
/// One shape per variant operation; [`DraftState::apply`](super::DraftState::apply)
/// rejects shapes that do not belong to the active variant with
/// [`WrongVariant`](super::DraftError::WrongVariant).
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftAction {
    /// Booster: simultaneous pick (and optional burn) from the seat's
    /// current pack.
    Pick { picked: Vec<usize>, burned: Vec<usize> },
    /// Winston: take the currently inspected pile.
    TakePile,
    /// Winston: skip the currently inspected pile.
    SkipPile,
    /// Winchester: take one of the face-up stacks in full.
    TakeStack { pile: usize },
    /// Grid: take a line, 0-2 = column, 3-5 = row.
    PickLine { line: usize },
    /// Rochester: take up to picks-per-round indices from the shared pack.
    PickIndices { indices: Vec<usize> },
    /// Rotisserie: claim one face-up card by id.
    Claim { card: CardId },
    /// Minesweeper: pick an unlocked cell.
    PickCell { row: usize, col: usize },
    /// Housman: exchange one hand card for one revealed card.
    Exchange { hand: usize, revealed: usize },
    /// Solomon: reorganize the dealt cards into two piles; indices name
    /// the first pile, the remainder forms the second.
    Divide { first: Vec<usize> },
    /// Solomon: lock the piles and hand the choice to the other seat.
    Confirm,
    /// Solomon: take one pile, the divider receives the other.
    ChoosePile { pile: usize },
    /// Team sealed: claim an unclaimed card from the seat's team pool.
    ClaimTeamCard { card: CardId },
    /// Team sealed: return a previously claimed card.
    ReturnTeamCard { card: CardId },
}
