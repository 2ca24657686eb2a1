use super::DraftError;
use super::LogPick;
use super::Outcome;
use df_cards::CardId;
use df_core::Seat;

/// Everything face-up at once: seats claim one visible card per turn by
/// id, in strict rotation, until every card is owned.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RotisserieState {
    seats: usize,
    cards: Vec<(CardId, Option<Seat>)>,
    pick_number: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RotisserieSync {
    pub cards: Vec<(CardId, Option<Seat>)>,
    pub pick_number: usize,
    pub current_actor: Option<Seat>,
}

impl RotisserieState {
    pub fn new(cards: Vec<CardId>, seats: usize) -> Self {
        Self {
            seats,
            cards: cards.into_iter().map(|c| (c, None)).collect(),
            pick_number: 0,
        }
    }
    pub fn is_complete(&self) -> bool {
        self.pick_number >= self.cards.len()
    }
    pub fn current_actor(&self) -> Option<Seat> {
        if self.is_complete() {
            None
        } else {
            Some(self.pick_number % self.seats)
        }
    }
    /// First unowned card, for forced picks.
    pub fn first_unowned(&self) -> Option<CardId> {
        self.cards.iter().find(|(_, o)| o.is_none()).map(|(c, _)| *c)
    }
    pub fn owner(&self, card: CardId) -> Option<Seat> {
        self.cards.iter().find(|(c, _)| *c == card).and_then(|(_, o)| *o)
    }
    pub fn claim(&mut self, seat: Seat, card: CardId) -> Result<Outcome, DraftError> {
        if self.is_complete() {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        let index = self
            .cards
            .iter()
            .position(|(c, _)| *c == card)
            .ok_or_else(|| DraftError::invalid("no such card on the table"))?;
        if self.cards[index].1.is_some() {
            return Err(DraftError::AlreadyTaken);
        }
        self.cards[index].1 = Some(seat);
        self.pick_number += 1;
        let record = LogPick::new(seat, vec![Some(card)], vec![0]);
        Ok(Outcome::credit(seat, vec![card]).with_record(record))
    }
    pub fn sync(&self) -> RotisserieSync {
        RotisserieSync {
            cards: self.cards.clone(),
            pick_number: self.pick_number,
            current_actor: self.current_actor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_cards_eight_seats_strict_rotation() {
        let cards: Vec<CardId> = (0..30).map(|_| CardId::default()).collect();
        let mut state = RotisserieState::new(cards.clone(), 8);
        let mut picks = 0;
        for card in &cards {
            let seat = state.current_actor().unwrap();
            assert_eq!(seat, picks % 8);
            state.claim(seat, *card).unwrap();
            picks += 1;
        }
        assert_eq!(picks, 30);
        assert!(state.is_complete());
        assert_eq!(state.current_actor(), None);
    }
    #[test]
    fn double_claim_rejected() {
        let cards: Vec<CardId> = (0..4).map(|_| CardId::default()).collect();
        let mut state = RotisserieState::new(cards.clone(), 2);
        state.claim(0, cards[0]).unwrap();
        assert_eq!(state.claim(1, cards[0]), Err(DraftError::AlreadyTaken));
        assert_eq!(state.owner(cards[0]), Some(0));
    }
}
