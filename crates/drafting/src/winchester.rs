use super::DraftError;
use super::LogPick;
use super::Outcome;
use df_cards::CardId;
use df_core::Seat;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// N-seat face-up pile draft with strict rotation.
///
/// The active seat takes exactly one pile in full; every pile then gains
/// one card from the pool. Done when the pool and all piles are empty.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WinchesterState {
    seats: usize,
    pool: Vec<CardId>,
    piles: Vec<Vec<CardId>>,
    round: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WinchesterSync {
    pub piles: Vec<Vec<CardId>>,
    pub round: usize,
    pub current_actor: Option<Seat>,
    pub remaining: usize,
}

impl WinchesterState {
    pub fn new(mut pool: Vec<CardId>, seats: usize, pile_count: usize, rng: &mut SmallRng) -> Self {
        pool.shuffle(rng);
        let mut state = Self {
            seats,
            pool,
            piles: vec![Vec::new(); pile_count.max(1)],
            round: 0,
        };
        state.refill();
        state
    }
    fn refill(&mut self) {
        for pile in self.piles.iter_mut() {
            pile.extend(self.pool.pop());
        }
    }
    pub fn is_complete(&self) -> bool {
        self.pool.is_empty() && self.piles.iter().all(Vec::is_empty)
    }
    pub fn current_actor(&self) -> Option<Seat> {
        if self.is_complete() {
            None
        } else {
            Some(self.round % self.seats)
        }
    }
    pub fn piles(&self) -> &[Vec<CardId>] {
        &self.piles
    }
    pub fn take_stack(&mut self, seat: Seat, pile: usize) -> Result<Outcome, DraftError> {
        if self.is_complete() {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        if pile >= self.piles.len() {
            return Err(DraftError::invalid("no such pile"));
        }
        if self.piles[pile].is_empty() {
            return Err(DraftError::Empty);
        }
        let snapshot = self.piles.iter().flatten().map(|c| Some(*c)).collect();
        let record = LogPick::new(seat, snapshot, vec![pile]);
        let taken = std::mem::take(&mut self.piles[pile]);
        self.refill();
        self.round += 1;
        Ok(Outcome::credit(seat, taken).with_record(record).advanced())
    }
    pub fn sync(&self) -> WinchesterSync {
        WinchesterSync {
            piles: self.piles.clone(),
            round: self.round,
            current_actor: self.current_actor(),
            remaining: self.pool.len(),
        }
    }
}
