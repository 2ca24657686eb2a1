use super::DraftError;
use super::LogPick;
use super::Outcome;
use df_cards::CardId;
use df_core::Seat;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Two-seat pile draft with strict alternation.
///
/// The pool is shuffled once at construction; drawing from the back of
/// the vector is the random draw, so the whole draft replays from the
/// seed. The active seat inspects piles left to right: taking one ends
/// the turn and re-seeds that pile from the pool, skipping grows the
/// pile by one, and skipping the last pile draws a single blind card and
/// passes the turn regardless.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WinstonState {
    pool: Vec<CardId>,
    piles: Vec<Vec<CardId>>,
    current_pile: usize,
    round: usize,
    done: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct WinstonSync {
    pub piles: Vec<Vec<CardId>>,
    pub current_pile: usize,
    pub round: usize,
    pub current_actor: Option<Seat>,
    pub remaining: usize,
}

impl WinstonState {
    pub fn new(mut pool: Vec<CardId>, pile_count: usize, rng: &mut SmallRng) -> Self {
        pool.shuffle(rng);
        let mut piles = vec![Vec::new(); pile_count.max(1)];
        if pool.len() >= piles.len() {
            for pile in piles.iter_mut() {
                pile.extend(pool.pop());
            }
        }
        let mut state = Self {
            pool,
            piles,
            current_pile: 0,
            round: 0,
            done: false,
        };
        state.settle();
        state
    }
    pub fn is_complete(&self) -> bool {
        self.done
    }
    pub fn current_actor(&self) -> Option<Seat> {
        if self.done { None } else { Some(self.round % 2) }
    }
    pub fn current_pile(&self) -> usize {
        self.current_pile
    }
    pub fn piles(&self) -> &[Vec<CardId>] {
        &self.piles
    }
    /// Start of a turn: point at the first non-empty pile, or finish the
    /// draft when every pile is spent.
    fn settle(&mut self) {
        self.current_pile = 0;
        while self.current_pile < self.piles.len() && self.piles[self.current_pile].is_empty() {
            self.current_pile += 1;
        }
        if self.current_pile >= self.piles.len() {
            self.done = true;
        }
    }
    fn next_turn(&mut self) {
        self.round += 1;
        self.settle();
    }
    fn snapshot(&self) -> Vec<Option<CardId>> {
        self.piles.iter().flatten().map(|c| Some(*c)).collect()
    }
    pub fn take_pile(&mut self, seat: Seat) -> Result<Outcome, DraftError> {
        if self.done {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        let record = LogPick::new(seat, self.snapshot(), vec![self.current_pile]);
        let taken = std::mem::take(&mut self.piles[self.current_pile]);
        self.piles[self.current_pile].extend(self.pool.pop());
        self.next_turn();
        Ok(Outcome::credit(seat, taken).with_record(record).advanced())
    }
    pub fn skip_pile(&mut self, seat: Seat) -> Result<Outcome, DraftError> {
        if self.done {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        // No pool and nothing after this pile: the pile must be taken.
        let last = self.piles.len() - 1;
        if self.pool.is_empty() && self.piles[self.current_pile + 1..].iter().all(Vec::is_empty) {
            return Err(DraftError::invalid("no other choice, this pile must be taken"));
        }
        loop {
            // Grow the skipped pile, keeping one card back for the blind
            // draw if this is the last pile.
            if self.pool.len() > 1 || (self.current_pile < last && !self.pool.is_empty()) {
                if let Some(card) = self.pool.pop() {
                    self.piles[self.current_pile].push(card);
                }
            }
            if self.current_pile == last {
                // Skipped every pile: blind draw and pass the turn.
                let record = LogPick::new(seat, self.snapshot(), vec![]);
                let drawn: Vec<CardId> = self.pool.pop().into_iter().collect();
                self.next_turn();
                return Ok(Outcome::credit(seat, drawn).with_record(record).advanced());
            }
            self.current_pile += 1;
            if !self.piles[self.current_pile].is_empty() {
                return Ok(Outcome::default());
            }
        }
    }
    pub fn sync(&self) -> WinstonSync {
        WinstonSync {
            piles: self.piles.clone(),
            current_pile: self.current_pile,
            round: self.round,
            current_actor: self.current_actor(),
            remaining: self.pool.len(),
        }
    }
}
