use super::DraftError;
use super::LogPick;
use super::Outcome;
use df_cards::CardId;
use df_core::Seat;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Which half of a Solomon round is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolomonStep {
    Dividing,
    Picking,
}

/// Two-seat divide-and-choose draft. Each round the divider splits the
/// dealt cards into two piles (reorganizing as often as they like, then
/// confirming); the other seat takes one pile and the divider keeps the
/// rest. The divider role alternates per round.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SolomonState {
    cards_per_round: usize,
    rounds: usize,
    pool: Vec<CardId>,
    round_number: usize,
    step: SolomonStep,
    piles: [Vec<CardId>; 2],
    done: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SolomonSync {
    pub piles: [Vec<CardId>; 2],
    pub step: SolomonStep,
    pub round_number: usize,
    pub rounds: usize,
    pub current_actor: Option<Seat>,
}

impl SolomonState {
    pub fn new(mut pool: Vec<CardId>, cards_per_round: usize, rounds: usize, rng: &mut SmallRng) -> Self {
        pool.shuffle(rng);
        pool.truncate(cards_per_round * rounds);
        let mut state = Self {
            cards_per_round,
            rounds,
            pool,
            round_number: 0,
            step: SolomonStep::Dividing,
            piles: [Vec::new(), Vec::new()],
            done: false,
        };
        state.deal();
        state
    }
    fn deal(&mut self) {
        if self.round_number >= self.rounds || self.pool.len() < self.cards_per_round {
            self.done = true;
            return;
        }
        self.piles = [self.pool.drain(..self.cards_per_round).collect(), Vec::new()];
        self.step = SolomonStep::Dividing;
    }
    pub fn is_complete(&self) -> bool {
        self.done
    }
    pub fn step(&self) -> SolomonStep {
        self.step
    }
    pub fn piles(&self) -> &[Vec<CardId>; 2] {
        &self.piles
    }
    fn divider(&self) -> Seat {
        self.round_number % 2
    }
    pub fn current_actor(&self) -> Option<Seat> {
        if self.done {
            return None;
        }
        Some(match self.step {
            SolomonStep::Dividing => self.divider(),
            SolomonStep::Picking => 1 - self.divider(),
        })
    }
    /// Reorganize the round's cards: `first` indexes into the combined
    /// pile contents (pile 0 then pile 1) and names the new first pile.
    pub fn divide(&mut self, seat: Seat, first: &[usize]) -> Result<Outcome, DraftError> {
        if self.done {
            return Err(DraftError::NotDrafting);
        }
        if self.step != SolomonStep::Dividing {
            return Err(DraftError::invalid("piles are already confirmed"));
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        let all: Vec<CardId> = self.piles.iter().flatten().copied().collect();
        let mut sorted: Vec<usize> = first.to_vec();
        sorted.sort_unstable();
        if sorted.iter().any(|i| *i >= all.len()) {
            return Err(DraftError::invalid("pile index out of bounds"));
        }
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(DraftError::invalid("duplicate pile index"));
        }
        let (first_pile, second_pile): (Vec<_>, Vec<_>) = all
            .iter()
            .enumerate()
            .partition(|(i, _)| sorted.binary_search(i).is_ok());
        self.piles = [
            first_pile.into_iter().map(|(_, c)| *c).collect(),
            second_pile.into_iter().map(|(_, c)| *c).collect(),
        ];
        Ok(Outcome::default())
    }
    /// Lock the piles; the other seat now chooses.
    pub fn confirm(&mut self, seat: Seat) -> Result<Outcome, DraftError> {
        if self.done {
            return Err(DraftError::NotDrafting);
        }
        if self.step != SolomonStep::Dividing {
            return Err(DraftError::invalid("piles are already confirmed"));
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        if self.piles.iter().any(Vec::is_empty) {
            return Err(DraftError::invalid("both piles must be non-empty"));
        }
        self.step = SolomonStep::Picking;
        Ok(Outcome::default())
    }
    /// The non-divider takes one pile; the divider receives the other.
    pub fn choose_pile(&mut self, seat: Seat, pile: usize) -> Result<Outcome, DraftError> {
        if self.done {
            return Err(DraftError::NotDrafting);
        }
        if self.step != SolomonStep::Picking {
            return Err(DraftError::invalid("piles are not confirmed yet"));
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        if pile >= 2 {
            return Err(DraftError::invalid("pile must be 0 or 1"));
        }
        let divider = self.divider();
        let chosen = std::mem::take(&mut self.piles[pile]);
        let rest = std::mem::take(&mut self.piles[1 - pile]);
        let snapshot = chosen
            .iter()
            .chain(rest.iter())
            .map(|c| Some(*c))
            .collect();
        let record = LogPick::new(seat, snapshot, vec![pile]);
        self.round_number += 1;
        self.deal();
        Ok(Outcome {
            credited: vec![(seat, chosen), (divider, rest)],
            record: Some(record),
            advanced: true,
        })
    }
    pub fn sync(&self) -> SolomonSync {
        SolomonSync {
            piles: self.piles.clone(),
            step: self.step,
            round_number: self.round_number,
            rounds: self.rounds,
            current_actor: self.current_actor(),
        }
    }
}
