use super::DraftError;
use super::LogPick;
use super::Outcome;
use super::neg_mod;
use df_core::Score;
use df_core::Seat;
use df_packs::Pack;

/// The classic simultaneous booster draft.
///
/// The front `seats` packs are in play each round; a seat's pack index
/// rotates with the pick number, alternating direction per pack number,
/// so packs physically travel around the table. The round advances once
/// every seat has submitted, and the next batch of packs is opened when
/// the current ones are spent.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BoosterState {
    seats: usize,
    picks_per_round: usize,
    burns_per_round: usize,
    packs: Vec<Pack>,
    pack_number: usize,
    pick_number: usize,
    submitted: Vec<bool>,
}

/// Per-seat snapshot for (re)connection: only the seat's own pack is
/// served, opponents' packs stay private.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BoosterSync {
    pub pack: Option<Pack>,
    pub pack_number: usize,
    pub pick_number: usize,
    pub packs_remaining: usize,
    pub submitted: Vec<bool>,
}

impl BoosterState {
    /// `packs.len()` must be a multiple of `seats`; the generator deals
    /// packs-per-player × seats.
    pub fn new(packs: Vec<Pack>, seats: usize, picks_per_round: usize, burns_per_round: usize) -> Self {
        Self {
            seats,
            picks_per_round,
            burns_per_round,
            packs,
            pack_number: 0,
            pick_number: 0,
            submitted: vec![false; seats],
        }
    }
    pub fn seats(&self) -> usize {
        self.seats
    }
    pub fn is_complete(&self) -> bool {
        self.packs.is_empty()
    }
    pub fn pack_number(&self) -> usize {
        self.pack_number
    }
    pub fn pick_number(&self) -> usize {
        self.pick_number
    }
    pub fn has_submitted(&self, seat: Seat) -> bool {
        self.submitted.get(seat).copied().unwrap_or(false)
    }
    /// Which of the in-play packs this seat currently holds. Direction
    /// alternates with the pack number.
    fn pack_index(&self, seat: Seat) -> usize {
        let offset = if self.pack_number % 2 == 0 {
            -(self.pick_number as i64)
        } else {
            self.pick_number as i64
        };
        neg_mod(offset + seat as i64, self.seats)
    }
    /// The pack a seat is currently looking at.
    pub fn pack_for(&self, seat: Seat) -> Option<&Pack> {
        if self.is_complete() || seat >= self.seats {
            return None;
        }
        self.packs.get(self.pack_index(seat))
    }
    /// A synthesized submission for a seat that timed out or is run by
    /// a bot: indices ranked by score when available, front of the pack
    /// otherwise. Returns `(picked, burned)`.
    pub fn auto_pick(&self, seat: Seat, scores: Option<&[Score]>) -> Option<(Vec<usize>, Vec<usize>)> {
        if self.has_submitted(seat) {
            return None;
        }
        let len = self.pack_for(seat)?.len();
        let mut order: Vec<usize> = (0..len).collect();
        if let Some(scores) = scores.filter(|s| s.len() == len) {
            order.sort_by(|a, b| {
                scores[*b]
                    .partial_cmp(&scores[*a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        let picks = self.picks_per_round.min(len);
        let burns = self.burns_per_round.min(len - picks);
        let picked = order[..picks].to_vec();
        let burned = order[picks..picks + burns].to_vec();
        Some((picked, burned))
    }
    pub fn apply_pick(
        &mut self,
        seat: Seat,
        picked: &[usize],
        burned: &[usize],
    ) -> Result<Outcome, DraftError> {
        if seat >= self.seats {
            return Err(DraftError::invalid("unknown seat"));
        }
        if self.is_complete() {
            return Err(DraftError::NotDrafting);
        }
        if self.submitted[seat] {
            return Err(DraftError::AlreadySubmitted);
        }
        let index = self.pack_index(seat);
        let len = self.packs[index].len();
        if picked.len() != self.picks_per_round.min(len) {
            return Err(DraftError::invalid("wrong number of picked indices"));
        }
        if burned.len() != self.burns_per_round.min(len - picked.len()) {
            return Err(DraftError::invalid("wrong number of burned indices"));
        }
        let mut all: Vec<usize> = picked.iter().chain(burned).copied().collect();
        all.sort_unstable();
        if all.iter().any(|i| *i >= len) {
            return Err(DraftError::invalid("card index out of bounds"));
        }
        if all.windows(2).any(|w| w[0] == w[1]) {
            return Err(DraftError::invalid("duplicate card index"));
        }
        let pack = &mut self.packs[index];
        let snapshot = pack.cards.iter().map(|c| Some(*c)).collect();
        let record = LogPick {
            seat,
            snapshot,
            picked: picked.to_vec(),
            burned: burned.to_vec(),
        };
        let order: Vec<usize> = picked.iter().chain(burned).copied().collect();
        let taken = pack.remove_indices(&order);
        let kept = taken[..picked.len()].to_vec();
        self.submitted[seat] = true;
        let mut outcome = Outcome::credit(seat, kept).with_record(record);
        if self.submitted.iter().all(|s| *s) {
            self.advance_round();
            outcome = outcome.advanced();
        }
        Ok(outcome)
    }
    /// Every seat has submitted: rotate packs or open the next batch.
    fn advance_round(&mut self) {
        self.submitted = vec![false; self.seats];
        if self.packs[0].is_empty() {
            self.packs.drain(0..self.seats);
            self.pack_number += 1;
            self.pick_number = 0;
        } else {
            self.pick_number += 1;
        }
    }
    pub fn sync(&self, seat: Seat) -> BoosterSync {
        BoosterSync {
            pack: self.pack_for(seat).cloned(),
            pack_number: self.pack_number,
            pick_number: self.pick_number,
            packs_remaining: self.packs.len(),
            submitted: self.submitted.clone(),
        }
    }
}
