use super::DraftError;
use super::LogPick;
use super::Outcome;
use super::neg_mod;
use df_cards::CardId;
use df_core::Seat;
use std::collections::VecDeque;

/// Shared-pack draft: one pack is face-up at a time and seats take
/// turns picking from it in snake order, the starting seat rotating
/// with the pack number. The next pack is dealt when the current one
/// is spent.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RochesterState {
    seats: usize,
    picks_per_round: usize,
    packs: VecDeque<Vec<CardId>>,
    pack_count: usize,
    pick_number: usize,
    pack_number: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct RochesterSync {
    pub pack: Vec<CardId>,
    pub pack_number: usize,
    pub pick_number: usize,
    pub packs_remaining: usize,
    pub current_actor: Option<Seat>,
}

impl RochesterState {
    pub fn new(packs: Vec<Vec<CardId>>, seats: usize, picks_per_round: usize) -> Self {
        let packs: VecDeque<_> = packs.into_iter().collect();
        Self {
            seats,
            picks_per_round: picks_per_round.max(1),
            pack_count: packs.len(),
            packs,
            pick_number: 0,
            pack_number: 0,
        }
    }
    pub fn is_complete(&self) -> bool {
        self.packs.is_empty()
    }
    /// Snake order with a rotated start per pack. The arithmetic is
    /// preserved exactly; its fairness over many packs is not obvious
    /// from first principles.
    pub fn current_actor(&self) -> Option<Seat> {
        if self.is_complete() {
            return None;
        }
        let starting_direction = (self.pack_number / self.seats) % 2 == 1;
        let direction = (self.pick_number / self.seats) % 2 == 1;
        let offset = if direction {
            self.seats - 1 - (self.pick_number % self.seats)
        } else {
            self.pick_number % self.seats
        };
        let sign: i64 = if starting_direction { 1 } else { -1 };
        Some(neg_mod(
            self.pack_number as i64 + sign * offset as i64,
            self.seats,
        ))
    }
    /// Front-of-pack indices for a forced pick.
    pub fn auto_indices(&self) -> Vec<usize> {
        let len = self.packs.front().map(Vec::len).unwrap_or(0);
        (0..self.picks_per_round.min(len)).collect()
    }
    pub fn pick_indices(&mut self, seat: Seat, indices: &[usize]) -> Result<Outcome, DraftError> {
        if self.is_complete() {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        let pack = &self.packs[0];
        let take = self.picks_per_round.min(pack.len());
        if indices.is_empty() || indices.len() > take {
            return Err(DraftError::invalid("wrong number of picked indices"));
        }
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        if sorted.iter().any(|i| *i >= pack.len()) {
            return Err(DraftError::invalid("card index out of bounds"));
        }
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(DraftError::invalid("duplicate card index"));
        }
        let record = LogPick::new(
            seat,
            pack.iter().map(|c| Some(*c)).collect(),
            indices.to_vec(),
        );
        let taken: Vec<CardId> = indices.iter().map(|i| pack[*i]).collect();
        let pack = &mut self.packs[0];
        for i in sorted.iter().rev() {
            pack.remove(*i);
        }
        let mut outcome = Outcome::credit(seat, taken).with_record(record);
        if self.packs[0].is_empty() {
            self.packs.pop_front();
            self.pick_number = 0;
            self.pack_number += 1;
            outcome = outcome.advanced();
        } else {
            self.pick_number += 1;
        }
        Ok(outcome)
    }
    pub fn sync(&self) -> RochesterSync {
        RochesterSync {
            pack: self.packs.front().cloned().unwrap_or_default(),
            pack_number: self.pack_number,
            pick_number: self.pick_number,
            packs_remaining: self.packs.len(),
            current_actor: self.current_actor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packs(count: usize, size: usize) -> Vec<Vec<CardId>> {
        (0..count)
            .map(|_| (0..size).map(|_| CardId::default()).collect())
            .collect()
    }

    #[test]
    fn snake_order_within_a_pack() {
        let state = RochesterState::new(packs(1, 8), 4, 1);
        let mut probe = state.clone();
        let mut actors = Vec::new();
        for pick in 0..8 {
            probe.pick_number = pick;
            actors.push(probe.current_actor().unwrap());
        }
        // Pack 0 starts at seat 0, snakes back after a full pass.
        assert_eq!(actors, vec![0, 3, 2, 1, 1, 2, 3, 0]);
    }
    #[test]
    fn start_rotates_with_pack_number() {
        let state = RochesterState::new(packs(2, 4), 4, 1);
        let mut probe = state.clone();
        probe.pack_number = 1;
        probe.pick_number = 0;
        assert_eq!(probe.current_actor(), Some(1));
    }
    #[test]
    fn spent_pack_deals_the_next() {
        let mut state = RochesterState::new(packs(2, 2), 2, 1);
        state.pick_indices(0, &[0]).unwrap();
        let seat = state.current_actor().unwrap();
        let outcome = state.pick_indices(seat, &[0]).unwrap();
        assert!(outcome.advanced);
        assert_eq!(state.sync().pack.len(), 2);
        assert_eq!(state.sync().pack_number, 1);
    }
    #[test]
    fn multi_pick_bounded_by_configuration() {
        let mut state = RochesterState::new(packs(1, 6), 2, 2);
        assert!(matches!(
            state.pick_indices(0, &[0, 1, 2]),
            Err(DraftError::InvalidAction { .. })
        ));
        let outcome = state.pick_indices(0, &[4, 1]).unwrap();
        assert_eq!(outcome.credited[0].1.len(), 2);
        assert_eq!(state.sync().pack.len(), 4);
    }
}
