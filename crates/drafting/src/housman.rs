use super::DraftError;
use super::LogPick;
use super::Outcome;
use df_cards::CardId;
use df_core::Seat;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Hand-exchange draft: each seat holds a private hand, a shared row of
/// cards lies revealed, and the active seat swaps one hand card for one
/// revealed card. After the configured number of exchanges the round
/// ends, every seat keeps (is credited) their hand, and fresh hands and
/// reveals are dealt from the pool.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HousmanState {
    seats: usize,
    hand_size: usize,
    revealed_count: usize,
    exchanges_per_seat: usize,
    rounds: usize,
    exchange_number: usize,
    round_number: usize,
    pool: Vec<CardId>,
    revealed: Vec<CardId>,
    hands: Vec<Vec<CardId>>,
    done: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct HousmanSync {
    pub hand: Vec<CardId>,
    pub revealed: Vec<CardId>,
    pub round_number: usize,
    pub rounds: usize,
    pub exchange_number: usize,
    pub exchanges_per_seat: usize,
    pub current_actor: Option<Seat>,
}

impl HousmanState {
    pub fn new(
        mut pool: Vec<CardId>,
        seats: usize,
        hand_size: usize,
        revealed_count: usize,
        exchanges_per_seat: usize,
        rounds: usize,
        rng: &mut SmallRng,
    ) -> Self {
        pool.shuffle(rng);
        pool.truncate(rounds * (hand_size * seats + revealed_count));
        let mut state = Self {
            seats,
            hand_size,
            revealed_count,
            exchanges_per_seat: exchanges_per_seat.max(1),
            rounds,
            exchange_number: 0,
            round_number: 0,
            pool,
            revealed: Vec::new(),
            hands: vec![Vec::new(); seats],
            done: false,
        };
        state.deal();
        state
    }
    /// Deal hands and the revealed row for the current round.
    fn deal(&mut self) {
        let need = self.seats * self.hand_size + self.revealed_count;
        if self.pool.len() < need {
            self.done = true;
            return;
        }
        let mut drawn: Vec<CardId> = self.pool.drain(..need).collect();
        for hand in self.hands.iter_mut() {
            *hand = drawn.drain(..self.hand_size).collect();
        }
        self.revealed = drawn;
    }
    pub fn is_complete(&self) -> bool {
        self.done
    }
    pub fn current_actor(&self) -> Option<Seat> {
        if self.done {
            None
        } else {
            Some((self.round_number + self.exchange_number) % self.seats)
        }
    }
    pub fn hand(&self, seat: Seat) -> &[CardId] {
        &self.hands[seat]
    }
    pub fn exchange(&mut self, seat: Seat, hand: usize, revealed: usize) -> Result<Outcome, DraftError> {
        if self.done {
            return Err(DraftError::NotDrafting);
        }
        if Some(seat) != self.current_actor() {
            return Err(DraftError::NotYourTurn);
        }
        if hand >= self.hands[seat].len() {
            return Err(DraftError::invalid("hand index out of bounds"));
        }
        if revealed >= self.revealed.len() {
            return Err(DraftError::invalid("revealed index out of bounds"));
        }
        let record = LogPick {
            seat,
            snapshot: self.revealed.iter().map(|c| Some(*c)).collect(),
            picked: vec![revealed],
            burned: vec![hand],
        };
        std::mem::swap(&mut self.hands[seat][hand], &mut self.revealed[revealed]);
        self.exchange_number += 1;
        let mut outcome = Outcome::default().with_record(record);
        if self.exchange_number >= self.exchanges_per_seat * self.seats {
            // Round over: everyone keeps their hand.
            outcome.credited = self
                .hands
                .iter()
                .enumerate()
                .map(|(s, hand)| (s, hand.clone()))
                .collect();
            outcome = outcome.advanced();
            self.round_number += 1;
            self.exchange_number = 0;
            if self.round_number >= self.rounds {
                self.done = true;
            } else {
                self.deal();
            }
        }
        Ok(outcome)
    }
    pub fn sync(&self, seat: Seat) -> HousmanSync {
        HousmanSync {
            hand: self.hands.get(seat).cloned().unwrap_or_default(),
            revealed: self.revealed.clone(),
            round_number: self.round_number,
            rounds: self.rounds,
            exchange_number: self.exchange_number,
            exchanges_per_seat: self.exchanges_per_seat,
            current_actor: self.current_actor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn state(seats: usize, rounds: usize) -> HousmanState {
        let pool: Vec<CardId> = (0..200).map(|_| CardId::default()).collect();
        let mut rng = SmallRng::seed_from_u64(7);
        HousmanState::new(pool, seats, 5, 9, 3, rounds, &mut rng)
    }

    #[test]
    fn exchange_swaps_hand_and_revealed() {
        let mut state = state(2, 2);
        let held = state.hand(0)[1];
        let offered = state.sync(0).revealed[4];
        state.exchange(0, 1, 4).unwrap();
        assert_eq!(state.hand(0)[1], offered);
        assert_eq!(state.sync(0).revealed[4], held);
    }
    #[test]
    fn round_end_credits_every_hand() {
        let mut state = state(2, 2);
        // 3 exchanges per seat x 2 seats = 6 exchanges per round.
        for i in 0..6 {
            let seat = state.current_actor().unwrap();
            let outcome = state.exchange(seat, 0, 0).unwrap();
            if i < 5 {
                assert!(outcome.credited.is_empty());
            } else {
                assert!(outcome.advanced);
                assert_eq!(outcome.credited.len(), 2);
                assert_eq!(outcome.credited[0].1.len(), 5);
            }
        }
        assert_eq!(state.sync(0).round_number, 1);
        assert!(!state.is_complete());
    }
    #[test]
    fn actor_rotates_with_round_offset() {
        let mut state = state(2, 3);
        assert_eq!(state.current_actor(), Some(0));
        state.exchange(0, 0, 0).unwrap();
        assert_eq!(state.current_actor(), Some(1));
        // Drain the round; round 1 starts with seat 1.
        for _ in 0..5 {
            let seat = state.current_actor().unwrap();
            state.exchange(seat, 0, 0).unwrap();
        }
        assert_eq!(state.current_actor(), Some(1));
    }
    #[test]
    fn completes_after_final_round() {
        let mut state = state(2, 1);
        for _ in 0..6 {
            let seat = state.current_actor().unwrap();
            state.exchange(seat, 0, 0).unwrap();
        }
        assert!(state.is_complete());
        assert_eq!(state.current_actor(), None);
    }
}
