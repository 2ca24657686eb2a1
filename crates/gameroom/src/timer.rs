use std::time::Duration;
use tokio::time::Instant;

/// Manages the per-pick deadline for a session.
///
/// The allowance decays linearly with the pick number so late picks out of
/// small packs get less time than the opening pick. A `max_timer` of zero
/// disables the timer entirely.
#[derive(Debug)]
pub struct PickTimer {
    max_timer: u32,
    cards_per_pack: usize,
    deadline: Option<Instant>,
}

impl PickTimer {
    pub fn new(max_timer: u32, cards_per_pack: usize) -> Self {
        Self {
            max_timer,
            cards_per_pack: cards_per_pack.max(1),
            deadline: None,
        }
    }
    /// Seconds allowed for the given pick number.
    pub fn allowance(&self, pick_number: usize) -> u32 {
        let decay = pick_number as u32 * (self.max_timer / self.cards_per_pack as u32);
        self.max_timer.saturating_sub(decay)
    }
    pub fn start(&mut self, pick_number: usize) {
        if self.max_timer == 0 {
            self.deadline = None;
        } else {
            let seconds = self.allowance(pick_number).max(1);
            self.deadline = Some(Instant::now() + Duration::from_secs(seconds as u64));
        }
    }
    pub fn clear(&mut self) {
        self.deadline = None;
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_starts_cleared() {
        let timer = PickTimer::new(75, 15);
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }
    #[test]
    fn allowance_decays_per_pick() {
        let timer = PickTimer::new(75, 15);
        assert_eq!(timer.allowance(0), 75);
        assert_eq!(timer.allowance(1), 70);
        assert_eq!(timer.allowance(14), 5);
        assert_eq!(timer.allowance(20), 0);
    }
    #[test]
    fn zero_max_never_arms() {
        let mut timer = PickTimer::new(0, 15);
        timer.start(0);
        assert!(timer.deadline().is_none());
    }
    #[test]
    fn exhausted_allowance_still_grants_a_second() {
        let mut timer = PickTimer::new(75, 15);
        timer.start(40);
        assert!(timer.remaining().is_some());
    }
    #[test]
    fn clear_disarms() {
        let mut timer = PickTimer::new(75, 15);
        timer.start(0);
        timer.clear();
        assert!(timer.deadline().is_none());
    }
}
