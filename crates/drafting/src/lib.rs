//! Draft state machine family.
//!
//! Ten draft protocols live behind the single [`DraftState`] tagged union,
//! dispatched exhaustively so adding or auditing a variant is a
//! compiler-checked exercise. The shared contract:
//!
//! - [`DraftState::current_actor`] — whose turn it is, `None` for
//!   simultaneous variants;
//! - [`DraftState::apply`] — validate and apply a [`DraftAction`],
//!   returning the [`Outcome`] (credited cards, log record, round
//!   advancement) or a typed [`DraftError`]. A failed apply never
//!   mutates; callers wanting atomicity clone first and swap on success;
//! - [`DraftState::is_complete`];
//! - [`DraftState::sync`] — the per-seat snapshot served on
//!   (re)connection, private information filtered.
//!
//! All shuffling happens at construction from a caller-provided seeded
//! rng, so a draft replays identically from its recorded seed.

mod action;
mod booster;
mod error;
mod grid;
mod housman;
mod minesweeper;
mod outcome;
mod rochester;
mod rotisserie;
mod solomon;
mod state;
mod team_sealed;
mod winchester;
mod winston;

pub use action::*;
pub use booster::*;
pub use error::*;
pub use grid::*;
pub use housman::*;
pub use minesweeper::*;
pub use outcome::*;
pub use rochester::*;
pub use rotisserie::*;
pub use solomon::*;
pub use state::*;
pub use team_sealed::*;
pub use winchester::*;
pub use winston::*;

/// Euclidean remainder, for seat arithmetic that can go negative.
pub(crate) fn neg_mod(x: i64, m: usize) -> usize {
    x.rem_euclid(m as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn neg_mod_wraps_negatives() {
        assert_eq!(neg_mod(-1, 4), 3);
        assert_eq!(neg_mod(-5, 4), 3);
        assert_eq!(neg_mod(7, 4), 3);
        assert_eq!(neg_mod(0, 4), 0);
    }
}
