//! Pack generation for draft sessions.
//!
//! A [`PackGenerator`] consumes per-rarity [`CardPool`](df_cards::CardPool)s
//! (or fixed custom lists) and produces fixed-size [`Pack`]s honoring the
//! global rarity distribution and per-set structural [`Collation`] rules.
//!
//! ## Pipeline
//!
//! 1. custom-pack override per pack slot
//! 2. rarity slots with mythic promotion, drawn without replacement
//! 3. post-hoc collation correction keyed by set code
//! 4. optional color balance among commons
//! 5. optional foil slot re-drawn from a foil-eligible pool
//! 6. per-rarity duplicate caps enforced by redraw

mod collation;
mod generator;
mod pack;
mod slotted;

pub use collation::*;
pub use generator::*;
pub use pack::*;
pub use slotted::*;
