//! Card representation, catalog, and counted multiset pools.
//!
//! ## Types
//!
//! - [`Card`] — Immutable card attributes (name, rarity, colors, type line)
//! - [`Rarity`] — The five pack rarity slots
//! - [`ColorSet`] — Bitset over the five colors
//! - [`Catalog`] — Process-wide read-only id → card lookup
//! - [`CardPool`] — Counted multiset with weighted and uniform draws

mod card;
mod catalog;
mod color;
mod pool;
mod rarity;

pub use card::*;
pub use catalog::*;
pub use color::*;
pub use pool::*;
pub use rarity::*;

/// Card identifier. The catalog owns the attributes; everything else
/// passes ids around.
pub type CardId = df_core::ID<Card>;
