use df_cards::Card;

/// Card predicate used by structural pack rules.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum CardFilter {
    LegendaryCreature,
    DoubleFaced,
    Planeswalker,
    /// Bonus-sheet membership: the card belongs to another set slotted
    /// into this one's packs.
    FromSet(String),
}

impl CardFilter {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            CardFilter::LegendaryCreature => card.is_legendary_creature(),
            CardFilter::DoubleFaced => card.is_double_faced(),
            CardFilter::Planeswalker => card.is_planeswalker(),
            CardFilter::FromSet(code) => card.set() == code,
        }
    }
}

/// How many matching cards a pack must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Quota {
    AtLeast(usize),
    Exactly(usize),
}

/// A per-set structural constraint on pack contents beyond rarity counts.
/// Enforced after rarity slotting by swapping non-conforming cards for
/// conforming ones of the same rarity.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Collation {
    pub filter: CardFilter,
    pub quota: Quota,
}

impl Collation {
    pub fn at_least(filter: CardFilter, count: usize) -> Self {
        Self {
            filter,
            quota: Quota::AtLeast(count),
        }
    }
    pub fn exactly(filter: CardFilter, count: usize) -> Self {
        Self {
            filter,
            quota: Quota::Exactly(count),
        }
    }
}

/// Built-in collation table keyed by set code.
pub fn collations_for(set: &str) -> Vec<Collation> {
    match set {
        // At least one legendary creature per pack.
        "dom" => vec![Collation::at_least(CardFilter::LegendaryCreature, 1)],
        // Exactly one modal double-faced card per pack.
        "znr" => vec![Collation::exactly(CardFilter::DoubleFaced, 1)],
        // Exactly one planeswalker per pack.
        "war" => vec![Collation::exactly(CardFilter::Planeswalker, 1)],
        // Exactly one bonus-sheet card per pack.
        "tsr" => vec![Collation::exactly(CardFilter::FromSet("tsb".into()), 1)],
        "stx" => vec![Collation::exactly(CardFilter::FromSet("sta".into()), 1)],
        // Two legends per pack, any rarity mix.
        "cmr" => vec![Collation::at_least(CardFilter::LegendaryCreature, 2)],
        _ => vec![],
    }
}
