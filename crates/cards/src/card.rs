use super::CardId;
use super::ColorSet;
use super::Rarity;
use df_core::ID;
use df_core::Unique;

/// Immutable card attributes.
///
/// Owned by the process-wide [`Catalog`](super::Catalog) and never mutated
/// after load. Game state refers to cards by [`CardId`] only.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Card {
    id: CardId,
    name: String,
    set: String,
    collector_number: String,
    rarity: Rarity,
    #[serde(default)]
    colors: ColorSet,
    #[serde(default)]
    type_line: String,
    #[serde(default)]
    subtypes: Vec<String>,
}

impl Card {
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        set: impl Into<String>,
        collector_number: impl Into<String>,
        rarity: Rarity,
        colors: ColorSet,
        type_line: impl Into<String>,
        subtypes: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            set: set.into(),
            collector_number: collector_number.into(),
            rarity,
            colors,
            type_line: type_line.into(),
            subtypes,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn set(&self) -> &str {
        &self.set
    }
    pub fn collector_number(&self) -> &str {
        &self.collector_number
    }
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }
    pub fn colors(&self) -> ColorSet {
        self.colors
    }
    pub fn type_line(&self) -> &str {
        &self.type_line
    }
    pub fn subtypes(&self) -> &[String] {
        &self.subtypes
    }
    /// Collation predicate: legendary creature.
    pub fn is_legendary_creature(&self) -> bool {
        match self.type_line.find("Legendary") {
            Some(i) => self.type_line[i..].contains("Creature"),
            None => false,
        }
    }
    /// Collation predicate: double-faced card. Both faces share one name
    /// joined by "//".
    pub fn is_double_faced(&self) -> bool {
        self.name.contains("//")
    }
    /// Collation predicate: planeswalker.
    pub fn is_planeswalker(&self) -> bool {
        self.type_line.contains("Planeswalker")
    }
}

impl Unique for Card {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) #{}", self.name, self.set, self.collector_number)
    }
}
