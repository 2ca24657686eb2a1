use super::Card;
use super::CardId;
use super::Rarity;
use df_core::Unique;
use std::collections::HashMap;

/// Process-wide card lookup. Read-only after load.
#[derive(Debug, Clone, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    cards: HashMap<CardId, Card>,
}

impl Catalog {
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }
    /// All cards of a set, in no particular order.
    pub fn set(&self, code: &str) -> impl Iterator<Item = &Card> {
        self.cards.values().filter(move |c| c.set() == code)
    }
    /// All cards of a set and rarity.
    pub fn set_by_rarity(&self, code: &str, rarity: Rarity) -> impl Iterator<Item = &Card> {
        self.set(code).filter(move |c| c.rarity() == rarity)
    }
    /// Loads a catalog from a JSON array of card objects.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Ok(Self::from_iter(cards))
    }
}

impl FromIterator<Card> for Catalog {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().map(|c| (c.id(), c)).collect(),
        }
    }
}
