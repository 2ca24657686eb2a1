use df_cards::CardId;
use std::collections::BTreeSet;

/// One generated pack: an ordered card list plus which indices are foil.
///
/// Packs are owned by exactly one draft state machine at a time and are
/// consumed (shrunk or nulled) as picks occur.
#[derive(Debug, Clone, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Pack {
    pub cards: Vec<CardId>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub foils: BTreeSet<usize>,
}

impl Pack {
    pub fn new(cards: Vec<CardId>) -> Self {
        Self {
            cards,
            foils: BTreeSet::new(),
        }
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn is_foil(&self, index: usize) -> bool {
        self.foils.contains(&index)
    }
    /// Removes the cards at `indices` (duplicates ignored) and returns
    /// them in the order given. Foil indices are shifted to keep pointing
    /// at the same physical cards.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<CardId> {
        let taken: Vec<CardId> = indices.iter().map(|i| self.cards[*i]).collect();
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for i in sorted.iter().rev() {
            self.cards.remove(*i);
        }
        self.foils = self
            .foils
            .iter()
            .filter(|f| !sorted.contains(f))
            .map(|f| f - sorted.iter().filter(|i| *i < f).count())
            .collect();
        taken
    }
}

impl From<Vec<CardId>> for Pack {
    fn from(cards: Vec<CardId>) -> Self {
        Self::new(cards)
    }
}

impl IntoIterator for Pack {
    type Item = CardId;
    type IntoIter = std::vec::IntoIter<CardId>;
    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
