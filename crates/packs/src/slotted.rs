use df_cards::CardPool;
use df_cards::Catalog;
use df_cards::Rarity;
use df_core::Unique;

/// Per-rarity card pools, the input to pack generation.
#[derive(Debug, Clone, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SlottedPool {
    common: CardPool,
    uncommon: CardPool,
    rare: CardPool,
    mythic: CardPool,
    special: CardPool,
}

impl SlottedPool {
    pub fn slot(&self, rarity: Rarity) -> &CardPool {
        match rarity {
            Rarity::Common => &self.common,
            Rarity::Uncommon => &self.uncommon,
            Rarity::Rare => &self.rare,
            Rarity::Mythic => &self.mythic,
            Rarity::Special => &self.special,
        }
    }
    pub fn slot_mut(&mut self, rarity: Rarity) -> &mut CardPool {
        match rarity {
            Rarity::Common => &mut self.common,
            Rarity::Uncommon => &mut self.uncommon,
            Rarity::Rare => &mut self.rare,
            Rarity::Mythic => &mut self.mythic,
            Rarity::Special => &mut self.special,
        }
    }
    pub fn total(&self) -> u64 {
        Rarity::ALL.iter().map(|r| self.slot(*r).total()).sum()
    }
    /// Builds pools from every card of a set, `copies` of each.
    pub fn from_set(catalog: &Catalog, set: &str, copies: u32) -> Self {
        let mut pools = Self::default();
        for card in catalog.set(set) {
            pools.slot_mut(card.rarity()).add(card.id(), copies);
        }
        pools
    }
    /// Builds pools over the whole catalog, `copies` of each card.
    pub fn from_catalog(catalog: &Catalog, copies: u32) -> Self {
        let mut pools = Self::default();
        for card in catalog.cards() {
            pools.slot_mut(card.rarity()).add(card.id(), copies);
        }
        pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use df_cards::Card;
    use df_cards::CardId;
    use df_cards::ColorSet;

    #[test]
    fn from_set_slots_by_rarity() {
        let mk = |rarity| {
            Card::new(
                CardId::default(),
                "x",
                "tst",
                "1",
                rarity,
                ColorSet::default(),
                "Creature",
                vec![],
            )
        };
        let catalog: Catalog = [mk(Rarity::Common), mk(Rarity::Common), mk(Rarity::Mythic)]
            .into_iter()
            .collect();
        let pools = SlottedPool::from_set(&catalog, "tst", 4);
        assert_eq!(pools.slot(Rarity::Common).total(), 8);
        assert_eq!(pools.slot(Rarity::Mythic).total(), 4);
        assert_eq!(pools.slot(Rarity::Rare).total(), 0);
        assert_eq!(pools.total(), 12);
    }
}
