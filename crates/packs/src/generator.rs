use super::CardFilter;
use super::Collation;
use super::Pack;
use super::Quota;
use super::SlottedPool;
use df_cards::CardId;
use df_cards::Catalog;
use df_cards::Color;
use df_cards::ColorSet;
use df_cards::Rarity;
use df_core::MYTHIC_RATE;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Bounded attempts when redrawing around duplicate caps or swaps.
const REDRAW_ATTEMPTS: usize = 8;

/// Cards of each rarity slot per pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Targets {
    pub common: usize,
    pub uncommon: usize,
    pub rare: usize,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            common: 10,
            uncommon: 3,
            rare: 1,
        }
    }
}

impl Targets {
    pub fn total(&self) -> usize {
        self.common + self.uncommon + self.rare
    }
}

/// Per-rarity cap on identical cards within a single pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct DuplicateCaps {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub mythic: u32,
}

impl DuplicateCaps {
    fn cap(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Mythic => self.mythic,
            Rarity::Special => u32::MAX,
        }
    }
}

/// Pack generation configuration.
#[derive(Debug, Clone)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GeneratorOptions {
    pub targets: Targets,
    pub mythic_promotion: bool,
    pub foil: bool,
    pub foil_rate: f64,
    pub color_balance: bool,
    pub duplicate_caps: Option<DuplicateCaps>,
    pub collations: Vec<Collation>,
    /// Fixed pack contents per pack slot, overriding generation entirely.
    pub custom: BTreeMap<usize, Vec<CardId>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            targets: Targets::default(),
            mythic_promotion: true,
            foil: false,
            foil_rate: df_core::FOIL_RATE,
            color_balance: false,
            duplicate_caps: None,
            collations: Vec::new(),
            custom: BTreeMap::new(),
        }
    }
}

/// Errors from pack generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A rarity sub-pool ran out of cards mid-generation.
    NotEnoughCards(Rarity),
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::NotEnoughCards(r) => write!(f, "not enough {} cards in pool", r),
        }
    }
}

impl std::error::Error for GenError {}

/// Foil rarity thresholds, mythic down to common, cumulative.
const FOIL_RARITY_RATES: [(Rarity, f64); 4] = [
    (Rarity::Mythic, 1.0 / 128.0),
    (Rarity::Rare, 1.0 / 128.0 + 7.0 / 128.0),
    (Rarity::Uncommon, 1.0 / 16.0 + 3.0 / 16.0),
    (Rarity::Common, 1.0),
];

/// Draws packs from per-rarity pools without replacement.
///
/// Randomness comes from an owned seeded rng so a session can reproduce
/// its packs from the recorded seed.
pub struct PackGenerator<'a> {
    catalog: &'a Catalog,
    pools: SlottedPool,
    options: GeneratorOptions,
    rng: SmallRng,
}

impl<'a> PackGenerator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        pools: SlottedPool,
        options: GeneratorOptions,
        seed: u64,
    ) -> Self {
        Self {
            catalog,
            pools,
            options,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
    /// Remaining pool contents after generation, for conservation checks.
    pub fn pools(&self) -> &SlottedPool {
        &self.pools
    }
    /// Generates `count` packs, consuming the pools.
    pub fn generate(&mut self, count: usize) -> Result<Vec<Pack>, GenError> {
        (0..count).map(|slot| self.generate_one(slot)).collect()
    }
    fn generate_one(&mut self, slot: usize) -> Result<Pack, GenError> {
        if let Some(cards) = self.options.custom.get(&slot) {
            return Ok(Pack::new(cards.clone()));
        }
        let mut pack = Pack::default();
        for _ in 0..self.options.targets.rare {
            let rarity = self.rare_slot_rarity();
            let card = self.draw(rarity, &pack.cards)?;
            pack.cards.push(card);
        }
        for _ in 0..self.options.targets.uncommon {
            let card = self.draw(Rarity::Uncommon, &pack.cards)?;
            pack.cards.push(card);
        }
        for _ in 0..self.options.targets.common {
            let card = self.draw(Rarity::Common, &pack.cards)?;
            pack.cards.push(card);
        }
        for rule in self.options.collations.clone() {
            self.enforce_collation(&mut pack, &rule);
        }
        if self.options.color_balance {
            self.balance_colors(&mut pack);
        }
        if self.options.foil {
            self.add_foil(&mut pack);
        }
        Ok(pack)
    }
    /// Rare slot, promoted to mythic at the configured rate.
    fn rare_slot_rarity(&mut self) -> Rarity {
        let rares = self.pools.slot(Rarity::Rare).is_empty();
        let mythics = self.pools.slot(Rarity::Mythic).is_empty();
        match (rares, mythics) {
            (true, _) => Rarity::Mythic,
            (_, true) => Rarity::Rare,
            (false, false) => {
                if self.options.mythic_promotion && self.rng.random_bool(MYTHIC_RATE) {
                    Rarity::Mythic
                } else {
                    Rarity::Rare
                }
            }
        }
    }
    /// Draws one card of a rarity, redrawing around the duplicate cap.
    fn draw(&mut self, rarity: Rarity, pack: &[CardId]) -> Result<CardId, GenError> {
        let cap = self
            .options
            .duplicate_caps
            .map(|caps| caps.cap(rarity))
            .unwrap_or(u32::MAX);
        let pool = self.pools.slot_mut(rarity);
        let mut card = pool
            .pick_uniform_across_copies(&mut self.rng)
            .map_err(|_| GenError::NotEnoughCards(rarity))?;
        for _ in 0..REDRAW_ATTEMPTS {
            let copies = pack.iter().filter(|c| **c == card).count() as u32;
            if copies < cap {
                break;
            }
            card = pool
                .pick_uniform_across_copies(&mut self.rng)
                .map_err(|_| GenError::NotEnoughCards(rarity))?;
        }
        pool.remove_one(card).expect("drawn card present");
        Ok(card)
    }
    /// Post-hoc structural correction: swap non-conforming cards for
    /// conforming ones of the same rarity until the quota holds.
    fn enforce_collation(&mut self, pack: &mut Pack, rule: &Collation) {
        let target = match rule.quota {
            Quota::AtLeast(n) | Quota::Exactly(n) => n,
        };
        while self.matching(&pack.cards, &rule.filter).len() < target {
            if !self.swap(pack, &rule.filter, true) {
                log::warn!("collation unsatisfiable: {:?}", rule);
                return;
            }
        }
        if matches!(rule.quota, Quota::Exactly(_)) {
            while self.matching(&pack.cards, &rule.filter).len() > target {
                if !self.swap(pack, &rule.filter, false) {
                    log::warn!("collation unsatisfiable: {:?}", rule);
                    return;
                }
            }
        }
    }
    /// Swaps one pack card across the filter boundary. `inward` swaps a
    /// non-conforming card out for a conforming one; outward is the
    /// reverse. Returns false if no same-rarity swap exists.
    fn swap(&mut self, pack: &mut Pack, filter: &CardFilter, inward: bool) -> bool {
        let mut victims: Vec<usize> = pack
            .cards
            .iter()
            .enumerate()
            .filter(|(i, card)| {
                !pack.foils.contains(i)
                    && self
                        .catalog
                        .get(**card)
                        .map(|c| filter.matches(c) != inward)
                        .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect();
        victims.shuffle(&mut self.rng);
        for victim in victims {
            let rarity = match self.catalog.get(pack.cards[victim]) {
                Some(card) => card.rarity(),
                None => continue,
            };
            let candidates: Vec<CardId> = self
                .pools
                .slot(rarity)
                .cards()
                .filter(|id| {
                    self.catalog
                        .get(*id)
                        .map(|c| filter.matches(c) == inward)
                        .unwrap_or(false)
                })
                .collect();
            if let Some(replacement) = candidates.choose(&mut self.rng).copied() {
                let pool = self.pools.slot_mut(rarity);
                pool.remove_one(replacement).expect("candidate present");
                pool.add(pack.cards[victim], 1);
                pack.cards[victim] = replacement;
                return true;
            }
        }
        false
    }
    fn matching(&self, cards: &[CardId], filter: &CardFilter) -> Vec<usize> {
        cards
            .iter()
            .enumerate()
            .filter(|(_, card)| {
                self.catalog
                    .get(**card)
                    .map(|c| filter.matches(c))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect()
    }
    /// Ensures at least one common of each color, swapping from
    /// color-keyed sub-pools where possible.
    fn balance_colors(&mut self, pack: &mut Pack) {
        let commons: Vec<usize> = pack
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| {
                self.catalog
                    .get(**card)
                    .map(|c| c.rarity() == Rarity::Common)
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect();
        for color in Color::ALL {
            let present = commons.iter().any(|i| {
                self.catalog
                    .get(pack.cards[*i])
                    .map(|c| c.colors().contains(color))
                    .unwrap_or(false)
            });
            if present {
                continue;
            }
            let mono: ColorSet = ColorSet::from(color);
            let candidates: Vec<CardId> = self
                .pools
                .slot(Rarity::Common)
                .cards()
                .filter(|id| {
                    self.catalog
                        .get(*id)
                        .map(|c| c.colors() == mono)
                        .unwrap_or(false)
                })
                .collect();
            let Some(replacement) = candidates.choose(&mut self.rng).copied() else {
                continue;
            };
            // Swap out a common whose colors stay represented without it.
            let victim = commons.iter().copied().find(|i| {
                let victim_colors = self
                    .catalog
                    .get(pack.cards[*i])
                    .map(|c| c.colors())
                    .unwrap_or_default();
                victim_colors.iter().all(|vc| {
                    commons
                        .iter()
                        .filter(|j| **j != *i)
                        .filter_map(|j| self.catalog.get(pack.cards[*j]))
                        .any(|c| c.colors().contains(vc))
                })
            });
            if let Some(victim) = victim {
                let pool = self.pools.slot_mut(Rarity::Common);
                pool.remove_one(replacement).expect("candidate present");
                pool.add(pack.cards[victim], 1);
                pack.cards[victim] = replacement;
            }
        }
    }
    /// Rolls the foil slot: a random common is replaced by a foil card
    /// drawn from the foil-eligible pool at foil rarity rates.
    fn add_foil(&mut self, pack: &mut Pack) {
        if !self.rng.random_bool(self.options.foil_rate) {
            return;
        }
        let roll: f64 = self.rng.random();
        let rarity = FOIL_RARITY_RATES
            .iter()
            .find(|(r, rate)| roll <= *rate && !self.pools.slot(*r).is_empty())
            .map(|(r, _)| *r);
        let Some(rarity) = rarity else { return };
        let foil = match self.pools.slot_mut(rarity).pick_uniform_across_copies(&mut self.rng) {
            Ok(card) => card,
            Err(_) => return,
        };
        let victim = pack
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| {
                self.catalog
                    .get(**card)
                    .map(|c| c.rarity() == Rarity::Common)
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .last();
        let Some(victim) = victim else { return };
        let pool = self.pools.slot_mut(rarity);
        pool.remove_one(foil).expect("foil present");
        self.pools
            .slot_mut(Rarity::Common)
            .add(pack.cards[victim], 1);
        pack.cards[victim] = foil;
        pack.foils.insert(victim);
    }
}
