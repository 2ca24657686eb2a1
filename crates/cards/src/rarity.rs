/// Pack rarity slot.
///
/// `Special` covers bonus-sheet style cards that sit outside the normal
/// common/uncommon/rare/mythic distribution (e.g. timeshifted reprints).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
    Special,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythic,
        Rarity::Special,
    ];
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "common"),
            Rarity::Uncommon => write!(f, "uncommon"),
            Rarity::Rare => write!(f, "rare"),
            Rarity::Mythic => write!(f, "mythic"),
            Rarity::Special => write!(f, "special"),
        }
    }
}

impl std::str::FromStr for Rarity {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "mythic" => Ok(Rarity::Mythic),
            "special" => Ok(Rarity::Special),
            _ => Err(anyhow::anyhow!("unknown rarity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parse_display_roundtrip() {
        for r in Rarity::ALL {
            assert_eq!(r, r.to_string().parse().unwrap());
        }
    }
}
