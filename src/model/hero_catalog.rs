//! Hero catalog record (§3 HeroCatalog). Loaded once at startup by
//! [crate::catalog], immutable afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroClass {
    Infantry,
    Lancer,
    Marksman,
    /// Sentinel for a hero missing from the catalog (§3 invariant).
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    D,
    C,
    B,
    A,
    S,
    #[serde(rename = "S+")]
    SPlus,
}

impl Tier {
    /// Ordinal used by [crate::scorer::power] (§4.2): S+ -> 6 .. D -> 1.
    pub fn ordinal(self) -> i64 {
        match self {
            Tier::SPlus => 6,
            Tier::S => 5,
            Tier::A => 4,
            Tier::B => 3,
            Tier::C => 2,
            Tier::D => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroEntry {
    pub name: String,
    pub generation: u32,
    pub class: HeroClass,
    pub rarity: String,
    pub tier_overall: Tier,
    pub tier_expedition: Tier,
    pub tier_exploration: Tier,
}

impl HeroEntry {
    /// Sentinel used when a hero name is referenced but absent from the
    /// catalog (§3: "tagged Unknown with defaults").
    pub fn unknown(name: &str) -> HeroEntry {
        HeroEntry {
            name: name.to_string(),
            generation: 99,
            class: HeroClass::Unknown,
            rarity: "Unknown".to_string(),
            tier_overall: Tier::C,
            tier_expedition: Tier::C,
            tier_exploration: Tier::C,
        }
    }
}
