//! Owned hero record (§3 OwnedHero). Mutated by unrelated CRUD paths; the
//! advisory engine only ever reads these.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GearSlot {
    /// 0..6
    pub quality: u8,
    /// 0..100
    pub level: u8,
    #[serde(default)]
    pub mastery: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedHero {
    pub name: String,
    /// 1..80
    pub level: u8,
    /// 0..5
    pub stars: u8,
    /// 0..5
    pub ascension: u8,
    /// Three expedition skills, each 1..5. Index 0 is the top-right skill
    /// that matters for rally joiners (GLOSSARY: "Joiner vs. leader").
    pub expedition_skill_levels: [u8; 3],
    /// Three exploration skills, each 1..5.
    pub exploration_skill_levels: [u8; 3],
    /// Weapon, armor, helmet, boots (fixed order).
    pub gear: [GearSlot; 4],
    #[serde(default)]
    pub mythic_gear: Option<serde_json::Value>,
}

impl OwnedHero {
    pub fn expedition_skill_1(&self) -> u8 {
        self.expedition_skill_levels[0]
    }
}
