//! Chief gear record (§3 ChiefGear). Six slots, each a tier ordinal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl GearTier {
    pub fn ordinal(self) -> u8 {
        match self {
            GearTier::Common => 1,
            GearTier::Uncommon => 2,
            GearTier::Rare => 3,
            GearTier::Epic => 4,
            GearTier::Legendary => 5,
            GearTier::Mythic => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChiefGearSlotKind {
    Ring,
    Amulet,
    Helmet,
    Armor,
    Gloves,
    Boots,
}

/// Fixed priority order used by the gear advisor (§4.4).
pub const CHIEF_GEAR_PRIORITY_ORDER: [ChiefGearSlotKind; 6] = [
    ChiefGearSlotKind::Ring,
    ChiefGearSlotKind::Amulet,
    ChiefGearSlotKind::Gloves,
    ChiefGearSlotKind::Boots,
    ChiefGearSlotKind::Helmet,
    ChiefGearSlotKind::Armor,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChiefGearSlot {
    pub quality: GearTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChiefGear {
    pub ring: ChiefGearSlot,
    pub amulet: ChiefGearSlot,
    pub helmet: ChiefGearSlot,
    pub armor: ChiefGearSlot,
    pub gloves: ChiefGearSlot,
    pub boots: ChiefGearSlot,
}

impl ChiefGear {
    pub fn slot(&self, kind: ChiefGearSlotKind) -> ChiefGearSlot {
        match kind {
            ChiefGearSlotKind::Ring => self.ring,
            ChiefGearSlotKind::Amulet => self.amulet,
            ChiefGearSlotKind::Helmet => self.helmet,
            ChiefGearSlotKind::Armor => self.armor,
            ChiefGearSlotKind::Gloves => self.gloves,
            ChiefGearSlotKind::Boots => self.boots,
        }
    }
}

impl ChiefGearSlotKind {
    pub fn label(self) -> &'static str {
        match self {
            ChiefGearSlotKind::Ring => "Ring",
            ChiefGearSlotKind::Amulet => "Amulet",
            ChiefGearSlotKind::Helmet => "Helmet",
            ChiefGearSlotKind::Armor => "Armor",
            ChiefGearSlotKind::Gloves => "Gloves",
            ChiefGearSlotKind::Boots => "Boots",
        }
    }
}
