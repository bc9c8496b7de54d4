//! Lineup recommendation record (§3 LineupRecommendation, §4.5).

use serde::{Deserialize, Serialize};

use crate::model::hero_catalog::HeroClass;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TroopRatio {
    pub infantry: u8,
    pub lancer: u8,
    pub marksman: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedSlot {
    /// `Some(name)` when a hero (owned or, for the general lineup, any
    /// catalog hero) was assigned; `None` for a placeholder slot.
    pub hero: Option<String>,
    pub hero_class: HeroClass,
    pub slot_role: String,
    pub role: String,
    pub is_lead: bool,
    pub power: i64,
    /// Human-readable status: `"Lv<n>"` / `"Gen <n>"` for a filled slot,
    /// `"Need <Class>"` for a placeholder.
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupRecommendation {
    pub mode: String,
    pub slots: Vec<AssignedSlot>,
    pub troop_ratio: TroopRatio,
    pub notes: String,
    pub confidence: Confidence,
    /// Up to 4 entries (§4.5 step 4).
    pub recommended_to_get: Vec<String>,
}

/// Joiner recommendation (§4.5, separate entry point).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinerRecommendation {
    pub hero: Option<String>,
    pub skill_level: Option<u8>,
    pub max_skill: u8,
    pub recommendation: Option<String>,
    pub action: String,
    pub critical_note: Option<String>,
}
