//! Lineup template record (§3 LineupTemplateCatalog).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::hero_catalog::HeroClass;
use crate::model::lineup::TroopRatio;

/// Sentinel marking a filler slot: `preferred == ["any"]`.
pub const FILLER_SENTINEL: &str = "any";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Required unit class, or `None` for "any" slots.
    pub class: Option<HeroClass>,
    pub role: String,
    #[serde(default)]
    pub is_lead: bool,
    pub preferred: Vec<String>,
}

impl Slot {
    pub fn is_filler(&self) -> bool {
        self.preferred.len() == 1 && self.preferred[0].eq_ignore_ascii_case(FILLER_SENTINEL)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupTemplate {
    pub name: String,
    pub slots: Vec<Slot>,
    pub troop_ratio: TroopRatio,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub key_heroes: Vec<String>,
    #[serde(default)]
    pub hero_explanations: HashMap<String, String>,
    #[serde(default)]
    pub ratio_explanation: Option<String>,
    #[serde(default)]
    pub joiner_warning: Option<String>,
    #[serde(default)]
    pub sustain_heroes: Vec<String>,
}
