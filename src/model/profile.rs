//! Player profile record (§3 Profile).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingProfile {
    F2p,
    Minnow,
    Dolphin,
    Orca,
    Whale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceRole {
    RallyLead,
    Filler,
    Farmer,
    Casual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Priorities {
    pub svs: u8,
    pub rally: u8,
    pub castle: u8,
    pub exploration: u8,
    pub gathering: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub server_age_days: u32,
    pub furnace_level: u32,
    #[serde(default)]
    pub furnace_fc_level: Option<String>,
    pub spending_profile: SpendingProfile,
    pub alliance_role: AllianceRole,
    pub priorities: Priorities,
    #[serde(default)]
    pub is_farm_account: bool,
    #[serde(default)]
    pub linked_main_profile_id: Option<String>,
}
