//! User record (§6 `GetUser`): role, per-user override limit, and rate state.

use serde::{Deserialize, Serialize};

use crate::model::rate_state::UserRateState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: UserRole,
    /// Per-user override of the daily free limit; falls back to
    /// `AISettings::daily_limit_free` when absent (§4.10).
    #[serde(default)]
    pub ai_daily_limit: Option<u32>,
    pub rate_state: UserRateState,
}
