//! Per-user AI rate-limit state (§3 UserRateState, §4.10).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRateState {
    pub ai_requests_today: u32,
    #[serde(default)]
    pub last_ai_request_at: Option<DateTime<Utc>>,
    pub ai_request_reset_at: NaiveDate,
}

impl UserRateState {
    pub fn new(today: NaiveDate) -> UserRateState {
        UserRateState {
            ai_requests_today: 0,
            last_ai_request_at: None,
            ai_request_reset_at: today,
        }
    }

    /// §3 invariant: if `today` is after `ai_request_reset_at`, reset the
    /// counter before any check.
    pub fn reset_if_stale(&mut self, today: NaiveDate) {
        if today > self.ai_request_reset_at {
            self.ai_requests_today = 0;
            self.ai_request_reset_at = today;
        }
    }
}
