//! Conversation record (§3 ConversationRecord). Append-only; the core never
//! edits a record once written (§3 Lifecycles).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub user_id: String,
    pub profile_snapshot: serde_json::Value,
    pub question: String,
    pub answer: String,
    pub source: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tokens_in: Option<u32>,
    #[serde(default)]
    pub tokens_out: Option<u32>,
    pub response_time_ms: u64,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ratings: Option<serde_json::Value>,
}
