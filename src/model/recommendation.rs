//! Recommendation record (§3 Recommendation).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hero,
    Gear,
    Progression,
    Lineup,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rules,
    Ai,
    Hybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1 (do first) .. 5 (low).
    pub priority: u8,
    pub action: String,
    pub category: Category,
    #[serde(default)]
    pub hero: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub resources: Option<String>,
    #[serde(default)]
    pub relevance_tags: BTreeSet<String>,
    pub source: Source,
    /// Stable id used by dedupe and logging (DESIGN §9: "use the id for
    /// deduplication, not the action string" — the orchestrator (§4.8)
    /// still dedupes on `action` per spec.md, but `rule_id` is what
    /// downstream logging keys off of).
    pub rule_id: String,
}

impl Recommendation {
    pub fn new(
        rule_id: &str,
        priority: u8,
        action: impl Into<String>,
        category: Category,
        source: Source,
    ) -> Recommendation {
        Recommendation {
            priority,
            action: action.into(),
            category,
            hero: None,
            reason: None,
            resources: None,
            relevance_tags: BTreeSet::new(),
            source,
            rule_id: rule_id.to_string(),
        }
    }

    pub fn with_hero(mut self, hero: impl Into<String>) -> Recommendation {
        self.hero = Some(hero.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Recommendation {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_resources(mut self, resources: impl Into<String>) -> Recommendation {
        self.resources = Some(resources.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Recommendation {
        self.relevance_tags.insert(tag.into());
        self
    }
}
