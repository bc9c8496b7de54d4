//! Request classifier (C7, §4.7): pure keyword/regex routing from a
//! free-form question to a rules/AI decision and a category.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Rules,
    Ai,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Lineup,
    JoinerHeroes,
    Upgrade,
    Skills,
    Invest,
    Gear,
    Phase,
    Progression,
    Priority,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub category: QuestionCategory,
    pub confidence: f64,
}

/// Keywords that resolve a question straight to a named lineup mode; this
/// is always handled by rules (§4.9 step 3: lineup/joiner_heroes -> C5).
const LINEUP_KEYWORDS: [&str; 12] = [
    "bear trap",
    "crazy joe",
    "garrison",
    "reinforce",
    "rally leader",
    "lead the rally",
    "lineup",
    "formation",
    "team comp",
    "svs march",
    "field march",
    "exploration team",
];

const JOINER_KEYWORDS: [&str; 5] = ["join", "joiner", "joining", "rally join", "send troops"];

const GEAR_KEYWORDS: [&str; 7] = ["gear", "ring", "amulet", "helmet", "armor", "gloves", "boots"];

const SKILL_KEYWORDS: [&str; 4] = ["skill", "expedition skill", "exploration skill", "stand of arms"];

const INVEST_KEYWORDS: [&str; 4] = ["worth it", "should i invest", "worth spending", "invest in"];

const UPGRADE_KEYWORDS: [&str; 3] = ["upgrade", "level up", "ascend"];

const PHASE_KEYWORDS: [&str; 6] = ["furnace", "fc", "stuck", "what's next", "whats next", "phase"];

const PROGRESSION_KEYWORDS: [&str; 3] = ["progression", "milestone", "next step"];

const PRIORITY_KEYWORDS: [&str; 3] = ["priorit", "focus on", "what first"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Stable, side-effect-free classification over a lowercased question.
pub fn classify(question: &str) -> Classification {
    let lowered = question.to_lowercase();

    if contains_any(&lowered, &JOINER_KEYWORDS) && !contains_any(&lowered, &LINEUP_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::JoinerHeroes, confidence: 0.9 };
    }
    if contains_any(&lowered, &LINEUP_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::Lineup, confidence: 0.9 };
    }
    if contains_any(&lowered, &GEAR_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::Gear, confidence: 0.85 };
    }
    if contains_any(&lowered, &SKILL_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::Skills, confidence: 0.8 };
    }
    if contains_any(&lowered, &INVEST_KEYWORDS) {
        return Classification { request_type: RequestType::Hybrid, category: QuestionCategory::Invest, confidence: 0.6 };
    }
    if contains_any(&lowered, &UPGRADE_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::Upgrade, confidence: 0.8 };
    }
    if contains_any(&lowered, &PHASE_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::Phase, confidence: 0.75 };
    }
    if contains_any(&lowered, &PROGRESSION_KEYWORDS) {
        return Classification { request_type: RequestType::Rules, category: QuestionCategory::Progression, confidence: 0.75 };
    }
    if contains_any(&lowered, &PRIORITY_KEYWORDS) {
        return Classification { request_type: RequestType::Hybrid, category: QuestionCategory::Priority, confidence: 0.5 };
    }

    Classification { request_type: RequestType::Hybrid, category: QuestionCategory::Other, confidence: 0.2 }
}

/// Whether a hybrid result should additionally be enhanced with an AI
/// answer. A tunable policy, not a correctness contract: open-ended
/// phrasing and low-confidence categories lean toward "yes".
pub fn needs_ai_fallback(result: &Classification, question: &str) -> bool {
    if result.request_type != RequestType::Hybrid {
        return false;
    }
    if result.category == QuestionCategory::Other {
        return true;
    }
    let lowered = question.to_lowercase();
    result.confidence < 0.6 || contains_any(&lowered, &["why", "explain", "compare", " vs ", "should i"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifying_twice_is_idempotent() {
        let question = "What hero for bear trap?";
        assert_eq!(classify(question).category, classify(question).category);
        assert_eq!(classify(question).request_type, classify(question).request_type);
    }

    #[test]
    fn bear_trap_question_routes_to_lineup_rules() {
        let result = classify("what hero for bear trap?");
        assert_eq!(result.category, QuestionCategory::Lineup);
        assert_eq!(result.request_type, RequestType::Rules);
    }

    #[test]
    fn join_rally_question_without_a_mode_name_routes_to_joiner_heroes() {
        let result = classify("who should I send when joining a rally?");
        assert_eq!(result.category, QuestionCategory::JoinerHeroes);
    }

    #[test]
    fn gear_question_routes_to_gear_rules() {
        let result = classify("should I upgrade my ring first?");
        assert_eq!(result.category, QuestionCategory::Gear);
    }

    #[test]
    fn open_ended_question_is_hybrid_other_and_needs_ai_fallback() {
        let result = classify("how is everyone doing today?");
        assert_eq!(result.category, QuestionCategory::Other);
        assert_eq!(result.request_type, RequestType::Hybrid);
        assert!(needs_ai_fallback(&result, "how is everyone doing today?"));
    }

    #[test]
    fn rules_type_never_needs_ai_fallback() {
        let result = classify("what hero for bear trap?");
        assert!(!needs_ai_fallback(&result, "what hero for bear trap?"));
    }
}
