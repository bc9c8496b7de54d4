//! Advisor dispatcher (C9, §4.9): the single entry point a caller (server
//! route or CLI command) goes through to turn a free-form question into an
//! answer, routing between the rule analyzers and the AI path.
//!
//! Grounded on the teacher's `server::routes::handle_optimize` control flow
//! (classify/validate input -> dispatch to the right subsystem -> one
//! response), generalized from a single optimizer call to the rules/hybrid/ai
//! branch in §4.9.

use chrono::{DateTime, Utc};

use crate::analyzers::{gear_advisor, hero_analyzer, progression};
use crate::catalog::Catalog;
use crate::classifier::{self, QuestionCategory, RequestType};
use crate::lineup_builder;
use crate::llm::{prompt, LlmClient, LlmRequest};
use crate::model::{ChiefGear, ConversationRecord, JoinerRecommendation, LineupRecommendation, OwnedHero, Profile, Recommendation};
use crate::orchestrator;
use crate::rate_limit::{self, RateLimitDeniedKind, RateLimitError};
use crate::repository::Repository;
use crate::scorer;

/// Everything `ask` needs beyond the per-request arguments. Bundled rather
/// than threaded individually, the way the teacher threads its one
/// `DataRegistry` through `server::api` handlers.
pub struct AdvisorDeps<'a> {
    pub catalog: &'a Catalog,
    pub repository: &'a dyn Repository,
    pub llm: &'a dyn LlmClient,
    pub ai_settings: &'a crate::config::AiSettings,
}

#[derive(Debug, Clone)]
pub struct AdvisorAnswer {
    pub answer: String,
    /// `"rules"` | `"ai"` | `"hybrid"` | `"error"` (§4.9, §7).
    pub source: String,
    pub recommendations: Vec<Recommendation>,
    pub lineup: Option<LineupRecommendation>,
    pub joiner: Option<JoinerRecommendation>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub tokens_in: Option<u32>,
    pub tokens_out: Option<u32>,
    /// §7 `AiDisabled`: surfaced to the caller but never appended to the
    /// conversation log, since no AI call was attempted.
    skip_log: bool,
}

impl AdvisorAnswer {
    fn rules(answer: String) -> AdvisorAnswer {
        AdvisorAnswer {
            answer,
            source: "rules".to_string(),
            recommendations: Vec::new(),
            lineup: None,
            joiner: None,
            provider: None,
            model: None,
            tokens_in: None,
            tokens_out: None,
            skip_log: false,
        }
    }

    fn error(message: String) -> AdvisorAnswer {
        AdvisorAnswer { source: "error".to_string(), ..AdvisorAnswer::rules(message) }
    }

    fn ai_disabled(message: String) -> AdvisorAnswer {
        AdvisorAnswer { skip_log: true, ..AdvisorAnswer::error(message) }
    }
}

const LINEUP_MODE_KEYWORDS: [(&str, &str); 6] = [
    ("bear trap", "bear_trap"),
    ("crazy joe", "crazy_joe"),
    ("garrison", "garrison"),
    ("reinforce", "garrison"),
    ("svs march", "svs_march"),
    ("field march", "svs_march"),
];

fn extract_mode_key(question: &str) -> Option<&'static str> {
    let lowered = question.to_lowercase();
    LINEUP_MODE_KEYWORDS.iter().find(|(needle, _)| lowered.contains(needle)).map(|(_, mode_key)| *mode_key)
}

fn is_attack_joiner_question(question: &str) -> bool {
    !question.to_lowercase().contains("defen")
}

/// `ask(profile, owned, question, forceAi, gearSnapshot)` (§4.9).
#[allow(clippy::too_many_arguments)]
pub fn ask(
    deps: &AdvisorDeps,
    user_id: &str,
    profile: &Profile,
    owned: &[OwnedHero],
    chief_gear: Option<&ChiefGear>,
    question: &str,
    force_ai: bool,
    thread_id: &str,
    now: DateTime<Utc>,
) -> AdvisorAnswer {
    let started = std::time::Instant::now();
    let cls = classifier::classify(question);

    let mut answer = if force_ai {
        None
    } else if matches!(cls.request_type, RequestType::Rules | RequestType::Hybrid) {
        Some(run_rules(deps, profile, owned, chief_gear, question, cls.category))
    } else {
        None
    };

    let needs_ai = force_ai
        || matches!(cls.request_type, RequestType::Ai)
        || (cls.request_type == RequestType::Hybrid && classifier::needs_ai_fallback(&cls, question));

    if needs_ai {
        let ai_result = run_ai(deps, user_id, profile, owned, question, now);
        answer = Some(match answer {
            Some(mut rules_answer) if cls.request_type == RequestType::Hybrid && !force_ai => {
                match ai_result {
                    Ok(ai_answer) => {
                        rules_answer.answer = format!("{}\n\n{}", rules_answer.answer, ai_answer.answer);
                        rules_answer.source = "hybrid".to_string();
                        rules_answer.provider = ai_answer.provider;
                        rules_answer.model = ai_answer.model;
                        rules_answer.tokens_in = ai_answer.tokens_in;
                        rules_answer.tokens_out = ai_answer.tokens_out;
                    }
                    Err(denied_or_failed) => {
                        rate_limit::observe(&format!("ai enhancement skipped: {}", denied_or_failed.message));
                    }
                }
                rules_answer
            }
            _ => match ai_result {
                Ok(ai_answer) => ai_answer,
                Err(err) if err.ai_disabled => AdvisorAnswer::ai_disabled(err.message),
                Err(err) => AdvisorAnswer::error(err.message),
            },
        });
    }

    let answer = answer.unwrap_or_else(|| AdvisorAnswer::error("Could not determine how to answer that question.".to_string()));

    if !answer.skip_log {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let record = ConversationRecord {
            user_id: user_id.to_string(),
            profile_snapshot: serde_json::to_value(profile).unwrap_or(serde_json::Value::Null),
            question: question.to_string(),
            answer: answer.answer.clone(),
            source: answer.source.clone(),
            provider: answer.provider.clone(),
            model: answer.model.clone(),
            tokens_in: answer.tokens_in,
            tokens_out: answer.tokens_out,
            response_time_ms: elapsed_ms,
            thread_id: thread_id.to_string(),
            created_at: now,
            ratings: None,
        };
        let _ = rate_limit::log_conversation(deps.repository, &record);
    }

    answer
}

/// §4.9 step 3: dispatch on category to the rule-based subsystems.
fn run_rules(
    deps: &AdvisorDeps,
    profile: &Profile,
    owned: &[OwnedHero],
    chief_gear: Option<&ChiefGear>,
    question: &str,
    category: QuestionCategory,
) -> AdvisorAnswer {
    let max_generation = scorer::current_generation(profile.server_age_days);

    match category {
        QuestionCategory::Lineup => {
            let mode_key = extract_mode_key(question).unwrap_or("bear_trap");
            let lineup = lineup_builder::build_lineup(deps.catalog, mode_key, owned, max_generation);
            let mut answer = AdvisorAnswer::rules(format!("Here's a {} lineup: {}", &lineup.mode, &lineup.notes));
            let joiner = question.to_lowercase().contains("join").then(|| {
                lineup_builder::joiner_recommendation(owned, is_attack_joiner_question(question))
            });
            answer.joiner = joiner;
            answer.lineup = Some(lineup);
            answer
        }
        QuestionCategory::JoinerHeroes => {
            let joiner = lineup_builder::joiner_recommendation(owned, is_attack_joiner_question(question));
            let text = joiner.recommendation.clone().unwrap_or_else(|| joiner.action.clone());
            let mut answer = AdvisorAnswer::rules(text);
            answer.joiner = Some(joiner);
            answer
        }
        QuestionCategory::Upgrade | QuestionCategory::Skills | QuestionCategory::Invest => {
            let mut recs = hero_analyzer::analyze(profile, owned, deps.catalog);
            recs.sort_by(|a, b| a.priority.cmp(&b.priority));
            recs.truncate(5);
            top_recommendations_answer(recs)
        }
        QuestionCategory::Gear => {
            let mut recs = gear_advisor::analyze(profile, chief_gear, owned);
            recs.sort_by(|a, b| a.priority.cmp(&b.priority));
            recs.truncate(5);
            top_recommendations_answer(recs)
        }
        QuestionCategory::Phase | QuestionCategory::Progression => {
            let info = progression::phase_info(profile);
            let mut text = format!("You're in {} ({}).", info.phase_name, info.phase_id);
            if let Some(first_tip) = info.focus_areas.first() {
                text.push_str(&format!(" Focus: {first_tip}."));
            }
            text.push_str(&format!(" Next milestone: {}.", info.next_milestone));
            let mut answer = AdvisorAnswer::rules(text);
            answer.recommendations = progression::analyze(profile);
            answer
        }
        QuestionCategory::Priority | QuestionCategory::Other => {
            let recs = orchestrator::recommend(deps.catalog, profile, owned, chief_gear, 5);
            top_recommendations_answer(recs)
        }
    }
}

fn top_recommendations_answer(recs: Vec<Recommendation>) -> AdvisorAnswer {
    let text = if recs.is_empty() {
        "No recommendations right now, Chief - your account looks well-balanced.".to_string()
    } else {
        recs.iter().map(|r| format!("- {}", r.action)).collect::<Vec<_>>().join("\n")
    };
    let mut answer = AdvisorAnswer::rules(text);
    answer.recommendations = recs;
    answer
}

/// Carries enough of the denial to let [ask] apply the §7 `AiDisabled`
/// logging carve-out without re-parsing the message text.
struct RunAiError {
    message: String,
    ai_disabled: bool,
}

impl From<String> for RunAiError {
    fn from(message: String) -> RunAiError {
        RunAiError { message, ai_disabled: false }
    }
}

/// §4.9 step 5: the AI path, reached directly for `cls.type == ai`, on
/// `forceAi`, or as a hybrid enhancement. Returns `Err(<user-safe message>)`
/// on rate-limit denial or provider failure, never raising.
fn run_ai(
    deps: &AdvisorDeps,
    user_id: &str,
    profile: &Profile,
    owned: &[OwnedHero],
    question: &str,
    now: DateTime<Utc>,
) -> Result<AdvisorAnswer, RunAiError> {
    match rate_limit::check_and_record(deps.repository, deps.ai_settings, user_id, now) {
        Ok(_) => {}
        Err(RateLimitError::Denied(denied)) => {
            let ai_disabled = denied.kind == RateLimitDeniedKind::AiDisabled;
            return Err(RunAiError { message: denied.message, ai_disabled });
        }
        Err(RateLimitError::Repository(err)) => {
            rate_limit::observe(&format!("rate limit repository error: {err}"));
            return Err("AI service configuration issue. Please try again later.".to_string().into());
        }
    }

    let hero_summary = owned.iter().take(10).map(|h| format!("{} (Lv{}, {}*)", h.name, h.level, h.stars)).collect::<Vec<_>>().join(", ");
    let user_message = format!(
        "Player profile: {:?} spender, furnace {}, alliance role {:?}.\nOwned heroes: {hero_summary}.\nQuestion: {question}",
        profile.spending_profile, profile.furnace_level, profile.alliance_role
    );

    let request = LlmRequest {
        system_prompt: prompt::system_prompt(),
        user_message,
        max_tokens: 600,
        deadline: std::time::Duration::from_secs(30),
    };

    match deps.llm.chat(&request) {
        Ok(response) => Ok(AdvisorAnswer {
            answer: response.text,
            source: "ai".to_string(),
            recommendations: Vec::new(),
            lineup: None,
            joiner: None,
            provider: Some(response.provider),
            model: Some(response.model),
            tokens_in: Some(response.tokens_in),
            tokens_out: Some(response.tokens_out),
            skip_log: false,
        }),
        Err(err) => {
            rate_limit::observe(&format!("llm call failed: {} ({})", err, err.kind()));
            Err(err.user_safe_message().to_string().into())
        }
    }
}
