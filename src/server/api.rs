//! Payload functions: parse a request body, call into the core, serialize a
//! response. Grounded on the teacher's `server/api.rs` split between thin
//! `routes.rs` wiring and the actual logic living here, e.g.
//! `optimize_payload(registry, body) -> Result<String, OptimizePayloadError>`.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::advisor::{self, AdvisorDeps};
use crate::config::AiSettings;
use crate::lineup_builder;
use crate::llm::LlmClient;
use crate::orchestrator;
use crate::repository::{Repository, RepositoryError};

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Repository(RepositoryError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Parse(e) => write!(f, "{e}"),
            ApiError::Repository(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> ApiError {
        ApiError::Repository(err)
    }
}

/// `GET /api/health` (ambient ops surface, SPEC_FULL §3).
pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "stratadvisor-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/catalog/version` (ambient ops surface, SPEC_FULL §3): reports
/// catalog load status without exposing the full hero/template tables.
pub fn catalog_version_payload(catalog: &crate::catalog::Catalog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "hero_count": catalog.hero_count(),
        "template_count": catalog.template_count(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<crate::model::Recommendation>,
}

/// `POST /api/recommend` (C8 `recommend`).
pub fn recommend_payload(
    catalog: &crate::catalog::Catalog,
    repository: &dyn Repository,
    body: &str,
) -> Result<String, ApiError> {
    let request: RecommendRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let profile = repository.get_profile(&request.user_id)?;
    let owned = repository.get_owned_heroes(&request.user_id)?;
    let chief_gear = repository.get_chief_gear(&request.user_id)?;

    let recommendations = orchestrator::recommend(catalog, &profile, &owned, chief_gear.as_ref(), request.limit);
    serde_json::to_string_pretty(&RecommendResponse { recommendations }).map_err(ApiError::Parse)
}

#[derive(Debug, Deserialize)]
pub struct LineupRequest {
    pub user_id: String,
    pub mode: String,
    /// Personalized (owned roster) by default; `false` returns the
    /// general catalog-wide lineup (§4.5 "general, non-personalized
    /// lineup" variant).
    #[serde(default = "default_true")]
    pub personalized: bool,
}

fn default_true() -> bool {
    true
}

/// `POST /api/lineup` (C5 `buildLineup`).
pub fn lineup_payload(
    catalog: &crate::catalog::Catalog,
    repository: &dyn Repository,
    body: &str,
) -> Result<String, ApiError> {
    let request: LineupRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let profile = repository.get_profile(&request.user_id)?;
    let max_generation = crate::scorer::current_generation(profile.server_age_days);

    let lineup = if request.personalized {
        let owned = repository.get_owned_heroes(&request.user_id)?;
        lineup_builder::build_lineup(catalog, &request.mode, &owned, max_generation)
    } else {
        lineup_builder::build_general_lineup(catalog, &request.mode, max_generation)
    };

    serde_json::to_string_pretty(&lineup).map_err(ApiError::Parse)
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub user_id: String,
    pub question: String,
    #[serde(default)]
    pub force_ai: bool,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: String,
    pub recommendations: Vec<crate::model::Recommendation>,
    pub lineup: Option<crate::model::LineupRecommendation>,
    pub joiner: Option<crate::model::JoinerRecommendation>,
}

/// `POST /api/ask` (C9 `ask`).
pub fn ask_payload(
    catalog: &crate::catalog::Catalog,
    repository: &dyn Repository,
    llm: &dyn LlmClient,
    ai_settings: &AiSettings,
    body: &str,
) -> Result<String, ApiError> {
    let request: AskRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
    let profile = repository.get_profile(&request.user_id)?;
    let owned = repository.get_owned_heroes(&request.user_id)?;
    let chief_gear = repository.get_chief_gear(&request.user_id)?;

    let deps = AdvisorDeps { catalog, repository, llm, ai_settings };
    let thread_id = request.thread_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let answer = advisor::ask(
        &deps,
        &request.user_id,
        &profile,
        &owned,
        chief_gear.as_ref(),
        &request.question,
        request.force_ai,
        &thread_id,
        Utc::now(),
    );

    serde_json::to_string_pretty(&AskResponse {
        answer: answer.answer,
        source: answer.source,
        recommendations: answer.recommendations,
        lineup: answer.lineup,
        joiner: answer.joiner,
    })
    .map_err(ApiError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AllianceRole, Priorities, Profile, SpendingProfile, User, UserRateState, UserRole};
    use crate::repository::file_repository::FileRepository;
    use std::collections::HashMap;

    fn temp_repo(label: &str) -> FileRepository {
        let mut dir = std::env::temp_dir();
        dir.push(format!("stratadvisor_api_test_{label}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        FileRepository::new(dir)
    }

    fn seed_profile(repository: &FileRepository, user_id: &str) {
        let profile = Profile {
            server_age_days: 100,
            furnace_level: 15,
            furnace_fc_level: None,
            spending_profile: SpendingProfile::F2p,
            alliance_role: AllianceRole::Filler,
            priorities: Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
            is_farm_account: false,
            linked_main_profile_id: None,
        };
        repository.write_json("profiles", user_id, &profile).unwrap();
        let user = User {
            id: user_id.to_string(),
            role: UserRole::Member,
            ai_daily_limit: None,
            rate_state: UserRateState::new(Utc::now().date_naive()),
        };
        repository.write_json("users", user_id, &user).unwrap();
    }

    fn empty_catalog() -> crate::catalog::Catalog {
        crate::catalog::Catalog::for_tests(Vec::new(), HashMap::new())
    }

    #[test]
    fn recommend_payload_parses_request_and_returns_recommendations() {
        let repo = temp_repo("recommend");
        seed_profile(&repo, "u1");
        let catalog = empty_catalog();

        let body = serde_json::json!({ "user_id": "u1", "limit": 5 }).to_string();
        let response = recommend_payload(&catalog, &repo, &body).unwrap();
        assert!(response.contains("\"recommendations\""));
    }

    #[test]
    fn lineup_payload_reports_unknown_mode() {
        let repo = temp_repo("lineup");
        seed_profile(&repo, "u2");
        let catalog = empty_catalog();

        let body = serde_json::json!({ "user_id": "u2", "mode": "nonexistent" }).to_string();
        let response = lineup_payload(&catalog, &repo, &body).unwrap();
        assert!(response.contains("Unknown mode"));
    }

    #[test]
    fn malformed_body_surfaces_parse_error() {
        let repo = temp_repo("malformed");
        let catalog = empty_catalog();
        let result = recommend_payload(&catalog, &repo, "not json");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
