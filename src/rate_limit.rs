//! Rate limiter + conversation logger (C10, §4.10, §5).
//!
//! Grounded on `original_source/database/ai_service.py::check_rate_limit`
//! for the exact message text and reset-date semantics, and on the
//! teacher's `server::sync::SYNC_ROSTER_MTX: Mutex<()>` for per-key
//! serialization - generalized here to one lock per user id so that two
//! concurrent requests from the *same* user cannot both pass the
//! "< limit" check (§5), while requests from different users never
//! contend with each other.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Utc};

use crate::config::{AiMode, AiSettings};
use crate::model::{ConversationRecord, User, UserRole};
use crate::repository::{Repository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDeniedKind {
    /// §4.10 `mode == off`. §7: never logged as a would-be AI call.
    AiDisabled,
    /// §4.10 daily/per-window cap reached.
    RateLimited,
}

#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub message: String,
    pub kind: RateLimitDeniedKind,
}

impl fmt::Display for RateLimitDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RateLimitDenied {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitAllowance {
    /// `-1` means unlimited (§4.10 `mode == unlimited`).
    pub remaining: i64,
}

type UserLocks = Mutex<HashMap<String, Arc<Mutex<()>>>>;

fn user_locks() -> &'static UserLocks {
    static LOCKS: OnceLock<UserLocks> = OnceLock::new();
    LOCKS.get_or_init(|| Mutex::new(HashMap::new()))
}

fn lock_for_user(user_id: &str) -> Arc<Mutex<()>> {
    let mut locks = user_locks().lock().expect("user lock registry poisoned");
    locks.entry(user_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
}

/// `checkRateLimit(user)` (§4.10), evaluated against an already-loaded
/// [User] and the current [AiSettings]. Pure: does not mutate or persist
/// anything. Callers that need atomicity across concurrent requests from
/// the same user should go through [check_and_record] instead.
pub fn check_rate_limit(settings: &AiSettings, user: &User, now: DateTime<Utc>) -> Result<RateLimitAllowance, RateLimitDenied> {
    match settings.mode {
        AiMode::Off => {
            return Err(RateLimitDenied {
                message: "AI features are currently disabled.".to_string(),
                kind: RateLimitDeniedKind::AiDisabled,
            });
        }
        AiMode::Unlimited => {
            return Ok(RateLimitAllowance { remaining: -1 });
        }
        AiMode::On => {}
    }

    let mut rate_state = user.rate_state.clone();
    rate_state.reset_if_stale(now.date_naive());

    let limit = match user.role {
        UserRole::Admin => settings.daily_limit_admin,
        UserRole::Member => user.ai_daily_limit.unwrap_or(settings.daily_limit_free),
    };

    if rate_state.ai_requests_today >= limit {
        return Err(RateLimitDenied {
            message: format!("Daily limit reached ({limit} requests). Resets at midnight UTC."),
            kind: RateLimitDeniedKind::RateLimited,
        });
    }

    if settings.cooldown_seconds > 0 {
        if let Some(last) = rate_state.last_ai_request_at {
            let elapsed = now.signed_duration_since(last).num_seconds();
            if elapsed < settings.cooldown_seconds {
                let wait = settings.cooldown_seconds - elapsed;
                return Err(RateLimitDenied {
                    message: format!("Please wait {wait} seconds before your next request."),
                    kind: RateLimitDeniedKind::RateLimited,
                });
            }
        }
    }

    Ok(RateLimitAllowance { remaining: (limit as i64) - (rate_state.ai_requests_today as i64) })
}

/// `recordRequest(user)` (§4.10): increment the counter and persist via the
/// repository. Callers that already hold the per-user lock (i.e. went
/// through [check_and_record]) may call this directly; anything else should
/// prefer [check_and_record] to avoid a check/record race.
pub fn record_request(repository: &dyn Repository, user: &mut User, now: DateTime<Utc>) -> Result<(), RepositoryError> {
    user.rate_state.reset_if_stale(now.date_naive());
    user.rate_state.ai_requests_today += 1;
    user.rate_state.last_ai_request_at = Some(now);
    repository.update_rate_state(&user.id, &user.rate_state)
}

#[derive(Debug)]
pub enum RateLimitError {
    Denied(RateLimitDenied),
    Repository(RepositoryError),
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::Denied(d) => write!(f, "{d}"),
            RateLimitError::Repository(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RateLimitError {}

/// Atomic check-and-increment (§5 "Across concurrent requests from the same
/// user, rate-limit check-and-increment MUST be atomic"): acquires a
/// per-user lock, re-reads the user from the repository, checks, and - if
/// allowed - records the request before releasing the lock. Two requests
/// arriving at exactly the daily limit will have exactly one succeed.
pub fn check_and_record(
    repository: &dyn Repository,
    settings: &AiSettings,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<RateLimitAllowance, RateLimitError> {
    let lock = lock_for_user(user_id);
    let _guard = lock.lock().expect("per-user rate limit lock poisoned");

    let mut user = repository.get_user(user_id).map_err(RateLimitError::Repository)?;
    let allowance = check_rate_limit(settings, &user, now).map_err(RateLimitError::Denied)?;

    if allowance.remaining != -1 {
        record_request(repository, &mut user, now).map_err(RateLimitError::Repository)?;
    }

    Ok(allowance)
}

/// Hand-off point to the process's observability channel (§4.10
/// "surfaced to the process's observability channel"). The teacher has no
/// logging crate (`println!`/`eprintln!` only, see `server::mod::run_server_async`);
/// this hook keeps that texture while making it trivial for an embedder to
/// swap in a real logging crate without touching rate-limit control flow.
pub fn observe(event: &str) {
    eprintln!("stratadvisor: {event}");
}

/// `logConversation(...)` (§4.10): append-only, best-effort. A logging
/// failure must never fail the user-visible answer (§4.10, §5) - the
/// caller should ignore the `Err` after observing it.
pub fn log_conversation(repository: &dyn Repository, record: &ConversationRecord) -> Result<(), RepositoryError> {
    let result = repository.append_conversation(record);
    if let Err(ref err) = result {
        observe(&format!("conversation log append failed: {err}"));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRateState;
    use crate::repository::file_repository::FileRepository;
    use std::sync::Arc as StdArc;
    use std::thread;

    fn settings(mode: AiMode, daily_limit_free: u32, cooldown_seconds: i64) -> AiSettings {
        AiSettings {
            mode,
            daily_limit_free,
            daily_limit_admin: daily_limit_free * 10,
            cooldown_seconds,
            primary_provider: "anthropic".to_string(),
            primary_model: "claude".to_string(),
            fallback_provider: None,
            fallback_model: None,
        }
    }

    fn member(requests_today: u32) -> User {
        User {
            id: "u1".to_string(),
            role: UserRole::Member,
            ai_daily_limit: None,
            rate_state: UserRateState { ai_requests_today: requests_today, last_ai_request_at: None, ai_request_reset_at: Utc::now().date_naive() },
        }
    }

    #[test]
    fn off_mode_denies_with_disabled_message() {
        let result = check_rate_limit(&settings(AiMode::Off, 10, 0), &member(0), Utc::now());
        assert_eq!(result.unwrap_err().message, "AI features are currently disabled.");
    }

    #[test]
    fn unlimited_mode_allows_with_remaining_negative_one() {
        let result = check_rate_limit(&settings(AiMode::Unlimited, 1, 0), &member(999), Utc::now()).unwrap();
        assert_eq!(result.remaining, -1);
    }

    #[test]
    fn daily_limit_reached_denies_with_exact_message() {
        let result = check_rate_limit(&settings(AiMode::On, 3, 0), &member(3), Utc::now());
        assert_eq!(result.unwrap_err().message, "Daily limit reached (3 requests). Resets at midnight UTC.");
    }

    #[test]
    fn zero_cooldown_with_remaining_allows_immediately() {
        let result = check_rate_limit(&settings(AiMode::On, 3, 0), &member(2), Utc::now()).unwrap();
        assert_eq!(result.remaining, 1);
    }

    #[test]
    fn cooldown_denies_with_wait_message() {
        let mut user = member(0);
        user.rate_state.last_ai_request_at = Some(Utc::now());
        let result = check_rate_limit(&settings(AiMode::On, 10, 60), &user, Utc::now());
        assert!(result.unwrap_err().message.starts_with("Please wait"));
    }

    #[test]
    fn concurrent_requests_at_the_boundary_allow_exactly_one() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("stratadvisor_rate_limit_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let repository = StdArc::new(FileRepository::new(dir.clone()));

        let user = User {
            id: "boundary-user".to_string(),
            role: UserRole::Member,
            ai_daily_limit: None,
            rate_state: UserRateState { ai_requests_today: 2, last_ai_request_at: None, ai_request_reset_at: Utc::now().date_naive() },
        };
        repository.write_json("users", &user.id, &user).unwrap();

        let settings = StdArc::new(settings(AiMode::On, 3, 0));
        let now = Utc::now();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let repository = repository.clone();
                let settings = settings.clone();
                thread::spawn(move || check_and_record(repository.as_ref(), &settings, "boundary-user", now))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let allowed = results.iter().filter(|r| r.is_ok()).count();
        let denied = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(allowed, 1);
        assert_eq!(denied, 1);

        let final_user = repository.get_user("boundary-user").unwrap();
        assert_eq!(final_user.rate_state.ai_requests_today, 3);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
