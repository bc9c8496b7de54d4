//! AI configuration surface (§6 AISettings), loaded from environment
//! variables. Grounded on the teacher's `data_registry.rs::use_lcars_officer_source`
//! (`std::env::var` + `unwrap_or` default) and `server/sync.rs`'s
//! `KOBAYASHI_SYNC_TOKEN` lookup.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    Off,
    On,
    Unlimited,
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiMode::Off => write!(f, "off"),
            AiMode::On => write!(f, "on"),
            AiMode::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// `AISettings` (§6): consulted at startup and re-read before every
/// rate-limit check (§5 "a cached `AISettings` value which is refreshed on
/// each rate-limit check").
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub mode: AiMode,
    pub daily_limit_free: u32,
    pub daily_limit_admin: u32,
    pub cooldown_seconds: i64,
    pub primary_provider: String,
    pub primary_model: String,
    pub fallback_provider: Option<String>,
    pub fallback_model: Option<String>,
}

impl Default for AiSettings {
    fn default() -> AiSettings {
        AiSettings {
            mode: AiMode::On,
            daily_limit_free: 10,
            daily_limit_admin: 100,
            cooldown_seconds: 5,
            primary_provider: "anthropic".to_string(),
            primary_model: "claude".to_string(),
            fallback_provider: None,
            fallback_model: None,
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_var(key).and_then(|v| v.parse().ok())
}

impl AiSettings {
    /// Read every `STRATADVISOR_AI_*` variable, falling back to
    /// [`AiSettings::default`] for anything unset or unparseable.
    pub fn from_env() -> AiSettings {
        let defaults = AiSettings::default();
        AiSettings {
            mode: match env_var("STRATADVISOR_AI_MODE").as_deref() {
                Some("off") => AiMode::Off,
                Some("unlimited") => AiMode::Unlimited,
                Some("on") => AiMode::On,
                _ => defaults.mode,
            },
            daily_limit_free: env_parse("STRATADVISOR_AI_DAILY_LIMIT_FREE").unwrap_or(defaults.daily_limit_free),
            daily_limit_admin: env_parse("STRATADVISOR_AI_DAILY_LIMIT_ADMIN").unwrap_or(defaults.daily_limit_admin),
            cooldown_seconds: env_parse("STRATADVISOR_AI_COOLDOWN_SECONDS").unwrap_or(defaults.cooldown_seconds),
            primary_provider: env_var("STRATADVISOR_AI_PRIMARY_PROVIDER").unwrap_or(defaults.primary_provider),
            primary_model: env_var("STRATADVISOR_AI_PRIMARY_MODEL").unwrap_or(defaults.primary_model),
            fallback_provider: env_var("STRATADVISOR_AI_FALLBACK_PROVIDER"),
            fallback_model: env_var("STRATADVISOR_AI_FALLBACK_MODEL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_permissive_but_bounded() {
        let settings = AiSettings::default();
        assert_eq!(settings.mode, AiMode::On);
        assert!(settings.daily_limit_free > 0);
        assert!(settings.daily_limit_admin >= settings.daily_limit_free);
    }
}
