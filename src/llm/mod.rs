//! LLM adapter (C11, §4.11): a uniform request/response shape over whatever
//! provider SDK a deployment wires in. The core only ever sees [LlmClient];
//! concrete OpenAI/Anthropic SDKs are external collaborators (§1 Non-goals).
//!
//! Grounded on the teacher's capability-injection shape (`DataRegistry`
//! passed in rather than reached for globally, per DESIGN §9 "Global mutable
//! singletons" -> "Model as a constructed `Advisor` with injected
//! `Repository`, `LLMClient`, and `AISettingsProvider`").

pub mod errors;
pub mod prompt;

use std::time::Duration;

pub use errors::LlmError;

#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub max_tokens: u32,
    /// Bounded by a caller-provided deadline; default 30s (§5).
    pub deadline: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub provider: String,
    pub model: String,
}

/// Capability the core consumes (§6 "LLM capability"). Synchronous from the
/// core's perspective; a real implementation may run an async client
/// underneath and block on it, the way `server::routes` offloads heavy work
/// to `spawn_blocking` for the teacher's optimizer.
pub trait LlmClient: Send + Sync {
    fn chat(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;
}

/// Provider selection policy (§4.11: "chooses a provider based on the
/// current AI config; when configured as 'auto' it tries the primary, then
/// the fallback").
pub struct FallbackLlmClient<P, F> {
    primary: P,
    fallback: Option<F>,
}

impl<P: LlmClient, F: LlmClient> FallbackLlmClient<P, F> {
    pub fn new(primary: P, fallback: Option<F>) -> FallbackLlmClient<P, F> {
        FallbackLlmClient { primary, fallback }
    }
}

impl<P: LlmClient, F: LlmClient> LlmClient for FallbackLlmClient<P, F> {
    fn chat(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        match self.primary.chat(request) {
            Ok(response) => Ok(response),
            Err(primary_err) => match &self.fallback {
                Some(fallback) => fallback.chat(request),
                None => Err(primary_err),
            },
        }
    }
}

/// Placeholder client for a deployment that has not wired a real provider
/// SDK yet (§1: "The LLM provider SDKs themselves ... are external
/// collaborators. The core sees a single `LLMClient` capability."). Always
/// denies with [LlmError::ConfigError], matching §7 NotConfigured. The
/// `serve`/`ask` CLI commands fall back to this until an embedder swaps in
/// an Anthropic/OpenAI-backed [LlmClient].
pub struct NotConfiguredLlmClient;

impl LlmClient for NotConfiguredLlmClient {
    fn chat(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        Err(LlmError::ConfigError("no LLM provider wired into this deployment".to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedLlmClient;
    use super::*;
    use std::time::Duration;

    fn request() -> LlmRequest {
        LlmRequest {
            system_prompt: "sys".to_string(),
            user_message: "hi".to_string(),
            max_tokens: 100,
            deadline: Duration::from_secs(30),
        }
    }

    fn response(provider: &str) -> LlmResponse {
        LlmResponse {
            text: "answer".to_string(),
            tokens_in: 10,
            tokens_out: 20,
            provider: provider.to_string(),
            model: "test-model".to_string(),
        }
    }

    #[test]
    fn fallback_client_tries_primary_first() {
        let primary = ScriptedLlmClient::new(vec![Ok(response("primary"))]);
        let fallback = ScriptedLlmClient::new(vec![Ok(response("fallback"))]);
        let client = FallbackLlmClient::new(primary, Some(fallback));
        let result = client.chat(&request()).unwrap();
        assert_eq!(result.provider, "primary");
    }

    #[test]
    fn fallback_client_falls_back_on_primary_error() {
        let primary = ScriptedLlmClient::new(vec![]);
        let fallback = ScriptedLlmClient::new(vec![Ok(response("fallback"))]);
        let client = FallbackLlmClient::new(primary, Some(fallback));
        let result = client.chat(&request()).unwrap();
        assert_eq!(result.provider, "fallback");
    }

    #[test]
    fn no_fallback_configured_surfaces_primary_error() {
        let primary: ScriptedLlmClient = ScriptedLlmClient::new(vec![]);
        let client = FallbackLlmClient::<_, ScriptedLlmClient>::new(primary, None);
        assert!(client.chat(&request()).is_err());
    }
}
