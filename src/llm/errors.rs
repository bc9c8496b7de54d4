//! LLM adapter error taxonomy (§4.11, §7). Plain enums with manual `Display`
//! impls, matching the teacher's `server::api` error style (`OptimizePayloadError`,
//! `SimulateError`) rather than `thiserror`.

use std::fmt;

#[derive(Debug)]
pub enum LlmError {
    /// Missing credentials / no provider configured (§7 NotConfigured).
    ConfigError(String),
    /// Provider-side 429 (§7 ProviderRateLimit).
    RateLimitError(String),
    /// Network/timeout (§7 Transport).
    TransportError(String),
    /// Provider returned text that could not be parsed (§7 InvalidResponse).
    InvalidResponse(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ConfigError(msg) => write!(f, "config error: {msg}"),
            LlmError::RateLimitError(msg) => write!(f, "provider rate limit: {msg}"),
            LlmError::TransportError(msg) => write!(f, "transport error: {msg}"),
            LlmError::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Map to the user-safe message from §7. Provider text is never leaked
    /// (§4.11: "must never pass raw provider error text to the end user").
    pub fn user_safe_message(&self) -> &'static str {
        match self {
            LlmError::ConfigError(_) => "AI service configuration issue. Please try again later.",
            LlmError::RateLimitError(_) => "AI request limit reached. Please try again later.",
            LlmError::TransportError(_) => "Could not reach AI service. Please check your connection.",
            LlmError::InvalidResponse(_) => "AI returned an unexpected response format. Please try again.",
        }
    }

    /// Structured code logged alongside the conversation record (§7: "The
    /// conversation log records the error kind alongside an empty answer").
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::ConfigError(_) => "NotConfigured",
            LlmError::RateLimitError(_) => "ProviderRateLimit",
            LlmError::TransportError(_) => "Transport",
            LlmError::InvalidResponse(_) => "InvalidResponse",
        }
    }
}
