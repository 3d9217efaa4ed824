//! Error taxonomy for the provider and agent layers.
//!
//! Three tiers, matching the propagation policy:
//!
//! | Error            | Retried | Propagates |
//! |------------------|---------|------------|
//! | `ConfigError`    | no      | immediately to the caller |
//! | `ProviderError`  | yes (bounded) | after retries are exhausted |
//! | parse failures   | —       | never — absorbed by the score normalizer |
//!
//! The retry policy treats every `ProviderError` as retriable. Transient
//! network faults, rate limits and transiently malformed responses are not
//! distinguishable without per-provider error taxonomies, so the bound on
//! attempts is the only safeguard.

use thiserror::Error;

/// A provider call failed at the transport or API level.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (connect, DNS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The provider answered 200 but the payload did not match its own
    /// documented shape (missing choices/candidates, non-JSON body).
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// No provider could be resolved from configuration. Fatal, never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no LLM provider configured; set one of OPENAI_API_KEY, GEMINI_API_KEY, \
         REASONING_API_KEY or OLLAMA_MODEL"
    )]
    NoProvider,
}

/// Agent-facing error surface: everything an agent call can fail with.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_provider_message_names_the_env_keys() {
        let msg = ConfigError::NoProvider.to_string();
        assert!(msg.contains("OPENAI_API_KEY"));
        assert!(msg.contains("OLLAMA_MODEL"));
    }

    #[test]
    fn agent_error_wraps_provider_error_transparently() {
        let inner = ProviderError::Api {
            status: 429,
            body: "rate limited".into(),
        };
        let outer: AgentError = inner.into();
        assert_eq!(outer.to_string(), "provider returned HTTP 429: rate limited");
    }
}
