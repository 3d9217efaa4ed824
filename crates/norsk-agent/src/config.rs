//! Provider runtime configuration, read from the environment.
//!
//! Every field is optional except the defaults; which providers are usable is
//! decided later by the router's priority chain. Construction never fails —
//! an empty environment simply produces a config with no resolvable provider.
//!
//! ## Environment keys
//!
//! | Key                 | Effect                                              |
//! |---------------------|-----------------------------------------------------|
//! | `OPENAI_API_KEY`    | enables the OpenAI-compatible hosted branch         |
//! | `OPENAI_BASE_URL`   | redirects it to a compatible alternate endpoint     |
//! | `CLOUD_MODEL`       | model id override for the hosted branch             |
//! | `REASONING_API_KEY` | enables the reasoning-specialized Gemini branch     |
//! | `REASONING_MODEL`   | model id for the reasoning branch                   |
//! | `GEMINI_API_KEY`    | enables the secondary hosted (Gemini) branch        |
//! | `GEMINI_MODEL`      | model id for the secondary hosted branch            |
//! | `OLLAMA_MODEL`      | enables the local-inference branch                  |
//! | `OLLAMA_HOST`       | redirects the local-inference endpoint              |

use std::env;

/// Default model for the OpenAI-compatible branch when no override is set.
const DEFAULT_CHEAP_MODEL: &str = "gpt-4o-mini";
/// Default model for both Gemini branches.
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
/// Default host for a locally running Ollama server.
const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
/// Sampling temperature used by every client.
const DEFAULT_TEMPERATURE: f64 = 0.2;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_CLOUD_MODEL: &str = "CLOUD_MODEL";
const ENV_REASONING_API_KEY: &str = "REASONING_API_KEY";
const ENV_REASONING_MODEL: &str = "REASONING_MODEL";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";

/// Snapshot of all provider-related configuration.
///
/// Fields are public so tests (and embedders) can build configs directly
/// instead of mutating the process environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Credential for the primary OpenAI-compatible hosted provider.
    pub openai_api_key: Option<String>,
    /// Base-URL override for OpenAI-compatible endpoints (OpenRouter etc.).
    pub openai_base_url: Option<String>,
    /// Task-agnostic model override for the hosted branch.
    pub cloud_model: Option<String>,
    /// Credential for the reasoning-specialized alternate hosted provider.
    pub reasoning_api_key: Option<String>,
    /// Model id for the reasoning branch (`None` = Gemini default).
    pub reasoning_model: Option<String>,
    /// Credential for the secondary hosted provider (Gemini).
    pub gemini_api_key: Option<String>,
    /// Model id for the secondary hosted branch (`None` = Gemini default).
    pub gemini_model: Option<String>,
    /// Local model name; presence enables the Ollama branch.
    pub ollama_model: Option<String>,
    /// Host override for the local Ollama server.
    pub ollama_host: Option<String>,
}

impl ProviderConfig {
    /// Read the full snapshot from the process environment.
    ///
    /// Empty values are treated the same as unset keys.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: read(ENV_OPENAI_API_KEY),
            openai_base_url: read(ENV_OPENAI_BASE_URL),
            cloud_model: read(ENV_CLOUD_MODEL),
            reasoning_api_key: read(ENV_REASONING_API_KEY),
            reasoning_model: read(ENV_REASONING_MODEL),
            gemini_api_key: read(ENV_GEMINI_API_KEY),
            gemini_model: read(ENV_GEMINI_MODEL),
            ollama_model: read(ENV_OLLAMA_MODEL),
            ollama_host: read(ENV_OLLAMA_HOST),
        }
    }

    /// Model id for the OpenAI-compatible branch: override or cheap default.
    pub fn hosted_model(&self) -> &str {
        self.cloud_model.as_deref().unwrap_or(DEFAULT_CHEAP_MODEL)
    }

    pub fn reasoning_model(&self) -> &str {
        self.reasoning_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn gemini_model(&self) -> &str {
        self.gemini_model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    pub fn ollama_host(&self) -> &str {
        self.ollama_host.as_deref().unwrap_or(DEFAULT_OLLAMA_HOST)
    }

    /// Shared sampling temperature.
    pub fn temperature(&self) -> f64 {
        DEFAULT_TEMPERATURE
    }
}

fn read(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let cfg = ProviderConfig::default();
        assert_eq!(cfg.hosted_model(), "gpt-4o-mini");
        assert_eq!(cfg.gemini_model(), "gemini-1.5-pro");
        assert_eq!(cfg.ollama_host(), "http://localhost:11434");
    }

    #[test]
    fn cloud_model_override_wins() {
        let cfg = ProviderConfig {
            cloud_model: Some("gpt-4o".into()),
            ..ProviderConfig::default()
        };
        assert_eq!(cfg.hosted_model(), "gpt-4o");
    }
}
