//! Provider router: a fixed priority chain of `(predicate, factory)` routes.
//!
//! The chain is evaluated fresh on every `build_client` call — no caching,
//! no persistent state. Priority order encodes a cost/quality/availability
//! preference:
//!
//! 1. reasoning credential + `Task::Reasoning` → Gemini (reasoning model)
//! 2. primary hosted credential → OpenAI-compatible (cheap-tier default)
//! 3. secondary hosted credential → Gemini
//! 4. local model name → Ollama (offline, cost-free)
//!
//! Hosted routes are handed out wrapped in [`ResilientClient`]; the local
//! route is bare. If nothing matches, `ConfigError::NoProvider` — fatal,
//! surfaced immediately, never retried.

use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ConfigError;
use crate::providers::{
    GeminiClient, LlmClient, OllamaClient, OpenAiCompatClient, ResilientClient, RetryPolicy,
};

/// Task hint passed by agents. Only ever a call parameter, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Task {
    Grammar,
    Reasoning,
    Scoring,
    General,
}

struct Route {
    name: &'static str,
    applies: fn(&ProviderConfig, Task) -> bool,
    build: fn(&ProviderConfig) -> Box<dyn LlmClient>,
    /// Hosted routes get the retry wrapper; the local route does not.
    retried: bool,
}

/// Ordered route table. Each branch is independently testable by toggling
/// which config values are present.
const ROUTES: &[Route] = &[
    Route {
        name: "reasoning-gemini",
        applies: |cfg, task| cfg.reasoning_api_key.is_some() && task == Task::Reasoning,
        build: |cfg| {
            Box::new(GeminiClient::new(
                cfg.reasoning_api_key.clone().unwrap_or_default(),
                cfg.reasoning_model(),
                cfg.temperature(),
            ))
        },
        retried: true,
    },
    Route {
        name: "openai-compat",
        applies: |cfg, _| cfg.openai_api_key.is_some(),
        build: |cfg| {
            Box::new(OpenAiCompatClient::new(
                cfg.openai_api_key.clone().unwrap_or_default(),
                cfg.hosted_model(),
                cfg.openai_base_url.as_deref(),
                cfg.temperature(),
            ))
        },
        retried: true,
    },
    Route {
        name: "gemini",
        applies: |cfg, _| cfg.gemini_api_key.is_some(),
        build: |cfg| {
            Box::new(GeminiClient::new(
                cfg.gemini_api_key.clone().unwrap_or_default(),
                cfg.gemini_model(),
                cfg.temperature(),
            ))
        },
        retried: true,
    },
    Route {
        name: "ollama",
        applies: |cfg, _| cfg.ollama_model.is_some(),
        build: |cfg| {
            Box::new(OllamaClient::new(
                cfg.ollama_model.clone().unwrap_or_default(),
                cfg.ollama_host(),
                cfg.temperature(),
            ))
        },
        retried: false,
    },
];

/// Selects one concrete client per call from the configured providers.
#[derive(Debug, Clone)]
pub struct Router {
    config: ProviderConfig,
    policy: RetryPolicy,
}

impl Router {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            policy: RetryPolicy::default(),
        }
    }

    /// Router over the process environment.
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Walk the priority chain and construct the first matching client.
    pub fn build_client(&self, task: Task) -> Result<Box<dyn LlmClient>, ConfigError> {
        for route in ROUTES {
            if (route.applies)(&self.config, task) {
                debug!(route = route.name, task = ?task, "provider selected");
                let client = (route.build)(&self.config);
                return Ok(if route.retried {
                    Box::new(ResilientClient::new(client, self.policy))
                } else {
                    client
                });
            }
        }
        Err(ConfigError::NoProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_openai() -> ProviderConfig {
        ProviderConfig {
            openai_api_key: Some("sk-test".into()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn no_provider_is_a_config_error() {
        let router = Router::new(ProviderConfig::default());
        let err = router.build_client(Task::Scoring).unwrap_err();
        assert!(matches!(err, ConfigError::NoProvider));
    }

    #[test]
    fn only_local_configured_yields_ollama_with_that_model() {
        let router = Router::new(ProviderConfig {
            ollama_model: Some("llama3.2:3b".into()),
            ..ProviderConfig::default()
        });
        let client = router.build_client(Task::Scoring).unwrap();
        assert_eq!(client.name(), "ollama");
        assert_eq!(client.model(), "llama3.2:3b");
    }

    #[test]
    fn hosted_beats_local_when_both_configured() {
        let router = Router::new(ProviderConfig {
            ollama_model: Some("llama3.2:3b".into()),
            ..with_openai()
        });
        let client = router.build_client(Task::Scoring).unwrap();
        assert_eq!(client.name(), "openai-compat");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn cloud_model_override_selects_hosted_model() {
        let router = Router::new(ProviderConfig {
            cloud_model: Some("gpt-4o".into()),
            ..with_openai()
        });
        let client = router.build_client(Task::General).unwrap();
        assert_eq!(client.model(), "gpt-4o");
    }

    #[test]
    fn reasoning_credential_only_applies_to_reasoning_tasks() {
        let router = Router::new(ProviderConfig {
            reasoning_api_key: Some("g-key".into()),
            ollama_model: Some("mistral".into()),
            ..ProviderConfig::default()
        });

        let reasoning = router.build_client(Task::Reasoning).unwrap();
        assert_eq!(reasoning.name(), "gemini");
        assert_eq!(reasoning.model(), "gemini-1.5-pro");

        // Any other task falls through the chain to the local route.
        let scoring = router.build_client(Task::Scoring).unwrap();
        assert_eq!(scoring.name(), "ollama");
    }

    #[test]
    fn secondary_hosted_credential_enables_gemini_for_all_tasks() {
        let router = Router::new(ProviderConfig {
            gemini_api_key: Some("g-key".into()),
            gemini_model: Some("gemini-1.5-flash".into()),
            ..ProviderConfig::default()
        });
        let client = router.build_client(Task::Grammar).unwrap();
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.model(), "gemini-1.5-flash");
    }

    #[test]
    fn decisions_are_fresh_per_call() {
        let router = Router::new(with_openai());
        let a = router.build_client(Task::Grammar).unwrap();
        let b = router.build_client(Task::Grammar).unwrap();
        // Two independent instances, not a cached one.
        let pa = a.as_ref() as *const dyn LlmClient as *const u8;
        let pb = b.as_ref() as *const dyn LlmClient as *const u8;
        assert_ne!(pa, pb);
    }
}
