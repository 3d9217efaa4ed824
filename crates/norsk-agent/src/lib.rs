//! Norwegian-language tutor agents over routed LLM providers.
//!
//! The interesting machinery is the provider layer: a priority-chain
//! [`router::Router`] that resolves one [`providers::LlmClient`] per call
//! from whatever credentials are configured, bounded-backoff retries for the
//! hosted backends, and a total JSON-recovery normalizer
//! ([`score::normalize_score`]) that turns unreliable free-text model output
//! into validated CEFR score records. The agents on top are thin: one prompt
//! shape and one post-processing step each.
//!
//! ## Layers
//!
//! | Module      | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `config`    | environment-driven provider configuration          |
//! | `providers` | per-protocol clients + retry policy                |
//! | `router`    | ordered (predicate, factory) provider selection    |
//! | `score`     | CEFR records and JSON recovery                     |
//! | `agents`    | grammar / exam / scorer / follow-up / examiner     |
//! | `turn`      | per-turn fan-out and degraded-reply composition    |
//! | `memory`    | injectable bounded per-session history             |
//! | `logger`    | best-effort append-only interaction log (SQLite)   |
//! | `progress`  | EMA meters and predicted-level mapping             |

pub mod agents;
pub mod config;
pub mod error;
pub mod logger;
pub mod memory;
pub mod progress;
pub mod prompts;
pub mod providers;
pub mod router;
pub mod score;
pub mod turn;

pub use config::ProviderConfig;
pub use error::{AgentError, ConfigError, ProviderError};
pub use providers::{LlmClient, RetryPolicy};
pub use router::{Router, Task};
pub use score::{normalize_score, CefrLevel, Recovered, ScoreRecord};
