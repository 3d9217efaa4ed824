//! Task agents: each builds one prompt shape, calls its router-selected
//! client, and post-processes the reply for its task.
//!
//! | Agent           | Task hint   | Output                          |
//! |-----------------|-------------|---------------------------------|
//! | `GrammarAgent`  | `Grammar`   | corrected sentence + short why  |
//! | `ExamAgent`     | `General`   | correction, explanation, tip    |
//! | `ScorerAgent`   | `Scoring`   | normalized [`Recovered`] record |
//! | `FollowUpAgent` | `Reasoning` | one short Norwegian question    |
//! | `ExaminerAgent` | `Scoring`   | formal session report           |
//!
//! Agents are cheap to construct and hold no shared mutable state; callers
//! build fresh instances per request. Conversational memory is injected
//! explicitly via `with_memory`.

pub mod exam;
pub mod examiner;
pub mod follow_up;
pub mod grammar;
pub mod scorer;

pub use exam::ExamAgent;
pub use examiner::ExaminerAgent;
pub use follow_up::FollowUpAgent;
pub use grammar::GrammarAgent;
pub use scorer::ScorerAgent;

use std::sync::Arc;

use crate::memory::{MemoryStore, Role};

/// Record a completed exchange in session memory, if both are present.
fn record_turn(
    memory: Option<&Arc<MemoryStore>>,
    session_id: Option<&str>,
    user: &str,
    assistant: &str,
) {
    if let (Some(store), Some(sid)) = (memory, session_id) {
        store.append(sid, Role::User, user);
        store.append(sid, Role::Assistant, assistant);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::ProviderError;
    use crate::providers::LlmClient;

    /// Canned-reply client that records every prompt it receives. Clones
    /// share the prompt log, so tests keep a handle after handing the stub
    /// to an agent.
    #[derive(Clone)]
    pub struct StubClient {
        reply: String,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl StubClient {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl LlmClient for StubClient {
        async fn predict(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &'static str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }
}
