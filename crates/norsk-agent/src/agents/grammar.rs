//! Grammar-fix agent: corrected sentence plus a short explanation.

use std::sync::Arc;

use crate::error::{AgentError, ConfigError};
use crate::memory::MemoryStore;
use crate::prompts;
use crate::providers::LlmClient;
use crate::router::{Router, Task};

pub struct GrammarAgent {
    client: Box<dyn LlmClient>,
    memory: Option<Arc<MemoryStore>>,
}

impl GrammarAgent {
    pub fn new(router: &Router) -> Result<Self, ConfigError> {
        Ok(Self {
            client: router.build_client(Task::Grammar)?,
            memory: None,
        })
    }

    /// Build around an existing client (tests, embedders).
    pub fn from_client(client: Box<dyn LlmClient>) -> Self {
        Self {
            client,
            memory: None,
        }
    }

    pub fn with_memory(mut self, store: Arc<MemoryStore>) -> Self {
        self.memory = Some(store);
        self
    }

    /// Correct one Norwegian sentence and explain briefly.
    pub async fn fix(&self, text: &str, session_id: Option<&str>) -> Result<String, AgentError> {
        let prompt = prompts::render_fix(text);
        let out = self.client.predict(&prompt).await?;
        let out = out.trim().to_string();
        super::record_turn(self.memory.as_ref(), session_id, text, &out);
        Ok(out)
    }
}
