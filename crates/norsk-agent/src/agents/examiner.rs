//! Examiner agent: formal Norskprøven-style report over a whole session.

use crate::error::{AgentError, ConfigError};
use crate::prompts;
use crate::providers::LlmClient;
use crate::router::{Router, Task};

pub struct ExaminerAgent {
    client: Box<dyn LlmClient>,
}

impl ExaminerAgent {
    pub fn new(router: &Router) -> Result<Self, ConfigError> {
        Ok(Self {
            client: router.build_client(Task::Scoring)?,
        })
    }

    pub fn from_client(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Produce the structured examination report for a session transcript
    /// (as produced by `MemoryStore::transcript`).
    pub async fn report(&self, transcript: &str) -> Result<String, AgentError> {
        let prompt = prompts::render_report(transcript);
        let out = self.client.predict(&prompt).await?;
        Ok(out.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::StubClient;

    #[tokio::test]
    async fn report_feeds_the_transcript_to_the_examiner_prompt() {
        let stub = StubClient::replying("### Norskprøven Examination Report\n...");
        let agent = ExaminerAgent::from_client(Box::new(stub.clone()));

        let out = agent.report("USER: hei\nASSISTANT: hallo").await.unwrap();
        assert!(out.starts_with("### Norskprøven Examination Report"));

        let prompts = stub.prompts();
        assert!(prompts[0].contains("USER: hei"));
        assert!(prompts[0].contains("Norskprøven Examiner"));
    }
}
