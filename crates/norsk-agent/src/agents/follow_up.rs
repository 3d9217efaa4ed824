//! Follow-up question agent: keeps the conversation moving with one short
//! Norwegian question pitched at the learner's predicted level.

use crate::error::{AgentError, ConfigError};
use crate::prompts;
use crate::providers::LlmClient;
use crate::router::{Router, Task};
use crate::score::CefrLevel;

/// Hard cap on the question length, in characters.
const MAX_QUESTION_CHARS: usize = 200;

pub struct FollowUpAgent {
    client: Box<dyn LlmClient>,
}

impl FollowUpAgent {
    pub fn new(router: &Router) -> Result<Self, ConfigError> {
        Ok(Self {
            client: router.build_client(Task::Reasoning)?,
        })
    }

    pub fn from_client(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// One follow-up question based on the user's last message. Models tend
    /// to pad; only the first line survives, truncated to the cap.
    pub async fn next_question(
        &self,
        text: &str,
        level: CefrLevel,
    ) -> Result<String, AgentError> {
        let prompt = prompts::render_follow_up(text, level);
        let out = self.client.predict(&prompt).await?;
        let first_line = out.trim().lines().next().unwrap_or("").trim();
        Ok(first_line.chars().take(MAX_QUESTION_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::StubClient;

    #[tokio::test]
    async fn only_the_first_line_survives() {
        let agent = FollowUpAgent::from_client(Box::new(StubClient::replying(
            "Hva liker du å gjøre i helgene?\nHer er litt ekstra prat.",
        )));
        let q = agent.next_question("Jeg liker fisk", CefrLevel::A2).await.unwrap();
        assert_eq!(q, "Hva liker du å gjøre i helgene?");
    }

    #[tokio::test]
    async fn overlong_questions_are_truncated() {
        let long = "å".repeat(300);
        let agent = FollowUpAgent::from_client(Box::new(StubClient::replying(&long)));
        let q = agent.next_question("hei", CefrLevel::B1).await.unwrap();
        assert_eq!(q.chars().count(), 200);
    }

    #[tokio::test]
    async fn prompt_targets_the_predicted_level() {
        let stub = StubClient::replying("Hvorfor?");
        let agent = FollowUpAgent::from_client(Box::new(stub.clone()));
        agent.next_question("hei", CefrLevel::B2).await.unwrap();
        assert!(stub.prompts()[0].contains("at B2 level"));
    }
}
