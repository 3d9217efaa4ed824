//! CEFR scoring agent. The only agent whose output goes through the
//! normalizer; its result is always a valid record, tagged with whether it
//! came from a genuine parse or the fallback.

use crate::error::{AgentError, ConfigError};
use crate::prompts;
use crate::providers::LlmClient;
use crate::router::{Router, Task};
use crate::score::{normalize_score, Recovered};

pub struct ScorerAgent {
    client: Box<dyn LlmClient>,
}

impl ScorerAgent {
    pub fn new(router: &Router) -> Result<Self, ConfigError> {
        Ok(Self {
            client: router.build_client(Task::Scoring)?,
        })
    }

    pub fn from_client(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Score one sentence. The provider call can still fail (config/transport
    /// errors propagate); the parsing step never does.
    pub async fn score(&self, text: &str) -> Result<Recovered, AgentError> {
        let prompt = prompts::render_score(text);
        let raw = self.client.predict(&prompt).await?;
        Ok(normalize_score(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::StubClient;
    use crate::score::CefrLevel;

    #[tokio::test]
    async fn clean_json_reply_parses_to_a_record() {
        let stub = StubClient::replying(r#"{"level":"B1","score":75,"rationale":"ok"}"#);
        let agent = ScorerAgent::from_client(Box::new(stub.clone()));

        let out = agent.score("Jeg liker å lese bøker").await.unwrap();
        assert!(!out.is_fallback());
        assert_eq!(out.record().level, CefrLevel::B1);
        assert_eq!(out.record().score, 75);
        assert!(stub.prompts()[0].contains("Jeg liker å lese bøker"));
    }

    #[tokio::test]
    async fn chatty_reply_still_yields_a_record() {
        let agent = ScorerAgent::from_client(Box::new(StubClient::replying(
            "Sure! Here you go: {\"level\":\"A1\",\"score\":35,\"rationale\":\"basic\"} hope that helps",
        )));
        let out = agent.score("hei").await.unwrap();
        assert_eq!(out.record().level, CefrLevel::A1);
        assert_eq!(out.record().score, 35);
    }

    #[tokio::test]
    async fn garbage_reply_degrades_to_the_fallback_record() {
        let agent = ScorerAgent::from_client(Box::new(StubClient::replying("beats me")));
        let out = agent.score("hei").await.unwrap();
        assert!(out.is_fallback());
        assert_eq!(out.record().score, 60);
    }
}
