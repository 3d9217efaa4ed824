//! One conversation turn, fanned out across the four per-turn calls.
//!
//! Grammar fix, exam evaluation, CEFR scoring and follow-up generation are
//! independent given the user's text, so they run as four spawned tasks and
//! join before the reply is composed. A failure in any one degrades its
//! section of the reply; the turn itself never fails. Cancellation is not
//! supported — once dispatched, every call runs to completion or error.

use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::agents::{ExamAgent, FollowUpAgent, GrammarAgent, ScorerAgent};
use crate::error::AgentError;
use crate::logger::InteractionLog;
use crate::memory::{MemoryStore, Role};
use crate::router::Router;
use crate::score::{CefrLevel, ScoreRecord};

/// Composed result of one turn. Absent sections carry a matching entry in
/// `errors`.
#[derive(Debug, Clone, Default)]
pub struct TurnReply {
    pub correction: Option<String>,
    pub evaluation: Option<String>,
    pub score: Option<ScoreRecord>,
    /// True when the score came from the normalizer's fallback record.
    pub score_is_fallback: bool,
    pub follow_up: Option<String>,
    pub errors: Vec<String>,
}

impl TurnReply {
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Render the assistant reply shown to the learner.
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = &self.correction {
            parts.push(format!("Correction\n{c}"));
        }
        if let Some(e) = &self.evaluation {
            parts.push(format!("Evaluation\n{e}"));
        }
        if let Some(s) = &self.score {
            parts.push(format!(
                "Score\nLevel: {} | Total: {}\n{}",
                s.level, s.score, s.rationale
            ));
        }
        if let Some(f) = &self.follow_up {
            parts.push(format!("Fortsettelse\n{f}"));
        }
        for err in &self.errors {
            parts.push(format!("Beklager, noe gikk galt. ({err})"));
        }
        parts.join("\n\n")
    }
}

/// Drives full turns: fan-out, fan-in, memory append, interaction logging.
pub struct TurnRunner {
    router: Router,
    memory: Arc<MemoryStore>,
    log: Option<Arc<InteractionLog>>,
}

impl TurnRunner {
    pub fn new(router: Router, memory: Arc<MemoryStore>) -> Self {
        Self {
            router,
            memory,
            log: None,
        }
    }

    pub fn with_log(mut self, log: Arc<InteractionLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Run one turn for `text`, pitching the follow-up at `level_hint`.
    pub async fn run(&self, session_id: &str, text: &str, level_hint: CefrLevel) -> TurnReply {
        let fix = tokio::spawn(run_fix(self.router.clone(), text.to_string()));
        let eval = tokio::spawn(run_evaluate(self.router.clone(), text.to_string()));
        let score = tokio::spawn(run_score(self.router.clone(), text.to_string()));
        let follow = tokio::spawn(run_follow_up(
            self.router.clone(),
            text.to_string(),
            level_hint,
        ));

        let (fix_r, eval_r, score_r, follow_r) = tokio::join!(fix, eval, score, follow);

        let mut errors = Vec::new();
        let correction = flatten(fix_r, "correction", &mut errors);
        let evaluation = flatten(eval_r, "evaluation", &mut errors);
        let follow_up = flatten(follow_r, "follow-up", &mut errors);
        let scored = flatten(score_r, "score", &mut errors);

        let reply = TurnReply {
            correction,
            evaluation,
            score: scored.as_ref().map(|(record, _)| record.clone()),
            score_is_fallback: scored.map(|(_, f)| f).unwrap_or(false),
            follow_up,
            errors,
        };

        let rendered = reply.render();
        self.memory.append(session_id, Role::User, text);
        self.memory.append(session_id, Role::Assistant, &rendered);

        if let Some(log) = &self.log {
            if let Some(c) = &reply.correction {
                log.log_interaction("fix", Some(session_id), text, c, None);
            }
            if let Some(e) = &reply.evaluation {
                log.log_interaction("evaluate", Some(session_id), text, e, None);
            }
            if let Some(s) = &reply.score {
                let meta = json!({
                    "level": s.level,
                    "score": s.score,
                    "fallback": reply.score_is_fallback,
                });
                log.log_interaction("score", Some(session_id), text, &s.rationale, Some(&meta));
            }
            if let Some(f) = &reply.follow_up {
                log.log_interaction("follow_up", Some(session_id), text, f, None);
            }
        }

        info!(
            session = session_id,
            degraded = reply.is_degraded(),
            errors = reply.errors.len(),
            "turn complete"
        );
        reply
    }
}

async fn run_fix(router: Router, text: String) -> Result<String, AgentError> {
    GrammarAgent::new(&router)?.fix(&text, None).await
}

async fn run_evaluate(router: Router, text: String) -> Result<String, AgentError> {
    ExamAgent::new(&router)?.evaluate(&text, None).await
}

async fn run_score(router: Router, text: String) -> Result<(ScoreRecord, bool), AgentError> {
    let recovered = ScorerAgent::new(&router)?.score(&text).await?;
    let is_fallback = recovered.is_fallback();
    Ok((recovered.into_record(), is_fallback))
}

async fn run_follow_up(
    router: Router,
    text: String,
    level: CefrLevel,
) -> Result<String, AgentError> {
    FollowUpAgent::new(&router)?.next_question(&text, level).await
}

/// Collapse spawn + agent errors into a degraded section.
fn flatten<T>(
    joined: Result<Result<T, AgentError>, JoinError>,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    match joined {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(section = label, error = %e, "turn section failed");
            errors.push(format!("{label}: {e}"));
            None
        }
        Err(e) => {
            warn!(section = label, error = %e, "turn task panicked or was aborted");
            errors.push(format!("{label}: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn render_composes_present_sections_in_order() {
        let reply = TurnReply {
            correction: Some("Jeg er trøtt.".into()),
            evaluation: Some("Bra!".into()),
            score: Some(ScoreRecord {
                level: CefrLevel::B1,
                score: 75,
                grammar: None,
                logic: None,
                vocab: None,
                rationale: "solid".into(),
            }),
            score_is_fallback: false,
            follow_up: Some("Hva mer?".into()),
            errors: vec![],
        };
        let text = reply.render();
        let correction_at = text.find("Correction").unwrap();
        let score_at = text.find("Score").unwrap();
        let follow_at = text.find("Fortsettelse").unwrap();
        assert!(correction_at < score_at && score_at < follow_at);
        assert!(text.contains("Level: B1 | Total: 75"));
        assert!(!reply.is_degraded());
    }

    #[test]
    fn render_surfaces_errors_without_crashing() {
        let reply = TurnReply {
            errors: vec!["score: provider returned HTTP 500: boom".into()],
            ..TurnReply::default()
        };
        assert!(reply.is_degraded());
        assert!(reply.render().contains("Beklager, noe gikk galt."));
    }

    #[tokio::test]
    async fn unconfigured_turn_degrades_every_section_but_still_replies() {
        let memory = Arc::new(MemoryStore::default());
        let runner = TurnRunner::new(
            Router::new(ProviderConfig::default()),
            Arc::clone(&memory),
        );

        let reply = runner.run("s1", "Jeg er trott", CefrLevel::A2).await;

        assert!(reply.is_degraded());
        assert_eq!(reply.errors.len(), 4);
        assert!(reply.correction.is_none());
        assert!(reply.score.is_none());

        // The exchange is still recorded.
        let history = memory.get("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "Jeg er trott");
    }

    #[tokio::test]
    async fn degraded_turn_logs_nothing_but_does_not_fail() {
        let memory = Arc::new(MemoryStore::default());
        let log = Arc::new(InteractionLog::open_in_memory().unwrap());
        let runner = TurnRunner::new(Router::new(ProviderConfig::default()), memory)
            .with_log(Arc::clone(&log));

        let reply = runner.run("s1", "hei", CefrLevel::A1).await;
        assert!(reply.is_degraded());
        assert!(log.recent(10).unwrap().is_empty());
    }
}
