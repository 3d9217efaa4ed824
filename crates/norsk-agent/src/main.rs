//! CLI front end: one-shot agent calls plus an interactive chat loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use norsk_agent::agents::{ExamAgent, ExaminerAgent, FollowUpAgent, GrammarAgent, ScorerAgent};
use norsk_agent::logger::InteractionLog;
use norsk_agent::memory::MemoryStore;
use norsk_agent::progress::ProgressTracker;
use norsk_agent::score::CefrLevel;
use norsk_agent::turn::TurnRunner;
use norsk_agent::{Router, Task};

#[derive(Parser)]
#[command(name = "norsk-agent", about = "Norwegian tutor agents over routed LLM providers")]
struct Cli {
    /// Path to the interaction log database.
    #[arg(long, default_value = "norsk-agent.db")]
    db: PathBuf,

    /// Session id; a fresh one is generated when omitted.
    #[arg(long)]
    session: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Correct one sentence and explain briefly.
    Fix { text: String },
    /// Exam-style evaluation: correction, explanation, tip.
    Evaluate { text: String },
    /// CEFR score for one sentence.
    Score { text: String },
    /// One follow-up question for the given message.
    Ask {
        text: String,
        /// Level to pitch the question at.
        #[arg(long, value_enum, default_value = "a2")]
        level: CliLevel,
    },
    /// Interactive tutor loop (full turns with meters and a final report).
    Chat,
    /// Send a raw prompt to whichever provider the router selects.
    Probe {
        prompt: String,
        #[arg(long, value_enum, default_value = "general")]
        task: Task,
    },
}

/// CLI-facing CEFR level (the domain enum stays clap-free on purpose).
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliLevel {
    A1,
    A2,
    B1,
    B2,
}

impl From<CliLevel> for CefrLevel {
    fn from(l: CliLevel) -> Self {
        match l {
            CliLevel::A1 => CefrLevel::A1,
            CliLevel::A2 => CefrLevel::A2,
            CliLevel::B1 => CefrLevel::B1,
            CliLevel::B2 => CefrLevel::B2,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let router = Router::from_env();
    let session = cli
        .session
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    match cli.command {
        Command::Fix { text } => {
            let out = GrammarAgent::new(&router)?.fix(&text, Some(&session)).await?;
            println!("{out}");
        }
        Command::Evaluate { text } => {
            let out = ExamAgent::new(&router)?
                .evaluate(&text, Some(&session))
                .await?;
            println!("{out}");
        }
        Command::Score { text } => {
            let recovered = ScorerAgent::new(&router)?.score(&text).await?;
            if recovered.is_fallback() {
                warn!("model output was not parseable; showing fallback record");
            }
            println!("{}", serde_json::to_string_pretty(recovered.record())?);
        }
        Command::Ask { text, level } => {
            let out = FollowUpAgent::new(&router)?
                .next_question(&text, level.into())
                .await?;
            println!("{out}");
        }
        Command::Probe { prompt, task } => {
            let client = router.build_client(task)?;
            info!(provider = client.name(), model = client.model(), "probing provider");
            let out = client.predict(&prompt).await?;
            println!("{out}");
        }
        Command::Chat => {
            chat_loop(router, &cli.db, &session).await?;
        }
    }

    Ok(())
}

/// Interactive loop: each line of input runs a full turn; `report` produces
/// the examiner summary; `quit` exits.
async fn chat_loop(router: Router, db: &PathBuf, session: &str) -> Result<()> {
    let memory = Arc::new(MemoryStore::default());
    let log = match InteractionLog::open(db) {
        Ok(log) => Some(Arc::new(log)),
        Err(e) => {
            warn!(path = %db.display(), error = %e, "interaction log unavailable, continuing without it");
            None
        }
    };

    let mut runner = TurnRunner::new(router.clone(), Arc::clone(&memory));
    if let Some(log) = &log {
        runner = runner.with_log(Arc::clone(log));
    }
    let mut progress = ProgressTracker::new();

    println!("Norsk Agent — skriv en norsk setning ('report' for vurdering, 'quit' for å avslutte)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        match text {
            "" => continue,
            "quit" | "exit" => break,
            "report" => {
                let transcript = memory.transcript(session);
                if transcript.is_empty() {
                    println!("Ingen samtale å vurdere ennå.");
                    continue;
                }
                match ExaminerAgent::new(&router) {
                    Ok(agent) => match agent.report(&transcript).await {
                        Ok(report) => println!("\n{report}\n"),
                        Err(e) => println!("Beklager, noe gikk galt. ({e})"),
                    },
                    Err(e) => println!("Beklager, noe gikk galt. ({e})"),
                }
            }
            _ => {
                let level = progress.predicted_level().unwrap_or_default();
                let reply = runner.run(session, text, level).await;
                if let Some(record) = &reply.score {
                    progress.update(record);
                }
                println!("\n{}\n", reply.render());
                if let (Some(total), Some(level)) = (progress.total, progress.predicted_level()) {
                    println!(
                        "[meters] total {:.1} | grammar {:.1} | logic {:.1} | vocab {:.1} | predicted {}",
                        total,
                        progress.grammar.unwrap_or(0.0),
                        progress.logic.unwrap_or(0.0),
                        progress.vocab.unwrap_or(0.0),
                        level
                    );
                }
            }
        }
    }

    println!("Ha det bra!");
    Ok(())
}
