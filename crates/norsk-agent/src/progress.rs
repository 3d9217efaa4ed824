//! Per-session progress meters.
//!
//! Exponentially weighted moving averages over the scoring subfields, plus a
//! coarse total→CEFR mapping for the "predicted level" badge. Responsive by
//! design: α = 0.3 makes the meters move visibly after each turn.

use crate::score::{CefrLevel, ScoreRecord};

/// EMA smoothing factor.
const ALPHA: f64 = 0.3;

/// Map a smoothed total score to a predicted CEFR level.
pub fn map_cefr(total: f64) -> CefrLevel {
    if total < 45.0 {
        CefrLevel::A1
    } else if total < 70.0 {
        CefrLevel::A2
    } else {
        CefrLevel::B1
    }
}

fn ema_update(prev: Option<f64>, x: f64) -> f64 {
    let next = match prev {
        None => x,
        Some(p) => ALPHA * x + (1.0 - ALPHA) * p,
    };
    // Two decimals, enough for a meter.
    (next * 100.0).round() / 100.0
}

/// Running EMA meters for one learner session.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    pub grammar: Option<f64>,
    pub logic: Option<f64>,
    pub vocab: Option<f64>,
    pub total: Option<f64>,
    pub turns: u32,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one score record into the meters. Missing subscores fall back to
    /// the overall score, so every meter moves every turn.
    pub fn update(&mut self, record: &ScoreRecord) {
        let total = f64::from(record.score);
        let grammar = f64::from(record.grammar.unwrap_or(record.score));
        let logic = f64::from(record.logic.unwrap_or(record.score));
        let vocab = f64::from(record.vocab.unwrap_or(record.score));

        self.grammar = Some(ema_update(self.grammar, grammar));
        self.logic = Some(ema_update(self.logic, logic));
        self.vocab = Some(ema_update(self.vocab, vocab));
        self.total = Some(ema_update(self.total, total));
        self.turns += 1;
    }

    /// Predicted CEFR level from the smoothed total, if any turns happened.
    pub fn predicted_level(&self) -> Option<CefrLevel> {
        self.total.map(map_cefr)
    }
}
