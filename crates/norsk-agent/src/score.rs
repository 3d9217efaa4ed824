//! CEFR score records and the total JSON-recovery normalizer.
//!
//! Model output for the scoring task is free text with no hard format
//! guarantee. [`normalize_score`] is a total function from arbitrary text to
//! a valid [`ScoreRecord`]: every branch terminates in a record, never an
//! error. Callers that care whether the record came from a genuine parse or
//! from the fallback inspect the [`Recovered`] tag instead of catching
//! anything.
//!
//! Recovery ladder:
//! 1. trim, strip surrounding code fences
//! 2. strict JSON parse of the whole text
//! 3. greedy first `{...}` substring (DOTALL), parsed strictly
//! 4. fixed fallback record (`A2`, 60, explanatory rationale)

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rationale carried by the parser-fallback record.
pub const FALLBACK_RATIONALE: &str = "Could not parse model output.";

/// Default numeric score when a field is absent or uncoercible.
const DEFAULT_SCORE: u8 = 60;

/// Weights for blending subscores into an overall score when the model
/// returned subscores but no total: grammar, logic, vocabulary.
const BLEND_WEIGHTS: (f64, f64, f64) = (0.45, 0.25, 0.30);

/// CEFR proficiency level. This system assesses A1 through B2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    #[default]
    A2,
    B1,
    B2,
}

impl CefrLevel {
    /// Case-insensitive parse against the enumerated set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated structured output of one scoring call.
///
/// Invariants (upheld by construction in the normalizer):
/// - `level` is always one of the four enumerated values
/// - `score` and any present subscore are in `0..=100`
/// - `rationale` is a trimmed string, possibly empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub level: CefrLevel,
    pub score: u8,
    pub grammar: Option<u8>,
    pub logic: Option<u8>,
    pub vocab: Option<u8>,
    pub rationale: String,
}

impl ScoreRecord {
    /// The fixed record returned when no JSON could be recovered.
    pub fn fallback() -> Self {
        Self {
            level: CefrLevel::A2,
            score: DEFAULT_SCORE,
            grammar: None,
            logic: None,
            vocab: None,
            rationale: FALLBACK_RATIONALE.to_string(),
        }
    }
}

/// Why the normalizer fell back instead of parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Input was empty or whitespace-only.
    EmptyInput,
    /// No `{...}` substring anywhere in the text.
    NoJsonObject,
    /// A candidate object was found but did not parse as JSON.
    InvalidJson,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty input"),
            Self::NoJsonObject => write!(f, "no JSON object found"),
            Self::InvalidJson => write!(f, "invalid JSON"),
        }
    }
}

/// Tagged result of normalization: a genuine parse or the fallback record.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovered {
    Parsed(ScoreRecord),
    Fallback {
        record: ScoreRecord,
        reason: FallbackReason,
    },
}

impl Recovered {
    pub fn record(&self) -> &ScoreRecord {
        match self {
            Self::Parsed(r) => r,
            Self::Fallback { record, .. } => record,
        }
    }

    pub fn into_record(self) -> ScoreRecord {
        match self {
            Self::Parsed(r) => r,
            Self::Fallback { record, .. } => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^```(?:json)?\s*|\s*```$").expect("fence regex"))
}

fn object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("object regex"))
}

/// Recover a [`ScoreRecord`] from raw model text. Total — never fails.
pub fn normalize_score(raw: &str) -> Recovered {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Recovered::Fallback {
            record: ScoreRecord::fallback(),
            reason: FallbackReason::EmptyInput,
        };
    }

    let stripped = fence_re().replace_all(trimmed, "");
    let stripped = stripped.trim();

    // Strict parse of the whole text first.
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(stripped) {
        return Recovered::Parsed(normalize_fields(&map));
    }

    // Otherwise the object may be embedded in prose: take the first greedy
    // `{...}` span and parse that.
    match object_re().find(stripped) {
        Some(m) => match serde_json::from_str::<Value>(m.as_str()) {
            Ok(Value::Object(map)) => Recovered::Parsed(normalize_fields(&map)),
            _ => Recovered::Fallback {
                record: ScoreRecord::fallback(),
                reason: FallbackReason::InvalidJson,
            },
        },
        None => Recovered::Fallback {
            record: ScoreRecord::fallback(),
            reason: FallbackReason::NoJsonObject,
        },
    }
}

/// Clamp-and-default every field of a parsed object. Extra keys are ignored.
fn normalize_fields(map: &Map<String, Value>) -> ScoreRecord {
    let level = map
        .get("level")
        .and_then(Value::as_str)
        .and_then(CefrLevel::parse)
        .unwrap_or_default();

    let grammar = subscore(map, "grammar");
    let logic = subscore(map, "logic");
    let vocab = subscore(map, "vocab");

    let score = match map.get("score") {
        None | Some(Value::Null) => blend(grammar, logic, vocab),
        Some(v) => coerce_int(v).map(clamp_score).unwrap_or(DEFAULT_SCORE),
    };

    let rationale = map
        .get("rationale")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    ScoreRecord {
        level,
        score,
        grammar,
        logic,
        vocab,
        rationale,
    }
}

/// Optional subscore: absent/null stays `None`, present-but-garbage defaults.
fn subscore(map: &Map<String, Value>, key: &str) -> Option<u8> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_int(v).map(clamp_score).unwrap_or(DEFAULT_SCORE)),
    }
}

/// Weighted blend of subscores when no overall score was returned. Requires
/// all three; otherwise the default applies.
fn blend(grammar: Option<u8>, logic: Option<u8>, vocab: Option<u8>) -> u8 {
    match (grammar, logic, vocab) {
        (Some(g), Some(l), Some(v)) => {
            let (wg, wl, wv) = BLEND_WEIGHTS;
            let total = wg * f64::from(g) + wl * f64::from(l) + wv * f64::from(v);
            clamp_score(total.round() as i64)
        }
        _ => DEFAULT_SCORE,
    }
}

/// Lenient integer coercion: integers, rounded floats, numeric strings.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

fn clamp_score(v: i64) -> u8 {
    v.clamp(0, 100) as u8
}
