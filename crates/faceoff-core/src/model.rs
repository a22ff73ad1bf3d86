use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Rating assigned to a model source before its first game.
pub const INITIAL_RATING: f64 = 1600.0;

/// Origin tag shared by all assistant-backed sources.
pub const ASSISTANT_ORIGIN: &str = "Conva Assistant";

/// Rating state for one origin, independent of use case.
///
/// Created lazily on the first recorded outcome, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSource {
    pub origin: String,
    pub rating: f64,
    pub games_played: i64,
}

impl ModelSource {
    pub fn unrated(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            rating: INITIAL_RATING,
            games_played: 0,
        }
    }
}

/// One immutable revision of a prompt under its `(origin, use_case)` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub origin: String,
    pub use_case: String,
    pub prompt: String,
    pub version: i64,
    pub created_at: String,
}

/// One immutable revision of an assistant integration.
///
/// `origin` is always [`ASSISTANT_ORIGIN`]; `assistant_version` is the
/// upstream vendor's own version string, distinct from the registry `version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantVersion {
    pub assistant_id: String,
    pub api_key: String,
    pub assistant_version: String,
    pub use_case: String,
    pub origin: String,
    pub version: i64,
    pub created_at: String,
}

/// Registration payload for a new assistant revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSpec {
    pub assistant_id: String,
    pub api_key: String,
    pub assistant_version: String,
    pub use_case: String,
}

/// Append-only record of one judged comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_no: i64,
    pub query: String,
    pub use_case: String,
    pub model_a: String,
    pub model_b: String,
    pub response_a: String,
    pub response_b: String,
    pub outcome: Outcome,
    pub created_at: String,
}

/// Human judgment of a comparison, always expressed relative to model A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    BothGood,
    BothBad,
}

impl Outcome {
    /// Strict parse; anything outside the four known values is rejected
    /// before it can reach a rating update.
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            "both_good" => Ok(Outcome::BothGood),
            "both_bad" => Ok(Outcome::BothBad),
            other => Err(EngineError::UnknownOutcome(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::BothGood => "both_good",
            Outcome::BothBad => "both_bad",
        }
    }

    /// Elo score pair `(score_a, score_b)`.
    ///
    /// Win/Loss sum to 1 (zero-sum update); BothGood and BothBad sum to 1.5
    /// and 0.5, letting a pair's combined rating drift up or down. That drift
    /// is deliberate.
    pub fn scores(&self) -> (f64, f64) {
        match self {
            Outcome::Win => (1.0, 0.0),
            Outcome::Loss => (0.0, 1.0),
            Outcome::BothGood => (0.75, 0.75),
            Outcome::BothBad => (0.25, 0.25),
        }
    }
}

/// A sampler pick: the latest registry payload for one origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    Prompt(PromptVersion),
    Assistant(AssistantVersion),
}

impl Candidate {
    pub fn origin(&self) -> &str {
        match self {
            Candidate::Prompt(p) => &p.origin,
            Candidate::Assistant(a) => &a.origin,
        }
    }

    pub fn use_case(&self) -> &str {
        match self {
            Candidate::Prompt(p) => &p.use_case,
            Candidate::Assistant(a) => &a.use_case,
        }
    }

    pub fn version(&self) -> i64 {
        match self {
            Candidate::Prompt(p) => p.version,
            Candidate::Assistant(a) => a.version,
        }
    }
}

/// Caller input for `record_outcome`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub use_case: String,
    pub model_a: String,
    pub model_b: String,
    pub query: String,
    pub response_a: String,
    pub response_b: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub origin: String,
    pub rating: f64,
    pub games_played: i64,
}
