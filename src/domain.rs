//! Domain models used by the backend: subjects, topics, problems, and difficulty bands.

use serde::{Deserialize, Serialize};

/// Difficulty tier of a problem. Each tier carries a fixed estimated-time band.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

/// Estimated solve-time range for one difficulty tier, in minutes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBand {
  pub min: u32,
  pub max: u32,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  /// Fixed per-tier time band: easy [15,20], medium [20,25], hard [25,30].
  pub fn band(self) -> TimeBand {
    match self {
      Difficulty::Easy => TimeBand { min: 15, max: 20 },
      Difficulty::Medium => TimeBand { min: 20, max: 25 },
      Difficulty::Hard => TimeBand { min: 25, max: 30 },
    }
  }

  /// Band midpoint, the single scalar used for all budget arithmetic.
  pub fn midpoint_minutes(self) -> f64 {
    let b = self.band();
    f64::from(b.min + b.max) / 2.0
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }
}

/// Where did we get the problem from?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSource {
  LocalBank, // from admin-provided TOML bank
  Generated, // generated via OpenAI and kept in memory
  Seed,      // built-in seeds (last resort)
}

/// Top-level curriculum unit (e.g. "Algorithms", "Databases").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subject {
  pub id: String,
  pub name: String,
}

/// A topic within a subject (e.g. "sorting" under "Algorithms").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Topic {
  pub id: String,
  pub subject_id: String,
  pub name: String,
}

/// Core problem structure persisted in-memory. Immutable for the duration of
/// one allocation call; the allocator receives cloned snapshots.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Problem {
  pub id: String,
  pub subject_id: String,
  pub topic_id: String,
  pub difficulty: Difficulty,
  pub source: ProblemSource,

  pub title: String,
  pub description: String,
  /// Languages a solution may be written in (e.g. "python", "rust").
  pub languages: Vec<String>,
}
