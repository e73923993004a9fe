//! Loading assessment configuration (prompts + optional problem bank) from TOML.
//!
//! See `AssessConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Difficulty;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AssessConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub problems: Vec<ProblemCfg>,
}

/// Problem entry accepted in TOML configuration. `subject` and `topic` are
/// plain names; the state layer resolves or creates the matching entities.
#[derive(Clone, Debug, Deserialize)]
pub struct ProblemCfg {
  #[serde(default)] pub id: Option<String>,
  pub subject: String,
  pub topic: String,
  pub difficulty: Difficulty,
  pub title: String,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub languages: Vec<String>,
}

/// Prompts used by the OpenAI client. Defaults are sensible for code grading
/// and generation; override them in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  // Problem generation
  pub generate_system: String,
  pub generate_user_template: String,
  // Submission grading
  pub grade_system: String,
  pub grade_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generate_system: "You are a coding-assessment content generator. Respond ONLY with strict JSON.".into(),
      generate_user_template: "Generate one coding problem at difficulty '{difficulty}' for topic '{topic}'. Return JSON with fields: title, description, languages (array of lowercase language names). The description must state the task, input/output format, and one example. Keep it self-contained.".into(),
      grade_system: "You are a strict code reviewer grading an assessment submission. Output JSON only.".into(),
      grade_user_template: "Problem: {title}\n{description}\n\nSubmitted language: {language}\nSubmission:\n```\n{code}\n```\n\nReturn JSON {\"correct\": boolean, \"score\": number, \"feedback\": string}.\nScoring: 0-100 for correctness, completeness and edge-case handling. 'correct' = true if score >= 60. Do not execute the code; judge it by reading.".into(),
    }
  }
}

/// Attempt to load `AssessConfig` from ASSESS_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller falls back to defaults + seeds.
pub fn load_assess_config_from_env() -> Option<AssessConfig> {
  let path = std::env::var("ASSESS_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AssessConfig>(&s) {
      Ok(cfg) => {
        info!(target: "gauntlet_backend", %path, "Loaded assessment config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "gauntlet_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "gauntlet_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
