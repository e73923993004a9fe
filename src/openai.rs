//! Minimal OpenAI client for our use-cases.
//!
//! We only call chat.completions and request either plain text or a strict JSON object.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key and we never log full submissions.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{Difficulty, Problem, ProblemSource};
use crate::util::fill_template;
use uuid::Uuid;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
}

/// JSON shape the generation prompt asks the model for.
#[derive(Deserialize)]
struct Gen {
  title: String,
  description: String,
  #[serde(default)]
  languages: Vec<String>,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, strong_model })
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
      max_tokens: None,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "gauntlet-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.get(0)
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    serde_json::from_str::<T>(&text).map_err(|e| format!("JSON parse error: {}", e))
  }

  // --- High-level helpers (domain-specialized) ---

  /// Generate a new problem for the given difficulty and topic name.
  #[instrument(
    level = "info",
    skip(self, prompts, topic_name),
    fields(difficulty = difficulty.as_str(), model = %self.strong_model)
  )]
  pub async fn generate_problem(
    &self,
    prompts: &Prompts,
    difficulty: Difficulty,
    subject_id: &str,
    topic_id: &str,
    topic_name: &str,
  ) -> Result<Problem, String> {
    let system = &prompts.generate_system;
    let user = fill_template(
      &prompts.generate_user_template,
      &[("difficulty", difficulty.as_str()), ("topic", topic_name)],
    );
    let start = std::time::Instant::now();
    let result = self.chat_json::<Gen>(&self.strong_model, system, &user, 0.95).await;
    let elapsed = start.elapsed();

    let gen = match result {
      Ok(g) => {
        info!(?elapsed, "Model response received successfully");
        g
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during problem generation");
        return Err(format!("Model generation failed: {e}"));
      }
    };

    let languages = if gen.languages.is_empty() {
      vec!["python".into(), "javascript".into(), "rust".into()]
    } else {
      gen.languages
    };
    let p = Problem {
      id: Uuid::new_v4().to_string(),
      subject_id: subject_id.to_string(),
      topic_id: topic_id.to_string(),
      difficulty,
      source: ProblemSource::Generated,
      title: gen.title,
      description: gen.description,
      languages,
    };

    info!(
      problem_id = %p.id,
      title_preview = %p.title.chars().take(40).collect::<String>(),
      "Problem successfully generated"
    );

    Ok(p)
  }

  /// Grade a submission against its problem statement (returns correct/score/feedback).
  #[instrument(level = "info", skip(self, prompts, problem, code),
               fields(problem_id = %problem.id, %language, code_len = code.len()))]
  pub async fn grade_submission(
    &self,
    prompts: &Prompts,
    problem: &Problem,
    language: &str,
    code: &str,
  ) -> Result<(bool, f32, String), String> {
    #[derive(Deserialize)]
    struct Graded { correct: bool, score: f32, feedback: String }

    let system = &prompts.grade_system;
    let user = fill_template(
      &prompts.grade_user_template,
      &[
        ("title",       &problem.title),
        ("description", &problem.description),
        ("language",    language),
        ("code",        code),
      ],
    );

    let g: Graded = self.chat_json(&self.strong_model, system, &user, 0.2).await?;
    Ok((g.correct, g.score, g.feedback))
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
