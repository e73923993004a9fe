//! HTTP endpoint handlers. These are thin wrappers that forward to state and
//! core logic. Each handler is instrumented; logs include parameters and basic
//! result info, never submission bodies.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument, warn};

use crate::allocator::allocate;
use crate::logic::grade_submission;
use crate::protocol::*;
use crate::state::AppState;

fn not_found(what: &str) -> (StatusCode, Json<ErrorOut>) {
  (StatusCode::NOT_FOUND, Json(ErrorOut { error: format!("{} not found", what) }))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

// ---- Subjects ----

#[instrument(level = "info", skip(state))]
pub async fn http_list_subjects(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.list_subjects().await)
}

#[instrument(level = "info", skip(state, body), fields(name = %body.name))]
pub async fn http_create_subject(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubjectIn>,
) -> impl IntoResponse {
  let s = state.insert_subject(body.name).await;
  info!(target: "assessment", id = %s.id, "Subject created");
  (StatusCode::CREATED, Json(s))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_subject(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  if state.remove_subject(&id).await {
    StatusCode::NO_CONTENT.into_response()
  } else {
    not_found("subject").into_response()
  }
}

// ---- Topics ----

#[instrument(level = "info", skip(state))]
pub async fn http_list_topics(
  State(state): State<Arc<AppState>>,
  Query(q): Query<TopicQuery>,
) -> impl IntoResponse {
  Json(state.list_topics(q.subject_id.as_deref()).await)
}

#[instrument(level = "info", skip(state, body), fields(subject_id = %body.subject_id, name = %body.name))]
pub async fn http_create_topic(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TopicIn>,
) -> impl IntoResponse {
  match state.insert_topic(body.subject_id, body.name).await {
    Some(t) => {
      info!(target: "assessment", id = %t.id, "Topic created");
      (StatusCode::CREATED, Json(t)).into_response()
    }
    None => not_found("subject").into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_topic(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  if state.remove_topic(&id).await {
    StatusCode::NO_CONTENT.into_response()
  } else {
    not_found("topic").into_response()
  }
}

// ---- Problems ----

#[instrument(level = "info", skip(state))]
pub async fn http_list_problems(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ProblemQuery>,
) -> impl IntoResponse {
  Json(
    state
      .list_problems(q.subject_id.as_deref(), q.topic_id.as_deref(), q.difficulty)
      .await,
  )
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_problem(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  match state.get_problem(&id).await {
    Some(p) => Json(p).into_response(),
    None => not_found("problem").into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(topic_id = %body.topic_id, title = %body.title))]
pub async fn http_create_problem(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ProblemIn>,
) -> impl IntoResponse {
  match state
    .create_problem(body.topic_id, body.difficulty, body.title, body.description, body.languages)
    .await
  {
    Some(p) => {
      info!(target: "assessment", id = %p.id, "Problem created");
      (StatusCode::CREATED, Json(p)).into_response()
    }
    None => not_found("topic").into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_problem(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  if state.remove_problem(&id).await {
    StatusCode::NO_CONTENT.into_response()
  } else {
    not_found("problem").into_response()
  }
}

#[instrument(level = "info", skip(state, body), fields(topic_id = %body.topic_id, difficulty = body.difficulty.as_str()))]
pub async fn http_generate_problem(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GenerateIn>,
) -> impl IntoResponse {
  let Some(topic) = state.topics.read().await.get(&body.topic_id).cloned() else {
    return not_found("topic").into_response();
  };
  let Some(oa) = &state.openai else {
    return (
      StatusCode::SERVICE_UNAVAILABLE,
      Json(ErrorOut { error: "Problem generation requires OPENAI_API_KEY".into() }),
    )
      .into_response();
  };

  match oa
    .generate_problem(&state.prompts, body.difficulty, &topic.subject_id, &topic.id, &topic.name)
    .await
  {
    Ok(p) => {
      state.insert_problem(p.clone()).await;
      info!(target: "assessment", id = %p.id, "Generated problem stored");
      (StatusCode::CREATED, Json(p)).into_response()
    }
    Err(e) => {
      warn!(target: "assessment", error = %e, "Problem generation failed");
      (StatusCode::BAD_GATEWAY, Json(ErrorOut { error: e })).into_response()
    }
  }
}

// ---- Assessment ----

#[instrument(level = "info", skip(state, body),
             fields(duration_hours = body.duration_hours, subjects = body.subject_ids.len(), topics = body.topic_ids.len()))]
pub async fn http_start_assessment(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> impl IntoResponse {
  // Degenerate durations are a caller-validated precondition of the allocator.
  if !body.duration_hours.is_finite() || body.duration_hours <= 0.0 {
    return (
      StatusCode::UNPROCESSABLE_ENTITY,
      Json(ErrorOut { error: "durationHours must be a positive number".into() }),
    )
      .into_response();
  }

  let pool = state.problem_pool(&body.subject_ids, &body.topic_ids).await;
  if pool.is_empty() {
    return (
      StatusCode::NOT_FOUND,
      Json(ErrorOut { error: "No problems found for the requested criteria".into() }),
    )
      .into_response();
  }

  let allocation = allocate(body.duration_hours, &pool);
  info!(
    target: "assessment",
    pool = pool.len(),
    selected = allocation.selection.len(),
    easy = allocation.distribution.easy,
    medium = allocation.distribution.medium,
    hard = allocation.distribution.hard,
    total_minutes = allocation.total_estimated_minutes,
    "Assessment started"
  );

  let out = StartOut {
    problems: allocation.selection.iter().map(to_out).collect(),
    duration: body.duration_hours,
    start_time: chrono::Utc::now().to_rfc3339(),
    total_estimated_time: allocation.total_estimated_minutes,
  };
  Json(out).into_response()
}

#[instrument(level = "info", skip(state, body), fields(problem_id = %body.problem_id, language = %body.language, code_len = body.code.len()))]
pub async fn http_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitIn>,
) -> impl IntoResponse {
  let (correct, score, feedback) =
    grade_submission(&state, &body.problem_id, &body.language, &body.code).await;
  info!(target: "assessment", id = %body.problem_id, %correct, score = %format!("{:.1}", score), "Submission graded");
  Json(SubmitOut { correct, score, feedback })
}
