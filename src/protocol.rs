//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Problem, TimeBand};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

//
// Curriculum CRUD
//

#[derive(Deserialize)]
pub struct SubjectIn {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
    #[serde(rename = "subjectId")]
    pub subject_id: Option<String>,
}

#[derive(Deserialize)]
pub struct TopicIn {
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProblemQuery {
    #[serde(rename = "subjectId")]
    pub subject_id: Option<String>,
    #[serde(rename = "topicId")]
    pub topic_id: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Deserialize)]
pub struct ProblemIn {
    #[serde(rename = "topicId")]
    pub topic_id: String,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Deserialize)]
pub struct GenerateIn {
    #[serde(rename = "topicId")]
    pub topic_id: String,
    pub difficulty: Difficulty,
}

//
// Assessment
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    #[serde(rename = "subjectIds", default)]
    pub subject_ids: Vec<String>,
    #[serde(rename = "topicIds", default)]
    pub topic_ids: Vec<String>,
    #[serde(rename = "durationHours")]
    pub duration_hours: f64,
}

/// Public problem DTO for assessment delivery. Deliberately omits topic and
/// source so the test-taker cannot infer the selection pattern.
#[derive(Serialize)]
pub struct ProblemOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub languages: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: TimeBand,
}

/// Convert full `Problem` (internal) to the public DTO.
pub fn to_out(p: &Problem) -> ProblemOut {
    ProblemOut {
        id: p.id.clone(),
        title: p.title.clone(),
        description: p.description.clone(),
        languages: p.languages.clone(),
        difficulty: p.difficulty,
        estimated_time: p.difficulty.band(),
    }
}

#[derive(Serialize)]
pub struct StartOut {
    pub problems: Vec<ProblemOut>,
    /// Requested duration in hours, echoed back.
    pub duration: f64,
    #[serde(rename = "startTime")]
    pub start_time: String,
    /// Midpoint-time sum of the selection, in minutes.
    #[serde(rename = "totalEstimatedTime")]
    pub total_estimated_time: f64,
}

#[derive(Deserialize)]
pub struct SubmitIn {
    #[serde(rename = "problemId")]
    pub problem_id: String,
    pub language: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct SubmitOut {
    pub correct: bool,
    pub score: f32,
    pub feedback: String,
}
