//! Application state: in-memory stores, prompts, OpenAI client, and pool snapshots.
//!
//! This module owns:
//!   - the subject/topic/problem stores
//!   - the prompts struct (from TOML or defaults)
//!   - optional OpenAI client
//!
//! Startup merges the TOML bank (if configured) with built-in seeds without
//! overwriting existing ids, then logs an inventory by difficulty and source.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::{load_assess_config_from_env, AssessConfig, Prompts};
use crate::domain::{Difficulty, Problem, ProblemSource, Subject, Topic};
use crate::openai::OpenAI;
use crate::seeds::{seed_problems, seed_subjects, seed_topics};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub subjects: Arc<RwLock<HashMap<String, Subject>>>,
    pub topics: Arc<RwLock<HashMap<String, Topic>>>,
    pub problems: Arc<RwLock<HashMap<String, Problem>>>,
    pub openai: Option<OpenAI>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load config, merge bank + seeds, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg_opt = load_assess_config_from_env();
        let prompts = cfg_opt
            .as_ref()
            .map(|c| c.prompts.clone())
            .unwrap_or_default();

        let mut subjects = HashMap::<String, Subject>::new();
        let mut topics = HashMap::<String, Topic>::new();
        let mut problems = HashMap::<String, Problem>::new();

        // Seeds go in first; bank entries may reuse or extend the curriculum.
        for s in seed_subjects() {
            subjects.insert(s.id.clone(), s);
        }
        for t in seed_topics() {
            topics.insert(t.id.clone(), t);
        }

        if let Some(cfg) = &cfg_opt {
            insert_bank_problems(cfg, &mut subjects, &mut topics, &mut problems);
        }

        // Built-in problems last, never overwriting bank ids.
        for p in seed_problems() {
            problems.entry(p.id.clone()).or_insert(p);
        }

        // Inventory summary by difficulty/source.
        let mut count_by_diff: HashMap<Difficulty, (usize, usize, usize)> = HashMap::new();
        for p in problems.values() {
            let entry = count_by_diff.entry(p.difficulty).or_insert((0, 0, 0));
            match p.source {
                ProblemSource::LocalBank => entry.0 += 1,
                ProblemSource::Generated => entry.1 += 1,
                ProblemSource::Seed => entry.2 += 1,
            }
        }
        for (diff, (bank, gen, seed)) in count_by_diff {
            info!(target: "assessment", difficulty = diff.as_str(), local_bank = bank, generated = gen, seed = seed, "Startup problem inventory");
        }

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "gauntlet_backend", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "OpenAI enabled.");
        } else {
            info!(target: "gauntlet_backend", "OpenAI disabled (no OPENAI_API_KEY). Grading falls back to the local rubric.");
        }

        Self {
            subjects: Arc::new(RwLock::new(subjects)),
            topics: Arc::new(RwLock::new(topics)),
            problems: Arc::new(RwLock::new(problems)),
            openai,
            prompts,
        }
    }

    // ---- Subjects ----

    pub async fn list_subjects(&self) -> Vec<Subject> {
        let mut out: Vec<Subject> = self.subjects.read().await.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn insert_subject(&self, name: String) -> Subject {
        let s = Subject { id: Uuid::new_v4().to_string(), name };
        self.subjects.write().await.insert(s.id.clone(), s.clone());
        s
    }

    /// Remove a subject and cascade to its topics and problems.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn remove_subject(&self, id: &str) -> bool {
        let removed = self.subjects.write().await.remove(id).is_some();
        if removed {
            self.topics.write().await.retain(|_, t| t.subject_id != id);
            self.problems.write().await.retain(|_, p| p.subject_id != id);
        }
        removed
    }

    // ---- Topics ----

    pub async fn list_topics(&self, subject_id: Option<&str>) -> Vec<Topic> {
        let mut out: Vec<Topic> = self
            .topics
            .read()
            .await
            .values()
            .filter(|t| subject_id.map_or(true, |sid| t.subject_id == sid))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Insert a topic; fails if the subject does not exist.
    #[instrument(level = "debug", skip(self))]
    pub async fn insert_topic(&self, subject_id: String, name: String) -> Option<Topic> {
        if !self.subjects.read().await.contains_key(&subject_id) {
            warn!(target: "assessment", %subject_id, "Rejecting topic for unknown subject");
            return None;
        }
        let t = Topic { id: Uuid::new_v4().to_string(), subject_id, name };
        self.topics.write().await.insert(t.id.clone(), t.clone());
        Some(t)
    }

    /// Remove a topic and cascade to its problems.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn remove_topic(&self, id: &str) -> bool {
        let removed = self.topics.write().await.remove(id).is_some();
        if removed {
            self.problems.write().await.retain(|_, p| p.topic_id != id);
        }
        removed
    }

    // ---- Problems ----

    pub async fn list_problems(
        &self,
        subject_id: Option<&str>,
        topic_id: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Vec<Problem> {
        let mut out: Vec<Problem> = self
            .problems
            .read()
            .await
            .values()
            .filter(|p| subject_id.map_or(true, |sid| p.subject_id == sid))
            .filter(|p| topic_id.map_or(true, |tid| p.topic_id == tid))
            .filter(|p| difficulty.map_or(true, |d| p.difficulty == d))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.title.cmp(&b.title));
        out
    }

    #[instrument(level = "debug", skip(self, p), fields(id = %p.id))]
    pub async fn insert_problem(&self, p: Problem) {
        self.problems.write().await.insert(p.id.clone(), p);
    }

    /// Insert a problem validating its topic; the subject is taken from the topic.
    #[instrument(level = "debug", skip(self, title, description, languages))]
    pub async fn create_problem(
        &self,
        topic_id: String,
        difficulty: Difficulty,
        title: String,
        description: String,
        languages: Vec<String>,
    ) -> Option<Problem> {
        let subject_id = {
            let topics = self.topics.read().await;
            match topics.get(&topic_id) {
                Some(t) => t.subject_id.clone(),
                None => {
                    warn!(target: "assessment", %topic_id, "Rejecting problem for unknown topic");
                    return None;
                }
            }
        };
        let p = Problem {
            id: Uuid::new_v4().to_string(),
            subject_id,
            topic_id,
            difficulty,
            source: ProblemSource::LocalBank,
            title,
            description,
            languages,
        };
        self.insert_problem(p.clone()).await;
        Some(p)
    }

    /// Read-only access to a problem by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_problem(&self, id: &str) -> Option<Problem> {
        self.problems.read().await.get(id).cloned()
    }

    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn remove_problem(&self, id: &str) -> bool {
        self.problems.write().await.remove(id).is_some()
    }

    /// Snapshot of problems matching the requested subjects/topics, the
    /// read-only pool the allocator consumes. Empty filter list = no constraint.
    #[instrument(level = "debug", skip(self, subject_ids, topic_ids), fields(subjects = subject_ids.len(), topics = topic_ids.len()))]
    pub async fn problem_pool(&self, subject_ids: &[String], topic_ids: &[String]) -> Vec<Problem> {
        self.problems
            .read()
            .await
            .values()
            .filter(|p| subject_ids.is_empty() || subject_ids.contains(&p.subject_id))
            .filter(|p| topic_ids.is_empty() || topic_ids.contains(&p.topic_id))
            .cloned()
            .collect()
    }
}

/// Resolve bank entries against the curriculum by name, creating subjects and
/// topics on first sight. Entries with an empty description are skipped.
fn insert_bank_problems(
    cfg: &AssessConfig,
    subjects: &mut HashMap<String, Subject>,
    topics: &mut HashMap<String, Topic>,
    problems: &mut HashMap<String, Problem>,
) {
    for pc in &cfg.problems {
        let description = match &pc.description {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => {
                tracing::error!(target: "assessment", title = %pc.title, "Skipping bank item: missing description.");
                continue;
            }
        };

        let subject_id = match subjects.values().find(|s| s.name == pc.subject) {
            Some(s) => s.id.clone(),
            None => {
                let s = Subject { id: Uuid::new_v4().to_string(), name: pc.subject.clone() };
                let id = s.id.clone();
                subjects.insert(id.clone(), s);
                id
            }
        };
        let topic_id = match topics
            .values()
            .find(|t| t.name == pc.topic && t.subject_id == subject_id)
        {
            Some(t) => t.id.clone(),
            None => {
                let t = Topic {
                    id: Uuid::new_v4().to_string(),
                    subject_id: subject_id.clone(),
                    name: pc.topic.clone(),
                };
                let id = t.id.clone();
                topics.insert(id.clone(), t);
                id
            }
        };

        let id = pc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        let p = Problem {
            id: id.clone(),
            subject_id,
            topic_id,
            difficulty: pc.difficulty,
            source: ProblemSource::LocalBank,
            title: pc.title.clone(),
            description,
            languages: pc.languages.clone(),
        };
        problems.insert(id, p);
    }
}
