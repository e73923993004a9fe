//! Problem allocation for assessment start.
//!
//! Flow:
//! 1) Size a difficulty distribution from the requested duration (pure, deterministic).
//! 2) Pick concrete problems per tier, preferring unused topics, with a uniform shuffle.
//! 3) Trim from the end of the combined selection until the midpoint-time sum fits.
//!
//! The whole module is synchronous and pure apart from `thread_rng`; callers are
//! expected to reject an empty pool and a non-positive duration before calling in.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::domain::{Difficulty, Problem};

/// Hard cap on problems per assessment, a UX decision carried over unchanged.
pub const MAX_PROBLEMS: usize = 10;

/// Target number of problems per difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Distribution {
  pub easy: usize,
  pub medium: usize,
  pub hard: usize,
}

impl Distribution {
  pub fn total(&self) -> usize {
    self.easy + self.medium + self.hard
  }

  /// Midpoint-time sum of a full selection matching these counts, in minutes.
  pub fn midpoint_minutes(&self) -> f64 {
    self.easy as f64 * Difficulty::Easy.midpoint_minutes()
      + self.medium as f64 * Difficulty::Medium.midpoint_minutes()
      + self.hard as f64 * Difficulty::Hard.midpoint_minutes()
  }

  fn count_for(&self, d: Difficulty) -> usize {
    match d {
      Difficulty::Easy => self.easy,
      Difficulty::Medium => self.medium,
      Difficulty::Hard => self.hard,
    }
  }
}

/// Result of one allocation: the chosen problems (already shuffled and trimmed),
/// the target distribution from step 1, and the midpoint-time sum of `selection`.
#[derive(Clone, Debug)]
pub struct Allocation {
  pub selection: Vec<Problem>,
  pub distribution: Distribution,
  pub total_estimated_minutes: f64,
}

impl Allocation {
  /// Per-tier counts of the final (possibly trimmed) selection. These can be
  /// lower than `distribution` targets after under-fill or the budget trim.
  pub fn final_counts(&self) -> Distribution {
    let mut d = Distribution { easy: 0, medium: 0, hard: 0 };
    for p in &self.selection {
      match p.difficulty {
        Difficulty::Easy => d.easy += 1,
        Difficulty::Medium => d.medium += 1,
        Difficulty::Hard => d.hard += 1,
      }
    }
    d
  }
}

/// Size the easy/medium/hard counts for a requested duration.
///
/// Tiered policy, first match wins:
/// - under 45 minutes: a single easy problem;
/// - 45 to 90 minutes: one easy plus one medium;
/// - otherwise a proportional mix (40% easy, 40% medium, remainder hard,
///   at least one hard) capped at `MAX_PROBLEMS`, then decremented
///   hard-first until the midpoint-time sum fits or only 3 problems remain.
///
/// The 3-problem floor means a short-but-not-trivial duration may slightly
/// exceed its budget here; the final trim in `allocate` still applies.
pub fn compute_distribution(duration_hours: f64) -> Distribution {
  let total_minutes = duration_hours * 60.0;

  if total_minutes < 45.0 {
    return Distribution { easy: 1, medium: 0, hard: 0 };
  }
  if total_minutes < 90.0 {
    return Distribution { easy: 1, medium: 1, hard: 0 };
  }

  let max_by_time = (total_minutes / Difficulty::Easy.midpoint_minutes()).floor() as usize;
  let max_problems = max_by_time.min(MAX_PROBLEMS);
  if max_problems < 3 {
    // Unreachable with the current 90-minute cutoff; kept so the
    // one-of-each guarantee survives if the cutoffs ever move.
    return Distribution { easy: 1, medium: 1, hard: 1 };
  }

  let mut dist = Distribution {
    easy: (0.4 * max_problems as f64).floor() as usize,
    medium: (0.4 * max_problems as f64).floor() as usize,
    hard: 0,
  };
  // Hard absorbs the remainder: >= 1 hard problem whenever max_problems >= 3.
  dist.hard = (max_problems - dist.easy - dist.medium).max(1);

  // Trim tiers, most expensive first, keeping easy problems as the floor.
  // Terminates: every pass strictly shrinks the total, bounded below by 3.
  while dist.midpoint_minutes() > total_minutes && dist.total() > 3 {
    if dist.hard > 1 {
      dist.hard -= 1;
    } else if dist.medium > 1 {
      dist.medium -= 1;
    } else if dist.easy > 1 {
      dist.easy -= 1;
    } else {
      break;
    }
  }

  dist
}

/// Pick concrete problems for each tier of `dist` out of `pool`.
///
/// Per tier: filter out problems whose topic was already used (diversity
/// preference), shuffle uniformly, take up to the tier count. If the topic
/// filter leaves nothing, fall back to the whole tier pool; duplicate topics
/// are accepted there rather than failing. The combined list is shuffled once
/// more so difficulty ordering is not revealed to the test-taker.
///
/// A tier with no candidates anywhere in the pool silently contributes fewer
/// (possibly zero) problems.
pub fn select_problems(pool: &[Problem], dist: &Distribution) -> Vec<Problem> {
  let mut rng = rand::thread_rng();
  let mut used_topics: HashSet<String> = HashSet::new();
  let mut picked: Vec<Problem> = Vec::with_capacity(dist.total());

  for difficulty in Difficulty::ALL {
    let count = dist.count_for(difficulty);
    if count == 0 {
      continue;
    }

    let tier: Vec<&Problem> = pool.iter().filter(|p| p.difficulty == difficulty).collect();
    let mut fresh: Vec<&Problem> = tier
      .iter()
      .copied()
      .filter(|p| !used_topics.contains(&p.topic_id))
      .collect();

    let chosen: Vec<&Problem> = if fresh.is_empty() {
      // All topics already used (or tier empty): duplication beats starvation.
      let mut any = tier;
      any.shuffle(&mut rng);
      any.into_iter().take(count).collect()
    } else {
      fresh.shuffle(&mut rng);
      fresh.into_iter().take(count).collect()
    };

    for p in &chosen {
      used_topics.insert(p.topic_id.clone());
    }
    picked.extend(chosen.into_iter().cloned());
  }

  picked.shuffle(&mut rng);
  picked
}

/// Full allocation: distribution sizing, selection, then a best-effort trim
/// that pops from the end of the shuffled selection until the midpoint-time
/// sum fits `duration_hours` or the selection is empty.
pub fn allocate(duration_hours: f64, pool: &[Problem]) -> Allocation {
  let distribution = compute_distribution(duration_hours);
  let mut selection = select_problems(pool, &distribution);

  let budget_minutes = duration_hours * 60.0;
  let mut total: f64 = selection.iter().map(|p| p.difficulty.midpoint_minutes()).sum();
  while total > budget_minutes && !selection.is_empty() {
    selection.pop();
    total = selection.iter().map(|p| p.difficulty.midpoint_minutes()).sum();
  }

  Allocation { selection, distribution, total_estimated_minutes: total }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ProblemSource;

  fn problem(id: &str, topic: &str, difficulty: Difficulty) -> Problem {
    Problem {
      id: id.into(),
      subject_id: "s1".into(),
      topic_id: topic.into(),
      difficulty,
      source: ProblemSource::Seed,
      title: format!("problem {id}"),
      description: "Write a function.".into(),
      languages: vec!["python".into(), "rust".into()],
    }
  }

  /// Pool with `n` problems per tier, each on its own topic.
  fn spread_pool(n: usize) -> Vec<Problem> {
    let mut pool = Vec::new();
    for d in Difficulty::ALL {
      for i in 0..n {
        let id = format!("{}-{}", d.as_str(), i);
        let topic = format!("t-{}-{}", d.as_str(), i);
        pool.push(problem(&id, &topic, d));
      }
    }
    pool
  }

  #[test]
  fn short_sessions_get_a_single_easy_problem() {
    for hours in [0.1, 0.25, 0.5, 0.74] {
      let d = compute_distribution(hours);
      assert_eq!(d, Distribution { easy: 1, medium: 0, hard: 0 }, "hours={hours}");
    }
  }

  #[test]
  fn mid_sessions_get_easy_plus_medium() {
    for hours in [0.75, 1.0, 1.25, 1.49] {
      let d = compute_distribution(hours);
      assert_eq!(d, Distribution { easy: 1, medium: 1, hard: 0 }, "hours={hours}");
    }
  }

  #[test]
  fn long_sessions_always_keep_a_hard_problem() {
    for hours in [1.5, 2.0, 2.5, 3.0, 4.0, 8.0] {
      let d = compute_distribution(hours);
      assert!(d.hard >= 1, "hours={hours} dist={d:?}");
    }
  }

  #[test]
  fn total_count_never_exceeds_cap() {
    for hours in [0.25, 1.0, 1.5, 3.0, 5.0, 10.0, 24.0] {
      let d = compute_distribution(hours);
      assert!(d.total() <= MAX_PROBLEMS, "hours={hours} dist={d:?}");
    }
  }

  #[test]
  fn decrement_loop_fits_budget_or_floors_at_three() {
    for hours in [1.5, 1.6, 1.75, 2.0, 2.5, 3.0, 3.5] {
      let d = compute_distribution(hours);
      let minutes = hours * 60.0;
      assert!(
        d.midpoint_minutes() <= minutes || d.total() == 3,
        "hours={hours} dist={d:?} time={}",
        d.midpoint_minutes()
      );
    }
  }

  #[test]
  fn distribution_is_deterministic() {
    for hours in [0.5, 1.0, 1.5, 3.0] {
      assert_eq!(compute_distribution(hours), compute_distribution(hours));
    }
  }

  #[test]
  fn three_hours_fills_to_cap_then_trims_medium() {
    // 180 min: floor(180/17.5) = 10, seeded {4,4,2} = 215 min over budget,
    // so the loop drops hard to 1 (187.5) then medium to 3 (165).
    let d = compute_distribution(3.0);
    assert_eq!(d, Distribution { easy: 4, medium: 3, hard: 1 });
    assert!(d.midpoint_minutes() <= 180.0);
  }

  #[test]
  fn selection_respects_tier_counts_and_difficulties() {
    let pool = spread_pool(5);
    let dist = Distribution { easy: 2, medium: 2, hard: 1 };
    for _ in 0..20 {
      let picked = select_problems(&pool, &dist);
      assert_eq!(picked.len(), 5);
      for d in Difficulty::ALL {
        let n = picked.iter().filter(|p| p.difficulty == d).count();
        assert!(n <= dist.count_for(d), "tier {} overfilled: {n}", d.as_str());
      }
    }
  }

  #[test]
  fn diversity_preference_avoids_repeat_topics_when_possible() {
    let pool = spread_pool(5);
    let dist = Distribution { easy: 3, medium: 3, hard: 3 };
    for _ in 0..20 {
      let picked = select_problems(&pool, &dist);
      let topics: HashSet<&str> = picked.iter().map(|p| p.topic_id.as_str()).collect();
      assert_eq!(topics.len(), picked.len(), "topics repeated despite fresh pool");
    }
  }

  #[test]
  fn exhausted_topics_fall_back_to_duplicates() {
    // Every medium problem shares its topic with the only easy problem, so
    // once the easy tier runs the medium filter is empty; the fallback must
    // still fill the medium count from the unfiltered tier pool.
    let pool = vec![
      problem("e0", "shared", Difficulty::Easy),
      problem("m0", "shared", Difficulty::Medium),
      problem("m1", "shared", Difficulty::Medium),
      problem("m2", "shared", Difficulty::Medium),
    ];
    let dist = Distribution { easy: 1, medium: 2, hard: 0 };
    for _ in 0..20 {
      let picked = select_problems(&pool, &dist);
      assert_eq!(picked.len(), 3);
      assert_eq!(picked.iter().filter(|p| p.difficulty == Difficulty::Medium).count(), 2);
    }
  }

  #[test]
  fn tier_underfill_is_silent() {
    let pool = vec![problem("m0", "t0", Difficulty::Medium)];
    let dist = Distribution { easy: 2, medium: 3, hard: 1 };
    let picked = select_problems(&pool, &dist);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].difficulty, Difficulty::Medium);
  }

  #[test]
  fn half_hour_assessment_is_one_easy_problem() {
    let pool = spread_pool(3);
    let a = allocate(0.5, &pool);
    assert_eq!(a.distribution, Distribution { easy: 1, medium: 0, hard: 0 });
    assert_eq!(a.selection.len(), 1);
    assert_eq!(a.selection[0].difficulty, Difficulty::Easy);
    assert_eq!(a.total_estimated_minutes, 17.5);
  }

  #[test]
  fn one_hour_assessment_stays_within_budget() {
    let pool = spread_pool(4);
    for _ in 0..20 {
      let a = allocate(1.0, &pool);
      assert!(a.selection.len() <= 2);
      assert!(a.total_estimated_minutes <= 60.0);
    }
  }

  #[test]
  fn trim_can_empty_the_selection_for_tiny_durations() {
    // 15 minutes is under even one easy midpoint (17.5).
    let pool = spread_pool(2);
    let a = allocate(0.25, &pool);
    assert!(a.selection.is_empty());
    assert_eq!(a.total_estimated_minutes, 0.0);
  }

  #[test]
  fn allocation_never_exceeds_the_time_budget() {
    let pool = spread_pool(6);
    for hours in [0.5, 1.0, 1.5, 2.0, 3.0] {
      for _ in 0..10 {
        let a = allocate(hours, &pool);
        assert!(
          a.total_estimated_minutes <= hours * 60.0,
          "hours={hours} total={}",
          a.total_estimated_minutes
        );
        let f = a.final_counts();
        assert_eq!(f.total(), a.selection.len());
      }
    }
  }
}
