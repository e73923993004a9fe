//! Seed data: a minimal curriculum that guarantees the app is useful even
//! without external config or OpenAI.

use crate::domain::{Difficulty, Problem, ProblemSource, Subject, Topic};

pub fn seed_subjects() -> Vec<Subject> {
  vec![
    Subject { id: "sub-algo".into(), name: "Algorithms".into() },
    Subject { id: "sub-ds".into(), name: "Data Structures".into() },
  ]
}

pub fn seed_topics() -> Vec<Topic> {
  vec![
    Topic { id: "top-arrays".into(), subject_id: "sub-algo".into(), name: "Arrays".into() },
    Topic { id: "top-strings".into(), subject_id: "sub-algo".into(), name: "Strings".into() },
    Topic { id: "top-sorting".into(), subject_id: "sub-algo".into(), name: "Sorting".into() },
    Topic { id: "top-graphs".into(), subject_id: "sub-algo".into(), name: "Graphs".into() },
    Topic { id: "top-stacks".into(), subject_id: "sub-ds".into(), name: "Stacks & Queues".into() },
    Topic { id: "top-hashing".into(), subject_id: "sub-ds".into(), name: "Hash Tables".into() },
  ]
}

fn seed_problem(
  id: &str,
  topic_id: &str,
  subject_id: &str,
  difficulty: Difficulty,
  title: &str,
  description: &str,
) -> Problem {
  Problem {
    id: id.into(),
    subject_id: subject_id.into(),
    topic_id: topic_id.into(),
    difficulty,
    source: ProblemSource::Seed,
    title: title.into(),
    description: description.into(),
    languages: vec!["python".into(), "javascript".into(), "rust".into()],
  }
}

/// Built-in problem bank spanning every difficulty and several topics, so the
/// allocator can always build a mixed assessment out of the box.
pub fn seed_problems() -> Vec<Problem> {
  vec![
    seed_problem(
      "p-sumarr", "top-arrays", "sub-algo", Difficulty::Easy,
      "Sum of an array",
      "Given an array of integers, return the sum of its elements. Input: one line of space-separated integers. Output: a single integer. Example: '1 2 3' -> 6.",
    ),
    seed_problem(
      "p-maxarr", "top-arrays", "sub-algo", Difficulty::Easy,
      "Maximum element",
      "Return the largest value in a non-empty integer array. Example: '4 17 2' -> 17.",
    ),
    seed_problem(
      "p-revstr", "top-strings", "sub-algo", Difficulty::Easy,
      "Reverse a string",
      "Return the input string reversed. Example: 'hello' -> 'olleh'.",
    ),
    seed_problem(
      "p-parens", "top-stacks", "sub-ds", Difficulty::Easy,
      "Balanced brackets",
      "Given a string of '()[]{}' characters, return true if every bracket is closed in the correct order. Example: '([])' -> true, '([)]' -> false.",
    ),
    seed_problem(
      "p-anagram", "top-strings", "sub-algo", Difficulty::Medium,
      "Group anagrams",
      "Given a list of lowercase words, group the words that are anagrams of each other and output the groups in any order. Example: ['eat','tea','tan'] -> [['eat','tea'],['tan']].",
    ),
    seed_problem(
      "p-merge", "top-sorting", "sub-algo", Difficulty::Medium,
      "Merge intervals",
      "Given a list of [start, end] intervals, merge all overlapping intervals and return the result sorted by start. Example: [[1,3],[2,6],[8,10]] -> [[1,6],[8,10]].",
    ),
    seed_problem(
      "p-twosum", "top-hashing", "sub-ds", Difficulty::Medium,
      "Two sum",
      "Given an integer array and a target, return the indices of two distinct elements that add up to the target, or 'none'. Example: [2,7,11,15], target 9 -> (0,1).",
    ),
    seed_problem(
      "p-rotate", "top-arrays", "sub-algo", Difficulty::Medium,
      "Rotate array in place",
      "Rotate an integer array to the right by k positions using O(1) extra space. Example: [1,2,3,4,5], k=2 -> [4,5,1,2,3].",
    ),
    seed_problem(
      "p-qsort", "top-sorting", "sub-algo", Difficulty::Medium,
      "Kth smallest element",
      "Find the k-th smallest element of an unsorted integer array in better than O(n log n) average time. Example: [7,10,4,3,20,15], k=3 -> 7.",
    ),
    seed_problem(
      "p-cycle", "top-graphs", "sub-algo", Difficulty::Hard,
      "Detect a cycle in a directed graph",
      "Given a directed graph as an adjacency list, return true if it contains a cycle. Input: n nodes and a list of edges (u, v). Example: edges [(0,1),(1,2),(2,0)] -> true.",
    ),
    seed_problem(
      "p-paths", "top-graphs", "sub-algo", Difficulty::Hard,
      "Shortest path with weights",
      "Given a weighted directed graph with non-negative weights, compute the shortest distance from node 0 to every node, or -1 if unreachable.",
    ),
    seed_problem(
      "p-lru", "top-hashing", "sub-ds", Difficulty::Hard,
      "LRU cache",
      "Implement an LRU cache with capacity c supporting get(key) and put(key, value), both in O(1) average time. Evict the least recently used entry on overflow.",
    ),
    seed_problem(
      "p-median", "top-stacks", "sub-ds", Difficulty::Hard,
      "Running median",
      "Read a stream of integers and after each one output the median of everything read so far, in O(log n) per element.",
    ),
  ]
}
