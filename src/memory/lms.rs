//! Longest-matching-sequence (LMS) scoring.
//!
//! Looks for the longest backward match between the log's tail and any
//! position before the previous goal, then scores the historical
//! continuation from that match to its goal. Long matches that reached the
//! goal quickly score high.

use super::log::EpisodicMemory;
use crate::types::Action;

/// Scores and proposes the historical path behind the longest match.
#[derive(Debug, Clone)]
pub struct LmsScorer {
    constant: f64,
}

/// A scored LMS proposal: the replayed path and its score.
#[derive(Debug, Clone)]
pub struct LmsEvaluation {
    pub score: f64,
    pub path: Vec<Action>,
}

impl LmsScorer {
    /// Create a scorer with the given score weight.
    pub fn new(constant: f64) -> Self {
        LmsScorer { constant }
    }

    /// Find the position (index after the match start) and length of the
    /// longest substring before the previous goal that matches the log's
    /// tail. Both zero when there is no prior goal, the goal just
    /// happened, or nothing matches.
    pub fn max_matched_string(&self, memory: &EpisodicMemory) -> (usize, usize) {
        let Some(last_goal) = memory.find_last_goal(memory.len()) else {
            return (0, 0);
        };
        if last_goal == memory.len() - 1 {
            return (0, 0);
        }

        let mut best_index = 0;
        let mut best_length = 0;
        for index in (0..last_goal).rev() {
            let length = memory.matched_length(index);
            if length > best_length {
                best_length = length;
                best_index = index + 1;
            }
        }
        (best_index, best_length)
    }

    /// Score the longest match: `constant * match_len / steps_to_goal`.
    ///
    /// The proposed path is the historical continuation from the match to
    /// the next goal; score 0 and an empty path when there is nothing to
    /// replay.
    pub fn evaluate(&self, memory: &EpisodicMemory) -> LmsEvaluation {
        let (index, length) = self.max_matched_string(memory);
        let path = memory.steps_to_goal(index);
        if length == 0 || path.is_empty() {
            return LmsEvaluation {
                score: 0.0,
                path: Vec::new(),
            };
        }
        let score = self.constant * length as f64 / path.len() as f64;
        LmsEvaluation { score, path }
    }
}
