//! Append-only record of (action, outcome) pairs for one agent run.

use crate::{
    error::{Error, Result},
    types::{Action, Episode, Outcome, Sensors},
};

/// The agent's episodic memory: an ordered, append-only sequence of
/// episodes, seeded with a sentinel "no prior action" entry.
///
/// Single owner, single writer; the log only grows for the lifetime of a
/// run and is discarded with it.
#[derive(Debug, Clone)]
pub struct EpisodicMemory {
    episodes: Vec<Episode>,
}

impl EpisodicMemory {
    /// Create a log holding only the sentinel entry.
    pub fn new() -> Self {
        EpisodicMemory {
            episodes: vec![Episode::sentinel()],
        }
    }

    /// Rebuild a log from raw episodes, checking the sentinel invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSentinel`] unless the first episode is the
    /// sentinel.
    pub fn from_episodes(episodes: Vec<Episode>) -> Result<Self> {
        match episodes.first() {
            Some(first) if first.is_sentinel() => Ok(EpisodicMemory { episodes }),
            _ => Err(Error::MissingSentinel),
        }
    }

    /// Number of episodes, sentinel included.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Always false: the sentinel is never removed.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// All episodes in order.
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// The episode at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Episode> {
        self.episodes.get(index)
    }

    /// The most recent episode (the sentinel when nothing has happened).
    pub fn last(&self) -> &Episode {
        &self.episodes[self.episodes.len() - 1]
    }

    /// The most recently executed action, if any.
    pub fn last_action(&self) -> Option<Action> {
        self.last().action
    }

    /// Append an episode for an executed action.
    pub fn push(&mut self, action: Action, outcome: Outcome) {
        self.episodes.push(Episode::new(action, outcome));
    }

    /// Encode raw sensors and append the resulting episode.
    pub fn record(&mut self, action: Action, sensors: Sensors) -> Outcome {
        let outcome = sensors.encode();
        self.push(action, outcome);
        outcome
    }

    /// Overwrite the tail episode's action.
    ///
    /// The tail stands for the present moment during candidate sweeps; its
    /// action is provisional until the step is actually executed.
    pub(crate) fn set_last_action(&mut self, action: Action) {
        let index = self.episodes.len() - 1;
        self.episodes[index].action = Some(action);
    }

    /// Length of the backward match between the log's tail and the episode
    /// run ending at `end_index`.
    ///
    /// Walks backward from the tail and from `end_index` in lockstep while
    /// consecutive (action, outcome) pairs are equal; 0 when the pair at
    /// `end_index` already differs.
    pub fn matched_length(&self, end_index: usize) -> usize {
        let mut length = 0;
        let mut tail = self.episodes.len() - 1;
        let mut index = end_index;
        loop {
            if self.episodes[index] != self.episodes[tail] {
                return length;
            }
            length += 1;
            if index == 0 || tail == 0 {
                return length;
            }
            index -= 1;
            tail -= 1;
        }
    }

    /// Index of the nearest goal episode strictly before `before`.
    ///
    /// The sentinel position is never consulted.
    pub fn find_last_goal(&self, before: usize) -> Option<usize> {
        let upper = before.min(self.episodes.len());
        (1..upper)
            .rev()
            .find(|&index| self.episodes[index].outcome == Outcome::Goal)
    }

    /// The actions from `index` forward, up to and including the next goal
    /// episode. Empty when `index` is 0 (nothing to replay).
    pub fn steps_to_goal(&self, index: usize) -> Vec<Action> {
        let mut steps = Vec::new();
        if index == 0 {
            return steps;
        }
        for episode in &self.episodes[index..] {
            if let Some(action) = episode.action {
                steps.push(action);
            }
            if episode.outcome == Outcome::Goal {
                break;
            }
        }
        steps
    }

    /// The actions taken since the last completed goal.
    pub fn most_recent_path(&self) -> Vec<Action> {
        let start = self
            .find_last_goal(self.episodes.len().saturating_sub(2))
            .map_or(1, |goal| goal + 1);
        self.episodes[start.min(self.episodes.len())..]
            .iter()
            .filter_map(|episode| episode.action)
            .collect()
    }

    /// Episode counts between successive goals: one entry per goal reached,
    /// measured from the previous goal (or the start of the run).
    pub fn goal_intervals(&self) -> Vec<usize> {
        let mut intervals = Vec::new();
        let mut previous = 0;
        for (index, episode) in self.episodes.iter().enumerate() {
            if episode.outcome == Outcome::Goal {
                intervals.push(index - previous);
                previous = index;
            }
        }
        intervals
    }
}

impl Default for EpisodicMemory {
    fn default() -> Self {
        Self::new()
    }
}
