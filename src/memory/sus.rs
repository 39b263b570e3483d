//! Shortest-unperformed-sequence (SUS) tracking.
//!
//! Enumerates every action sequence up to a bounded length and crosses off
//! each one the first time it shows up as a contiguous substring of the
//! log. The shortest sequence still pending is the SUS; its score biases
//! exploration toward untried short sequences.

use super::log::EpisodicMemory;
use crate::types::{Action, Alphabet};

/// Per-length pending sets of not-yet-performed action sequences.
///
/// Shrink-only: sequences are removed when observed (or handed out) and
/// never re-added.
#[derive(Debug, Clone)]
pub struct SusTracker {
    /// `pending[len]` holds the unperformed sequences of that length;
    /// slot 0 stays empty.
    pending: Vec<Vec<Vec<Action>>>,
    max_sequence_size: usize,
    constant: f64,
}

impl SusTracker {
    /// Enumerate all `K^len` sequences for each length `1..=max_sequence_size`.
    pub fn new(alphabet: &Alphabet, max_sequence_size: usize, constant: f64) -> Self {
        let mut pending = Vec::with_capacity(max_sequence_size + 1);
        pending.push(Vec::new());
        for length in 1..=max_sequence_size {
            pending.push(enumerate_sequences(alphabet, length));
        }
        SusTracker {
            pending,
            max_sequence_size,
            constant,
        }
    }

    /// Rescan the trailing window of the log after executing a path of
    /// `executed_len` actions, removing every observed substring from its
    /// pending set.
    ///
    /// The window covers the newly appended episodes plus enough context
    /// for sequences that straddle the boundary; it starts at
    /// `max(1, len - (max_sequence_size + executed_len) - 1)`.
    pub fn note_executed(&mut self, memory: &EpisodicMemory, executed_len: usize) {
        let log_len = memory.len();
        for length in 1..=self.max_sequence_size {
            if self.pending[length].is_empty() {
                continue;
            }
            // The sentinel doesn't count toward usable history.
            if length > log_len - 1 {
                break;
            }

            let changed = self.max_sequence_size + executed_len;
            let start = log_len.saturating_sub(changed + 1).max(1);
            for begin in start..=log_len - length {
                let Some(observed) = collect_actions(memory, begin, length) else {
                    continue;
                };
                if let Some(found) = self.pending[length]
                    .iter()
                    .position(|sequence| sequence == &observed)
                {
                    self.pending[length].remove(found);
                }
            }
        }
    }

    /// Remove and return the first pending sequence of the shortest
    /// non-exhausted length, or `None` when every length is exhausted.
    pub fn take_shortest(&mut self) -> Option<Vec<Action>> {
        self.pending
            .iter_mut()
            .find(|bucket| !bucket.is_empty())
            .map(|bucket| bucket.remove(0))
    }

    /// The first pending sequence that `take_shortest` would return.
    pub fn peek_shortest(&self) -> Option<&Vec<Action>> {
        self.pending
            .iter()
            .find(|bucket| !bucket.is_empty())
            .and_then(|bucket| bucket.first())
    }

    /// Length of the shortest non-exhausted pending set.
    pub fn shortest_pending_len(&self) -> Option<usize> {
        (1..=self.max_sequence_size).find(|&length| !self.pending[length].is_empty())
    }

    /// `constant / triangular(shortest_pending_len)`, 0 when exhausted.
    pub fn score(&self) -> f64 {
        match self.shortest_pending_len() {
            Some(length) => self.constant / triangular(length),
            None => 0.0,
        }
    }

    /// How many sequences of a given length are still pending.
    pub fn pending_count(&self, length: usize) -> usize {
        self.pending.get(length).map_or(0, Vec::len)
    }
}

/// All sequences of exactly `length` actions, in lexicographic order,
/// built by iterative prefix extension.
fn enumerate_sequences(alphabet: &Alphabet, length: usize) -> Vec<Vec<Action>> {
    let mut sequences: Vec<Vec<Action>> = vec![Vec::new()];
    for _ in 0..length {
        let mut extended = Vec::with_capacity(sequences.len() * alphabet.len());
        for prefix in &sequences {
            for &action in alphabet.actions() {
                let mut sequence = Vec::with_capacity(prefix.len() + 1);
                sequence.extend_from_slice(prefix);
                sequence.push(action);
                extended.push(sequence);
            }
        }
        sequences = extended;
    }
    sequences
}

/// The actions of `length` consecutive episodes starting at `begin`,
/// or `None` if the window touches the sentinel.
fn collect_actions(memory: &EpisodicMemory, begin: usize, length: usize) -> Option<Vec<Action>> {
    (begin..begin + length)
        .map(|index| memory.get(index).and_then(|episode| episode.action))
        .collect()
}

/// n-th triangular number as a float.
fn triangular(n: usize) -> f64 {
    (n * (n + 1) / 2) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, format_sequence};

    fn tracker() -> SusTracker {
        SusTracker::new(&Alphabet::new(2).unwrap(), 3, 10.0)
    }

    #[test]
    fn test_initial_pending_counts() {
        let tracker = tracker();
        assert_eq!(tracker.pending_count(1), 2);
        assert_eq!(tracker.pending_count(2), 4);
        assert_eq!(tracker.pending_count(3), 8);
        assert_eq!(tracker.shortest_pending_len(), Some(1));
    }

    #[test]
    fn test_executing_one_action_removes_its_singleton() {
        let mut tracker = tracker();
        let mut memory = EpisodicMemory::new();
        memory.push(Action::new('a').unwrap(), Outcome::TransitionOnly);
        tracker.note_executed(&memory, 1);

        assert_eq!(tracker.pending_count(1), 1);
        let remaining = tracker.peek_shortest().unwrap();
        assert_eq!(format_sequence(remaining), "b");
        // Longer sequences need more history before they can be observed.
        assert_eq!(tracker.pending_count(2), 4);
    }

    #[test]
    fn test_observed_substrings_of_all_lengths_are_removed() {
        let mut tracker = tracker();
        let mut memory = EpisodicMemory::new();
        for letter in ['a', 'b', 'a'] {
            memory.push(Action::new(letter).unwrap(), Outcome::TransitionOnly);
        }
        tracker.note_executed(&memory, 3);

        // Singles a and b, pairs ab and ba, triple aba.
        assert_eq!(tracker.pending_count(1), 0);
        assert_eq!(tracker.pending_count(2), 2);
        assert_eq!(tracker.pending_count(3), 7);
        assert_eq!(tracker.shortest_pending_len(), Some(2));
    }

    #[test]
    fn test_take_shortest_hands_out_in_enumeration_order() {
        let mut tracker = tracker();
        assert_eq!(format_sequence(&tracker.take_shortest().unwrap()), "a");
        assert_eq!(format_sequence(&tracker.take_shortest().unwrap()), "b");
        assert_eq!(format_sequence(&tracker.take_shortest().unwrap()), "aa");
        assert_eq!(tracker.shortest_pending_len(), Some(2));
    }

    #[test]
    fn test_score_uses_triangular_numbers() {
        let mut tracker = tracker();
        assert!((tracker.score() - 10.0).abs() < 1e-12); // T(1) = 1

        while tracker.pending_count(1) > 0 {
            tracker.take_shortest();
        }
        assert!((tracker.score() - 10.0 / 3.0).abs() < 1e-12); // T(2) = 3
    }

    #[test]
    fn test_score_zero_when_exhausted() {
        let mut tracker = SusTracker::new(&Alphabet::new(2).unwrap(), 1, 10.0);
        tracker.take_shortest();
        tracker.take_shortest();
        assert_eq!(tracker.shortest_pending_len(), None);
        assert!(tracker.take_shortest().is_none());
        assert_eq!(tracker.score(), 0.0);
    }
}
