//! Core domain types: actions, alphabets, sensor outcomes, and episodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a state in the generated machine, in `[0, num_states)`.
pub type StateId = usize;

/// One action the agent can take, drawn from the environment's alphabet.
///
/// Actions are lowercase letters starting at `'a'`, which keeps action
/// sequences printable and comparable against hand-written fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Action(char);

impl Action {
    /// Create an action, validating it's a lowercase letter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] for anything outside `'a'..='z'`.
    pub fn new(letter: char) -> Result<Self, crate::Error> {
        if letter.is_ascii_lowercase() {
            Ok(Action(letter))
        } else {
            Err(crate::Error::InvalidAction { action: letter })
        }
    }

    /// The action at a given alphabet slot (`0 -> 'a'`, `1 -> 'b'`, ...).
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < 26);
        Action((b'a' + index as u8) as char)
    }

    /// Get the underlying letter.
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered set of actions available in an environment.
///
/// Size is restricted to `[2, 26]`: at least two letters so the agent has a
/// real choice, at most one per letter of the latin alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    actions: Vec<Action>,
}

impl Alphabet {
    /// Create an alphabet of the first `size` letters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] when `size` is outside `[2, 26]`.
    pub fn new(size: usize) -> Result<Self, crate::Error> {
        if !(2..=26).contains(&size) {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("alphabet size {size} must be in [2, 26]"),
            });
        }
        Ok(Alphabet {
            actions: (0..size).map(Action::from_index).collect(),
        })
    }

    /// Number of actions in the alphabet.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always false; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// All actions, in order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The slot of an action within this alphabet, if it belongs to it.
    pub fn index_of(&self, action: Action) -> Option<usize> {
        self.actions.iter().position(|&a| a == action)
    }

    /// The action at a given slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn action(&self, index: usize) -> Action {
        self.actions[index]
    }

    /// Parse a compact action string (e.g. `"aba"`) against this alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] on any letter outside the alphabet.
    pub fn parse_sequence(&self, s: &str) -> Result<Vec<Action>, crate::Error> {
        s.chars()
            .map(|c| {
                let action = Action::new(c)?;
                if self.index_of(action).is_some() {
                    Ok(action)
                } else {
                    Err(crate::Error::InvalidAction { action: c })
                }
            })
            .collect()
    }
}

/// Render an action sequence as a compact string (e.g. `"aba"`).
pub fn format_sequence(sequence: &[Action]) -> String {
    sequence.iter().map(Action::as_char).collect()
}

/// Raw sensor readings returned by one environment tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensors {
    /// The action moved the agent to a different state.
    pub new_state: bool,
    /// The action landed on the goal state.
    pub goal: bool,
}

impl Sensors {
    /// Collapse the two sensor bits into the encoded outcome.
    pub fn encode(&self) -> Outcome {
        if self.goal {
            Outcome::Goal
        } else if self.new_state {
            Outcome::TransitionOnly
        } else {
            Outcome::NoTransition
        }
    }
}

/// Encoded sensor outcome stored in episodic memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The action left the agent in the same state.
    NoTransition,
    /// The action moved the agent to a new, non-goal state.
    TransitionOnly,
    /// The action reached the goal.
    Goal,
}

/// One recorded (action, outcome) pair.
///
/// The sentinel episode that seeds every log carries no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub action: Option<Action>,
    pub outcome: Outcome,
}

impl Episode {
    /// Create an episode for an executed action.
    pub fn new(action: Action, outcome: Outcome) -> Self {
        Episode {
            action: Some(action),
            outcome,
        }
    }

    /// The "no prior action" entry that seeds every log.
    pub fn sentinel() -> Self {
        Episode {
            action: None,
            outcome: Outcome::NoTransition,
        }
    }

    /// Whether this is the sentinel entry.
    pub fn is_sentinel(&self) -> bool {
        self.action.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_validation() {
        assert!(Action::new('a').is_ok());
        assert!(Action::new('z').is_ok());
        assert!(Action::new('A').is_err());
        assert!(Action::new('1').is_err());
    }

    #[test]
    fn test_alphabet_bounds() {
        assert!(Alphabet::new(1).is_err());
        assert!(Alphabet::new(27).is_err());
        let alphabet = Alphabet::new(3).unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.action(2).as_char(), 'c');
        assert_eq!(alphabet.index_of(Action::new('b').unwrap()), Some(1));
        assert_eq!(alphabet.index_of(Action::new('d').unwrap()), None);
    }

    #[test]
    fn test_parse_sequence_rejects_foreign_letters() {
        let alphabet = Alphabet::new(2).unwrap();
        assert!(alphabet.parse_sequence("abba").is_ok());
        assert!(alphabet.parse_sequence("abc").is_err());
    }

    #[test]
    fn test_sensor_encoding() {
        let goal = Sensors {
            new_state: true,
            goal: true,
        };
        let moved = Sensors {
            new_state: true,
            goal: false,
        };
        let stuck = Sensors {
            new_state: false,
            goal: false,
        };
        assert_eq!(goal.encode(), Outcome::Goal);
        assert_eq!(moved.encode(), Outcome::TransitionOnly);
        assert_eq!(stuck.encode(), Outcome::NoTransition);
    }

    #[test]
    fn test_sentinel_never_matches_real_episode() {
        let real = Episode::new(Action::new('a').unwrap(), Outcome::NoTransition);
        assert_ne!(Episode::sentinel(), real);
        assert!(Episode::sentinel().is_sentinel());
        assert!(!real.is_sentinel());
    }
}
