//! The environment handle: validated transition table, shortest paths,
//! current state, and the tick/reset cycle.

use std::fmt;

use rand::{Rng, rngs::StdRng};

use super::{blind_path, generator, shortest_paths};
use crate::{
    config::{EnvironmentConfig, build_rng},
    error::{Error, Result},
    types::{Action, Alphabet, Sensors, StateId},
};

/// A randomly generated finite-state world the agent explores.
///
/// The transition table is read-only after construction; every state is
/// guaranteed to reach the goal (the last state). The agent interacts only
/// through [`Environment::tick`], which reports whether the state changed
/// and whether the goal was reached, resetting to a random non-goal state
/// on success.
pub struct Environment {
    transitions: Vec<Vec<StateId>>,
    alphabet: Alphabet,
    /// Shortest action sequence from each state to the goal.
    paths: Vec<Vec<Action>>,
    current: StateId,
    rng: StdRng,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("num_states", &self.num_states())
            .field("alphabet_size", &self.alphabet.len())
            .field("current", &self.current)
            .finish()
    }
}

impl Environment {
    /// Generate a random environment per the configuration.
    ///
    /// Regenerates on connectivity failure up to the configured attempt
    /// budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for bad dimensions and
    /// [`Error::GenerationFailed`] when the budget is exhausted.
    pub fn generate(config: &EnvironmentConfig) -> Result<Self> {
        config.validate()?;
        let alphabet = Alphabet::new(config.alphabet_size)?;
        let mut rng = build_rng(config.seed);
        let (transitions, paths) = generator::generate_connected(config, &alphabet, &mut rng)?;
        Ok(Self {
            transitions,
            alphabet,
            paths,
            current: 0,
            rng,
        })
    }

    /// Build an environment from a hand-written transition table.
    ///
    /// Intended for tests and worked examples; the table is validated the
    /// same way generated ones are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for malformed tables and
    /// [`Error::UnreachableState`] when some state cannot reach the goal.
    pub fn from_transitions(transitions: Vec<Vec<StateId>>, alphabet_size: usize) -> Result<Self> {
        let alphabet = Alphabet::new(alphabet_size)?;
        let num_states = transitions.len();
        if num_states < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("transition table has {num_states} states, need at least 2"),
            });
        }
        for (state, row) in transitions.iter().enumerate() {
            if row.len() != alphabet_size {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "state {state} has {} transitions, expected {alphabet_size}",
                        row.len()
                    ),
                });
            }
            if let Some(&bad) = row.iter().find(|&&next| next >= num_states) {
                return Err(Error::InvalidConfiguration {
                    message: format!("state {state} transitions to out-of-range state {bad}"),
                });
            }
        }

        let solved = shortest_paths::solve(&transitions, &alphabet);
        if let Some(state) = shortest_paths::first_unreachable(&solved) {
            return Err(Error::UnreachableState { state });
        }
        Ok(Self {
            transitions,
            alphabet,
            paths: solved.into_iter().flatten().collect(),
            current: 0,
            rng: build_rng(None),
        })
    }

    /// Seed the RNG used for post-goal resets.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    /// Number of states in the machine.
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// The designated terminal state.
    pub fn goal_state(&self) -> StateId {
        self.num_states() - 1
    }

    /// The state the agent is currently in.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// The environment's action alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The exact shortest action sequence from a state to the goal.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn shortest_path(&self, state: StateId) -> &[Action] {
        &self.paths[state]
    }

    /// Mean shortest-path length over all non-goal states.
    pub fn average_shortest_path_len(&self) -> f64 {
        let sum: usize = self.paths[..self.goal_state()]
            .iter()
            .map(Vec::len)
            .sum();
        sum as f64 / self.goal_state() as f64
    }

    /// Take one action: update the current state and report the sensors.
    ///
    /// On reaching the goal the environment resets itself to a uniformly
    /// random non-goal state before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] for actions outside the alphabet.
    pub fn tick(&mut self, action: Action) -> Result<Sensors> {
        let slot = self
            .alphabet
            .index_of(action)
            .ok_or(Error::InvalidAction {
                action: action.as_char(),
            })?;
        let next = self.transitions[self.current][slot];

        let new_state = next != self.current;
        if new_state {
            self.current = next;
        }

        let goal = next == self.goal_state();
        if goal {
            self.reset();
        }

        Ok(Sensors { new_state, goal })
    }

    /// Move to a random non-goal state after a success.
    fn reset(&mut self) {
        self.current = self.rng.random_range(0..self.goal_state());
    }

    /// The state reached by following `path` from `begin`.
    ///
    /// Does not move the agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] for actions outside the alphabet.
    pub fn path_result(&self, begin: StateId, path: &[Action]) -> Result<StateId> {
        let mut state = begin;
        for &action in path {
            let slot = self
                .alphabet
                .index_of(action)
                .ok_or(Error::InvalidAction {
                    action: action.as_char(),
                })?;
            state = self.transitions[state][slot];
        }
        Ok(state)
    }

    /// One action sequence that reaches the goal from every state,
    /// found by an A*-style search over the joint state.
    ///
    /// The search cost is exponential in the number of states; callers are
    /// responsible for keeping the machine small.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchExhausted`] if the frontier empties, which a
    /// validated table cannot produce.
    pub fn shortest_blind_path_to_goal(&self) -> Result<Vec<Action>> {
        blind_path::search(self)
    }

    /// Average number of steps to reach the goal over all non-goal starting
    /// states, given a path that reaches the goal from every one of them.
    ///
    /// A position stops advancing once it reaches the goal; the step index
    /// at which it arrived is what enters the average.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathDoesNotCoverAllStates`] when some starting state
    /// never reaches the goal along `path`, and [`Error::InvalidAction`] for
    /// actions outside the alphabet.
    pub fn avg_steps_to_goal_with_path(&self, path: &[Action]) -> Result<f64> {
        let goal = self.goal_state();
        let mut positions: Vec<StateId> = (0..self.num_states()).collect();
        let mut sum = 0usize;
        let mut reached = 0usize;

        for (step, &action) in path.iter().enumerate() {
            let slot = self
                .alphabet
                .index_of(action)
                .ok_or(Error::InvalidAction {
                    action: action.as_char(),
                })?;
            for position in positions.iter_mut() {
                if *position != goal {
                    *position = self.transitions[*position][slot];
                    if *position == goal {
                        sum += step;
                        reached += 1;
                    }
                }
            }
        }

        let expected = self.num_states() - 1;
        if reached != expected {
            return Err(Error::PathDoesNotCoverAllStates { reached, expected });
        }
        Ok(sum as f64 / reached as f64)
    }

    /// Internal transition lookup for the blind-path search.
    pub(crate) fn transition(&self, state: StateId, slot: usize) -> StateId {
        self.transitions[state][slot]
    }

    /// Render the machine as a Graphviz digraph.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph finite_state_machine {\n");
        out.push_str("    node [shape = doublecircle]; Goal;\n");
        out.push_str("    node [shape = circle];\n");

        for src in 0..self.goal_state() {
            for dest in 0..self.num_states() {
                let labels: Vec<String> = self
                    .alphabet
                    .actions()
                    .iter()
                    .enumerate()
                    .filter(|&(slot, _)| self.transitions[src][slot] == dest)
                    .map(|(_, action)| action.to_string())
                    .collect();
                if labels.is_empty() {
                    continue;
                }
                let dest_name = if dest == self.goal_state() {
                    "Goal".to_string()
                } else {
                    format!("S{dest}")
                };
                out.push_str(&format!(
                    "    S{src} -> {dest_name} [ label = \"{}\" ];\n",
                    labels.join(",")
                ));
            }
        }

        out.push_str("}\n");
        out
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "     ")?;
        for action in self.alphabet.actions() {
            write!(f, "{action:>3}")?;
        }
        writeln!(f)?;
        for (state, row) in self.transitions.iter().enumerate() {
            write!(f, "{state:>3}: ")?;
            for next in row {
                write!(f, "{next:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
