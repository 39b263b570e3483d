//! A*-style search for a single action sequence that reaches the goal
//! from every possible starting state.
//!
//! Each node tracks where the agent would be for every hypothetical start.
//! The heuristic is the sum of the remaining per-position shortest-path
//! lengths. That sum is not a proven admissible bound on the joint
//! problem's worst-case remaining cost, so strict A* optimality is not
//! guaranteed; the returned path is still valid and short in practice.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use super::machine::Environment;
use crate::{
    error::{Error, Result},
    types::{Action, StateId},
};

/// One frontier node: a candidate path and the per-start positions it
/// leads to.
#[derive(Clone)]
struct PathNode {
    positions: Vec<StateId>,
    path: Vec<Action>,
    g: usize,
    h: usize,
}

impl PathNode {
    /// Root node: every start maps to itself, empty path.
    fn root(env: &Environment) -> Self {
        let positions: Vec<StateId> = (0..env.num_states()).collect();
        let mut node = PathNode {
            positions,
            path: Vec::new(),
            g: 0,
            h: 0,
        };
        node.update_h(env);
        node
    }

    fn f(&self) -> usize {
        self.g + self.h
    }

    /// Sum of remaining shortest-path lengths across all positions.
    fn update_h(&mut self, env: &Environment) {
        self.h = self
            .positions
            .iter()
            .map(|&position| env.shortest_path(position).len())
            .sum();
    }

    /// Append an action: every non-goal position advances along it.
    /// Goal positions are absorbing.
    fn advance(&mut self, env: &Environment, action: Action, slot: usize) {
        let goal = env.goal_state();
        for position in self.positions.iter_mut() {
            if *position != goal {
                *position = env.transition(*position, slot);
            }
        }
        self.path.push(action);
        self.g += 1;
        self.update_h(env);
    }

    fn all_goal(&self, goal: StateId) -> bool {
        self.positions.iter().all(|&position| position == goal)
    }
}

// Frontier order: ascending f, then g, then path, so ordering is
// deterministic for a given table.
impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.f(), self.g, &self.path).cmp(&(other.f(), other.g, &other.path))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

/// Run the search. The goal test fires on node creation: the first child
/// whose every position sits at the goal yields the result path.
pub(crate) fn search(env: &Environment) -> Result<Vec<Action>> {
    let goal = env.goal_state();
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse(PathNode::root(env)));

    while let Some(Reverse(parent)) = frontier.pop() {
        for (slot, &action) in env.alphabet().actions().iter().enumerate() {
            let mut child = parent.clone();
            child.advance(env, action, slot);
            if child.all_goal(goal) {
                return Ok(child.path);
            }
            frontier.push(Reverse(child));
        }
    }

    Err(Error::SearchExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::format_sequence;

    #[test]
    fn test_single_action_blind_path() {
        // transition[0][a] = 1 (goal), transition[0][b] = 0
        let env = Environment::from_transitions(vec![vec![1, 0], vec![1, 1]], 2).unwrap();
        let path = env.shortest_blind_path_to_goal().unwrap();
        assert_eq!(format_sequence(&path), "a");
    }

    #[test]
    fn test_blind_path_covers_every_start() {
        // 4-state chain with a distracting back edge.
        let transitions = vec![
            vec![1, 0],
            vec![2, 0],
            vec![3, 1],
            vec![3, 3],
        ];
        let env = Environment::from_transitions(transitions, 2).unwrap();
        let path = env.shortest_blind_path_to_goal().unwrap();
        for start in 0..env.num_states() {
            // Walk until the goal absorbs the position.
            let mut state = start;
            for &action in &path {
                if state == env.goal_state() {
                    break;
                }
                state = env.path_result(state, &[action]).unwrap();
            }
            assert_eq!(state, env.goal_state(), "start {start} not covered");
        }
    }

    #[test]
    fn test_blind_path_is_deterministic() {
        let transitions = vec![vec![1, 2, 0], vec![2, 1, 0], vec![2, 2, 2]];
        let env = Environment::from_transitions(transitions.clone(), 3).unwrap();
        let first = env.shortest_blind_path_to_goal().unwrap();
        let env2 = Environment::from_transitions(transitions, 3).unwrap();
        let second = env2.shortest_blind_path_to_goal().unwrap();
        assert_eq!(first, second);
    }
}
