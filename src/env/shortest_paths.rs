//! Exact shortest paths from every state to the goal.
//!
//! Works backward from the goal with a FIFO queue: any state with a
//! transition into an already-solved state gets that transition's action
//! prepended to the solved state's path. FIFO order guarantees minimal
//! path lengths; ties fall to discovery order and are not unique.

use std::collections::VecDeque;

use crate::types::{Action, Alphabet, StateId};

/// Compute the shortest action sequence from each state to the goal
/// (the last state). Unreachable states stay `None`.
pub(crate) fn solve(
    transitions: &[Vec<StateId>],
    alphabet: &Alphabet,
) -> Vec<Option<Vec<Action>>> {
    let num_states = transitions.len();
    let goal = num_states - 1;

    let mut paths: Vec<Option<Vec<Action>>> = vec![None; num_states];
    paths[goal] = Some(Vec::new());

    let mut queue = VecDeque::new();
    queue.push_back(goal);

    while let Some(current) = queue.pop_front() {
        let Some(base) = paths[current].clone() else {
            continue;
        };
        for state in 0..num_states {
            if paths[state].is_some() {
                continue;
            }
            if let Some(slot) = transitions[state].iter().position(|&next| next == current) {
                let mut path = Vec::with_capacity(base.len() + 1);
                path.push(alphabet.action(slot));
                path.extend_from_slice(&base);
                paths[state] = Some(path);
                queue.push_back(state);
            }
        }
    }

    paths
}

/// The lowest-numbered state with no path, if any.
pub(crate) fn first_unreachable(paths: &[Option<Vec<Action>>]) -> Option<StateId> {
    paths.iter().position(Option::is_none)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::format_sequence;

    fn two_letter_alphabet() -> Alphabet {
        Alphabet::new(2).unwrap()
    }

    #[test]
    fn test_goal_path_is_empty() {
        // 0 --a--> 1 (goal); b self-loops everywhere
        let transitions = vec![vec![1, 0], vec![1, 1]];
        let paths = solve(&transitions, &two_letter_alphabet());
        assert_eq!(format_sequence(paths[1].as_ref().unwrap()), "");
        assert_eq!(format_sequence(paths[0].as_ref().unwrap()), "a");
        assert_eq!(first_unreachable(&paths), None);
    }

    #[test]
    fn test_chain_paths_shrink_by_one() {
        // 0 --a--> 1 --a--> 2 --a--> 3 (goal)
        let transitions = vec![vec![1, 0], vec![2, 1], vec![3, 2], vec![3, 3]];
        let paths = solve(&transitions, &two_letter_alphabet());
        for state in 0..3 {
            let path = paths[state].as_ref().unwrap();
            assert_eq!(path.len(), 3 - state);
            let next = transitions[state][0];
            assert_eq!(paths[next].as_ref().unwrap().len(), path.len() - 1);
        }
    }

    #[test]
    fn test_unreachable_state_is_reported() {
        // State 0 only self-loops; it can never reach the goal.
        let transitions = vec![vec![0, 0], vec![1, 1]];
        let paths = solve(&transitions, &two_letter_alphabet());
        assert_eq!(first_unreachable(&paths), Some(0));
    }
}
