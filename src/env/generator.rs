//! Random transition-table generation with connectivity validation.

use rand::{Rng, rngs::StdRng};

use super::shortest_paths;
use crate::{
    config::EnvironmentConfig,
    error::{Error, Result},
    types::{Action, Alphabet, StateId},
};

/// Generate one random transition table.
///
/// Each state gets a random number of explicit transitions in `[1, K]`, each
/// on a random unused action slot toward a random target other than itself.
/// Slots left unassigned become self-loops, so the table is total.
pub(crate) fn generate_transitions(
    num_states: usize,
    alphabet_len: usize,
    rng: &mut StdRng,
) -> Vec<Vec<StateId>> {
    let mut transitions = Vec::with_capacity(num_states);

    for state in 0..num_states {
        let mut slots: Vec<Option<StateId>> = vec![None; alphabet_len];
        let num_explicit = rng.random_range(1..=alphabet_len);

        let mut placed = 0;
        while placed < num_explicit {
            let slot = rng.random_range(0..alphabet_len);
            if slots[slot].is_some() {
                continue;
            }
            let mut target = rng.random_range(0..num_states);
            while target == state {
                target = rng.random_range(0..num_states);
            }
            slots[slot] = Some(target);
            placed += 1;
        }

        transitions.push(
            slots
                .into_iter()
                .map(|slot| slot.unwrap_or(state))
                .collect(),
        );
    }

    transitions
}

/// Generate tables until one is fully connected to the goal, up to the
/// configured attempt budget.
///
/// Returns the validated table together with the per-state shortest paths
/// the validation already computed.
pub(crate) fn generate_connected(
    config: &EnvironmentConfig,
    alphabet: &Alphabet,
    rng: &mut StdRng,
) -> Result<(Vec<Vec<StateId>>, Vec<Vec<Action>>)> {
    for _ in 0..config.max_generation_attempts {
        let transitions = generate_transitions(config.num_states, alphabet.len(), rng);
        let paths = shortest_paths::solve(&transitions, alphabet);
        if shortest_paths::first_unreachable(&paths).is_none() {
            let paths = paths.into_iter().flatten().collect();
            return Ok((transitions, paths));
        }
    }
    Err(Error::GenerationFailed {
        attempts: config.max_generation_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build_rng;

    #[test]
    fn test_tables_are_total_with_valid_targets() {
        let mut rng = build_rng(Some(11));
        for _ in 0..20 {
            let transitions = generate_transitions(8, 3, &mut rng);
            assert_eq!(transitions.len(), 8);
            for row in &transitions {
                assert_eq!(row.len(), 3);
                assert!(row.iter().all(|&next| next < 8));
            }
        }
    }

    #[test]
    fn test_generation_yields_full_connectivity() {
        let config = EnvironmentConfig::new(12, 3).with_seed(3);
        let alphabet = Alphabet::new(3).unwrap();
        let mut rng = build_rng(config.seed);
        let (transitions, paths) = generate_connected(&config, &alphabet, &mut rng).unwrap();
        assert_eq!(paths.len(), transitions.len());
        assert!(paths[transitions.len() - 1].is_empty());
    }
}
