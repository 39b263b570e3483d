//! Configuration types for environments and agents.
//!
//! All tunables travel as immutable configuration passed at construction.
//! Defaults match the constants the study runs with.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Build an RNG from an optional seed, seeding from the thread RNG otherwise.
pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Configuration for generating a random state-machine environment.
///
/// # Examples
///
/// ```
/// use nsm::EnvironmentConfig;
///
/// let config = EnvironmentConfig::new(10, 3).with_seed(42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Number of states; the goal is always the last one.
    pub num_states: usize,
    /// Number of letters in the action alphabet (in `[2, 26]`).
    pub alphabet_size: usize,
    /// How many whole-machine regenerations to allow before giving up.
    pub max_generation_attempts: usize,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl EnvironmentConfig {
    /// Create a configuration with the given dimensions and default limits.
    pub fn new(num_states: usize, alphabet_size: usize) -> Self {
        Self {
            num_states,
            alphabet_size,
            max_generation_attempts: 100,
            seed: None,
        }
    }

    /// Set the random seed for deterministic generation and resets.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the regeneration budget.
    pub fn with_max_generation_attempts(mut self, attempts: usize) -> Self {
        self.max_generation_attempts = attempts;
        self
    }

    /// Check the dimensional constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the machine is too small
    /// to have a non-goal start state or the retry budget is zero. The
    /// alphabet bound is enforced by [`crate::Alphabet::new`].
    pub fn validate(&self) -> Result<()> {
        if self.num_states < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("num_states {} must be at least 2", self.num_states),
            });
        }
        if self.max_generation_attempts == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_generation_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::new(50, 3)
    }
}

/// Configuration for the composed SUS/LMS/random heuristic agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Longest untried sequence length the SUS tracker enumerates.
    pub max_sequence_size: usize,
    /// Weight applied to the SUS score.
    pub sus_constant: f64,
    /// Weight applied to the LMS score.
    pub lms_constant: f64,
    /// Fixed score of the random fallback.
    pub random_score: f64,
    /// Chance that a random action may repeat the previous one.
    pub duplicate_forgiveness: f64,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl HeuristicConfig {
    /// Set the random seed for deterministic action choice.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the SUS enumeration bound.
    pub fn with_max_sequence_size(mut self, size: usize) -> Self {
        self.max_sequence_size = size;
        self
    }

    /// Set the SUS score weight.
    pub fn with_sus_constant(mut self, constant: f64) -> Self {
        self.sus_constant = constant;
        self
    }

    /// Set the LMS score weight.
    pub fn with_lms_constant(mut self, constant: f64) -> Self {
        self.lms_constant = constant;
        self
    }

    /// Set the random fallback score.
    pub fn with_random_score(mut self, score: f64) -> Self {
        self.random_score = score;
        self
    }
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            max_sequence_size: 7,
            sus_constant: 10.0,
            lms_constant: 10.0,
            random_score: 1.0,
            duplicate_forgiveness: 0.25,
            seed: None,
        }
    }
}

/// Configuration for the NSM value engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsmConfig {
    /// Discount factor γ.
    pub discount: f64,
    /// Learning rate α.
    pub learning_rate: f64,
    /// Reward assigned to an action that reaches the goal.
    pub reward_success: f64,
    /// Reward assigned to every other action.
    pub reward_failure: f64,
    /// Initial probability of acting randomly once learning has started.
    pub init_rand_chance: f64,
    /// Geometric decay applied to the random chance after each success.
    pub rand_decrease: f64,
    /// Maximum number of neighbors kept per candidate action.
    pub k_nearest: usize,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl NsmConfig {
    /// Set the random seed for deterministic exploration.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the neighborhood size bound.
    pub fn with_k_nearest(mut self, k: usize) -> Self {
        self.k_nearest = k;
        self
    }

    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.learning_rate = alpha;
        self
    }

    /// Set the discount factor γ.
    pub fn with_discount(mut self, gamma: f64) -> Self {
        self.discount = gamma;
        self
    }
}

impl Default for NsmConfig {
    fn default() -> Self {
        Self {
            discount: 0.8,
            learning_rate: 0.85,
            reward_success: 1.0,
            reward_failure: -0.1,
            init_rand_chance: 0.7,
            rand_decrease: 0.7,
            k_nearest: 8,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_config_validation() {
        assert!(EnvironmentConfig::new(2, 2).validate().is_ok());
        assert!(EnvironmentConfig::new(1, 2).validate().is_err());
        assert!(
            EnvironmentConfig::new(5, 3)
                .with_max_generation_attempts(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_builder_style_setters() {
        let config = EnvironmentConfig::new(10, 4).with_seed(7);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.alphabet_size, 4);

        let heuristic = HeuristicConfig::default().with_sus_constant(20.0);
        assert_eq!(heuristic.sus_constant, 20.0);
        assert_eq!(heuristic.max_sequence_size, 7);

        let nsm = NsmConfig::default().with_k_nearest(4);
        assert_eq!(nsm.k_nearest, 4);
        assert_eq!(nsm.discount, 0.8);
    }
}
