//! Nearest Sequence Memory (NSM) value engine.
//!
//! McCallum-style k-nearest-neighbor sequence matching: for every
//! candidate action, the engine collects the longest historical contexts
//! that match the present moment with that action appended, averages
//! their learned q-values, and propagates temporal-difference updates
//! back through the matched episodes after each step.
//!
//! Episode convention: each NSM episode pairs the action taken with the
//! outcome sensed *before* it, so the tail episode fully describes the
//! present moment while its action is still provisional.

use rand::{Rng, rngs::StdRng};

use crate::{
    config::{NsmConfig, build_rng},
    env::Environment,
    error::Result,
    memory::EpisodicMemory,
    types::{Action, Outcome},
};

/// One matching historical sequence: a run of `len` episodes ending at
/// `end` that matches the log's tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Index of the last episode of the match.
    pub end: usize,
    /// Index of the first episode of the match.
    pub begin: usize,
    /// Number of matched episodes.
    pub len: usize,
}

impl Neighbor {
    fn new(end: usize, len: usize) -> Self {
        Neighbor {
            end,
            begin: end.saturating_sub(len),
            len,
        }
    }
}

/// Up to `k_nearest` longest matches for one candidate action.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    action: Action,
    neighbors: Vec<Neighbor>,
    shortest: usize,
    k_nearest: usize,
}

impl Neighborhood {
    fn new(action: Action, k_nearest: usize) -> Self {
        Neighborhood {
            action,
            neighbors: Vec::new(),
            shortest: 0,
            k_nearest,
        }
    }

    /// The candidate action this neighborhood is for.
    pub fn action(&self) -> Action {
        self.action
    }

    /// The neighbors, sorted ascending by match length.
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    /// Match length of the shortest kept neighbor (0 while empty).
    pub fn shortest(&self) -> usize {
        self.shortest
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Add a neighbor, dropping the shortest one while over capacity.
    /// The caller checks the neighbor is long enough to belong.
    fn add(&mut self, neighbor: Neighbor) {
        while self.neighbors.len() >= self.k_nearest {
            self.neighbors.remove(0);
        }
        self.neighbors.push(neighbor);
        self.neighbors.sort_by_key(|n| n.len);
        self.shortest = self.neighbors[0].len;
    }

    /// Mean learned q-value of the neighbors' end episodes; exactly 0 for
    /// an empty neighborhood.
    pub fn value(&self, q_values: &[f64]) -> f64 {
        if self.neighbors.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .neighbors
            .iter()
            .map(|neighbor| q_values[neighbor.end])
            .sum();
        total / self.neighbors.len() as f64
    }
}

/// The NSM agent: episodic memory plus per-episode q-values and rewards,
/// with an exploration schedule that decays after each success.
pub struct NsmAgent {
    env: Environment,
    memory: EpisodicMemory,
    /// Learned value per episode, in lockstep with the log.
    q_values: Vec<f64>,
    /// Observed reward per episode, in lockstep with the log.
    rewards: Vec<f64>,
    /// One neighborhood per alphabet action, rebuilt every decided step.
    neighborhoods: Vec<Neighborhood>,
    config: NsmConfig,
    rand_chance: f64,
    successes: usize,
    rng: StdRng,
}

impl NsmAgent {
    /// Create an agent exploring the given environment.
    pub fn new(env: Environment, config: NsmConfig) -> Self {
        let rng = build_rng(config.seed);
        let rand_chance = config.init_rand_chance;
        NsmAgent {
            env,
            memory: EpisodicMemory::new(),
            // Sentinel slot keeps the vectors aligned with the log.
            q_values: vec![0.0],
            rewards: vec![0.0],
            neighborhoods: Vec::new(),
            config,
            rand_chance,
            successes: 0,
            rng,
        }
    }

    fn push_episode(&mut self, action: Action, outcome: Outcome) {
        self.memory.push(action, outcome);
        self.q_values.push(0.0);
        self.rewards.push(0.0);
    }

    /// Rebuild the neighborhood of k-nearest matches for every candidate
    /// action, with the candidate provisionally written into the tail
    /// episode.
    pub fn populate_neighborhoods(&mut self) {
        let actions: Vec<Action> = self.env.alphabet().actions().to_vec();
        self.neighborhoods.clear();

        // A sentinel-only log has nothing to match and no tail episode to
        // hold a provisional action.
        if self.memory.len() < 2 {
            for action in actions {
                self.neighborhoods
                    .push(Neighborhood::new(action, self.config.k_nearest));
            }
            return;
        }

        for action in actions {
            self.memory.set_last_action(action);
            let mut hood = Neighborhood::new(action, self.config.k_nearest);
            for end in 0..=self.memory.len() - 2 {
                let match_len = self.memory.matched_length(end);
                if match_len > 0
                    && (hood.shortest() <= match_len || hood.len() < self.config.k_nearest)
                {
                    hood.add(Neighbor::new(end, match_len));
                }
            }
            self.neighborhoods.push(hood);
        }
    }

    /// One TD step on a single episode:
    /// `q ← (1−α)·q + α·(reward + γ·utility)`.
    fn set_new_q(&mut self, index: usize, utility: f64) {
        let alpha = self.config.learning_rate;
        let gamma = self.config.discount;
        self.q_values[index] = (1.0 - alpha) * self.q_values[index]
            + alpha * (self.rewards[index] + gamma * utility);
    }

    /// Propagate the TD update through every neighbor that voted for the
    /// executed action, then refresh the tail episode itself.
    ///
    /// For each neighbor the utility starts at the neighborhood's mean
    /// value; each matched episode, one step further back, is updated
    /// against the running utility, which then becomes that episode's new
    /// q-value.
    fn update_neighborhood_q(&mut self, action_index: usize) {
        let mean = self.neighborhoods[action_index].value(&self.q_values);
        let neighbors: Vec<Neighbor> = self.neighborhoods[action_index].neighbors().to_vec();

        for neighbor in &neighbors {
            let mut utility = mean;
            for step in 0..neighbor.len {
                let index = neighbor.end - step;
                self.set_new_q(index, utility);
                utility = self.q_values[index];
            }
        }

        let tail = self.memory.len() - 1;
        self.set_new_q(tail, mean);
    }

    /// Run the decision loop until the log reaches `episode_budget`
    /// episodes.
    ///
    /// Until the first success every action is uniformly random. After
    /// that, each step is random with probability `rand_chance` and
    /// otherwise takes the action whose neighborhood has the highest
    /// value; `rand_chance` decays geometrically after every success.
    pub fn explore_environment(&mut self, episode_budget: usize) -> Result<()> {
        let mut prev_outcome = Outcome::NoTransition;

        while self.memory.len() < episode_budget {
            let alphabet_len = self.env.alphabet().len();
            let mut action_index = self.rng.random_range(0..alphabet_len);
            let default_action = self.env.alphabet().action(action_index);
            self.push_episode(default_action, prev_outcome);

            // NSM can't vote until the goal has been found at least once.
            let deciding = self.successes > 0;
            if deciding {
                self.populate_neighborhoods();
                if self.rng.random::<f64>() >= self.rand_chance {
                    let mut best = self.neighborhoods[0].value(&self.q_values);
                    let mut best_index = 0;
                    for (index, hood) in self.neighborhoods.iter().enumerate().skip(1) {
                        let value = hood.value(&self.q_values);
                        if value > best {
                            best = value;
                            best_index = index;
                        }
                    }
                    action_index = best_index;
                }
            }

            let action = self.env.alphabet().action(action_index);
            self.memory.set_last_action(action);
            let sensors = self.env.tick(action)?;

            let tail = self.memory.len() - 1;
            self.rewards[tail] = if sensors.goal {
                self.config.reward_success
            } else {
                self.config.reward_failure
            };
            if deciding {
                self.update_neighborhood_q(action_index);
            }

            prev_outcome = sensors.encode();
            if sensors.goal {
                self.successes += 1;
                self.rand_chance *= self.config.rand_decrease;
            }
        }
        Ok(())
    }

    /// The run's episodic memory.
    pub fn memory(&self) -> &EpisodicMemory {
        &self.memory
    }

    /// How many times the goal has been reached.
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Current probability of acting randomly.
    pub fn rand_chance(&self) -> f64 {
        self.rand_chance
    }

    /// The learned q-value of an episode.
    pub fn q_value(&self, index: usize) -> Option<f64> {
        self.q_values.get(index).copied()
    }

    /// The most recently built neighborhood for an action, if any.
    pub fn neighborhood(&self, action: Action) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|h| h.action() == action)
    }

    /// The environment being explored.
    pub fn environment(&self) -> &Environment {
        &self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn action(letter: char) -> Action {
        Action::new(letter).unwrap()
    }

    #[test]
    fn test_empty_neighborhood_value_is_zero() {
        let hood = Neighborhood::new(action('a'), 8);
        assert_eq!(hood.value(&[0.5, 0.7]), 0.0);
    }

    #[test]
    fn test_single_neighbor_value_is_its_q() {
        let mut hood = Neighborhood::new(action('a'), 8);
        hood.add(Neighbor::new(1, 1));
        assert_eq!(hood.value(&[0.0, 0.42]), 0.42);
    }

    #[test]
    fn test_neighborhood_capacity_drops_shortest() {
        let mut hood = Neighborhood::new(action('a'), 2);
        hood.add(Neighbor::new(3, 1));
        hood.add(Neighbor::new(5, 3));
        hood.add(Neighbor::new(7, 2));
        assert_eq!(hood.len(), 2);
        // The length-1 match was evicted; the shortest kept is length 2.
        assert_eq!(hood.shortest(), 2);
        assert!(hood.neighbors().iter().all(|n| n.len >= 2));
    }

    #[test]
    fn test_neighbor_indices() {
        let neighbor = Neighbor::new(5, 3);
        assert_eq!(neighbor.begin, 2);
        assert_eq!(neighbor.end, 5);
    }

    fn tiny_env(seed: u64) -> Environment {
        Environment::from_transitions(vec![vec![1, 0], vec![1, 1]], 2)
            .unwrap()
            .with_seed(seed)
    }

    #[test]
    fn test_populate_on_sentinel_only_log_builds_empty_neighborhoods() {
        let config = NsmConfig::default().with_seed(11);
        let mut agent = NsmAgent::new(tiny_env(12), config);
        agent.populate_neighborhoods();

        // The sentinel keeps its no-action marker.
        assert!(agent.memory().last().is_sentinel());
        for &letter in ['a', 'b'].iter() {
            let hood = agent.neighborhood(action(letter)).unwrap();
            assert!(hood.is_empty());
            assert_eq!(hood.value(&[0.0]), 0.0);
        }
    }

    #[test]
    fn test_exploration_learns_and_decays_rand_chance() {
        let config = NsmConfig::default().with_seed(21);
        let mut agent = NsmAgent::new(tiny_env(22), config.clone());
        agent.explore_environment(300).unwrap();

        assert!(agent.memory().len() >= 300);
        assert!(agent.successes() > 0);
        let expected = config.init_rand_chance
            * config.rand_decrease.powi(agent.successes() as i32);
        assert!((agent.rand_chance() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_goal_episodes_carry_success_reward_value() {
        let config = NsmConfig::default().with_seed(33);
        let mut agent = NsmAgent::new(tiny_env(34), config);
        agent.explore_environment(400).unwrap();

        // Once learning has kicked in, at least one episode has a positive
        // learned value pulled up by the success reward.
        let any_positive = (0..agent.memory().len())
            .filter_map(|index| agent.q_value(index))
            .any(|q| q > 0.0);
        assert!(any_positive);
    }
}
