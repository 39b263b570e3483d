//! The composed SUS/LMS/random heuristic agent.

use crate::{
    config::HeuristicConfig,
    env::Environment,
    error::Result,
    memory::{EpisodicMemory, LmsScorer, SusTracker},
    types::Action,
};

use super::policy::{DecisionPolicy, RandomPolicy};

/// An agent that explores by arbitrating between three sequence
/// heuristics: the shortest unperformed sequence (SUS), the longest
/// matching sequence (LMS), and a semi-random fallback.
///
/// Precedence: the random fallback wins only when strictly greater than
/// both heuristic scores, SUS and LMS compare strictly against each
/// other, and exact ties fall back to random.
pub struct HeuristicAgent {
    env: Environment,
    memory: EpisodicMemory,
    sus: SusTracker,
    lms: LmsScorer,
    random: RandomPolicy,
    successes: usize,
}

impl HeuristicAgent {
    /// Create an agent exploring the given environment.
    pub fn new(env: Environment, config: &HeuristicConfig) -> Self {
        let alphabet = env.alphabet().clone();
        let sus = SusTracker::new(&alphabet, config.max_sequence_size, config.sus_constant);
        let lms = LmsScorer::new(config.lms_constant);
        let random = RandomPolicy::new(
            alphabet,
            config.duplicate_forgiveness,
            config.random_score,
            config.seed,
        );
        HeuristicAgent {
            env,
            memory: EpisodicMemory::new(),
            sus,
            lms,
            random,
            successes: 0,
        }
    }

    /// Run the decision loop until the log reaches `episode_budget`
    /// episodes.
    pub fn explore_environment(&mut self, episode_budget: usize) -> Result<()> {
        while self.memory.len() < episode_budget {
            let sus = self.sus.propose(&self.memory)?;
            let lms = self.lms.propose(&self.memory)?;
            let random = self.random.propose(&self.memory)?;

            let mut path: Vec<Action> = if random.score > sus.score && random.score > lms.score {
                random.path
            } else if sus.score > lms.score {
                // The SUS proposal is a peek; hand-out removes it.
                match self.sus.take_shortest() {
                    Some(sequence) => sequence,
                    None => random.path,
                }
            } else if lms.score > sus.score {
                lms.path
            } else {
                random.path
            };
            if path.is_empty() {
                path = vec![self.random.choose(&self.memory)];
            }

            self.try_path(&path)?;
            self.sus.note_executed(&self.memory, path.len());
        }
        Ok(())
    }

    /// Execute a path action by action, recording every episode.
    ///
    /// Returns true only when the goal lands on the final action. A goal
    /// reached mid-path still counts as a success but does not stop
    /// execution.
    pub fn try_path(&mut self, path: &[Action]) -> Result<bool> {
        let mut reached_on_last = false;
        for (step, &action) in path.iter().enumerate() {
            let sensors = self.env.tick(action)?;
            self.memory.record(action, sensors);
            if sensors.goal {
                self.successes += 1;
                reached_on_last = step == path.len() - 1;
            }
        }
        Ok(reached_on_last)
    }

    /// The run's episodic memory.
    pub fn memory(&self) -> &EpisodicMemory {
        &self.memory
    }

    /// How many times the goal has been reached.
    pub fn successes(&self) -> usize {
        self.successes
    }

    /// The environment being explored.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The SUS tracker's current state.
    pub fn sus_tracker(&self) -> &SusTracker {
        &self.sus
    }
}
