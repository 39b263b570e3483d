//! Decision-policy seam shared by all strategies.

use rand::{Rng, rngs::StdRng};

use crate::{
    config::build_rng,
    error::Result,
    memory::{EpisodicMemory, LmsScorer, SusTracker},
    types::{Action, Alphabet},
};

/// A scored path proposal: the sequence a strategy would run next and how
/// strongly it believes in it.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub score: f64,
    pub path: Vec<Action>,
}

/// One decision strategy: given the run's episodic memory, propose the
/// next action sequence with a comparable score.
///
/// Strategies are composed by the agents, not inherited; each implements
/// this seam independently.
pub trait DecisionPolicy: Send {
    /// The strategy's name, for identification in comparisons.
    fn name(&self) -> &str;

    /// Score the strategy's current proposal without committing to it.
    fn propose(&mut self, memory: &EpisodicMemory) -> Result<Proposal>;
}

/// Semi-random single-action policy with a disposition against repeating
/// the previous action; duplicates are only permitted with a small
/// configured probability.
#[derive(Debug)]
pub struct RandomPolicy {
    alphabet: Alphabet,
    duplicate_forgiveness: f64,
    score: f64,
    rng: StdRng,
}

impl RandomPolicy {
    /// Create a policy over the given alphabet.
    pub fn new(
        alphabet: Alphabet,
        duplicate_forgiveness: f64,
        score: f64,
        seed: Option<u64>,
    ) -> Self {
        RandomPolicy {
            alphabet,
            duplicate_forgiveness,
            score,
            rng: build_rng(seed),
        }
    }

    /// Pick the next action, avoiding the memory's last action unless a
    /// duplicate is forgiven this time.
    pub fn choose(&mut self, memory: &EpisodicMemory) -> Action {
        let duplicate_permitted = self.rng.random::<f64>() < self.duplicate_forgiveness;
        let last = memory.last_action();
        loop {
            let slot = self.rng.random_range(0..self.alphabet.len());
            let candidate = self.alphabet.action(slot);
            if duplicate_permitted || Some(candidate) != last {
                return candidate;
            }
        }
    }
}

impl DecisionPolicy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn propose(&mut self, memory: &EpisodicMemory) -> Result<Proposal> {
        Ok(Proposal {
            score: self.score,
            path: vec![self.choose(memory)],
        })
    }
}

impl DecisionPolicy for SusTracker {
    fn name(&self) -> &str {
        "sus"
    }

    fn propose(&mut self, _memory: &EpisodicMemory) -> Result<Proposal> {
        Ok(Proposal {
            score: self.score(),
            path: self.peek_shortest().cloned().unwrap_or_default(),
        })
    }
}

impl DecisionPolicy for LmsScorer {
    fn name(&self) -> &str {
        "lms"
    }

    fn propose(&mut self, memory: &EpisodicMemory) -> Result<Proposal> {
        let evaluation = self.evaluate(memory);
        Ok(Proposal {
            score: evaluation.score,
            path: evaluation.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    #[test]
    fn test_random_policy_avoids_duplicates_when_unforgiven() {
        let alphabet = Alphabet::new(3).unwrap();
        // duplicate_forgiveness 0: a repeat is never allowed.
        let mut policy = RandomPolicy::new(alphabet.clone(), 0.0, 1.0, Some(9));
        let mut memory = EpisodicMemory::new();
        memory.push(alphabet.action(0), Outcome::NoTransition);

        for _ in 0..50 {
            let action = policy.choose(&memory);
            assert_ne!(action, alphabet.action(0));
        }
    }

    #[test]
    fn test_policies_share_the_seam() {
        let alphabet = Alphabet::new(2).unwrap();
        let memory = EpisodicMemory::new();
        let mut policies: Vec<Box<dyn DecisionPolicy>> = vec![
            Box::new(RandomPolicy::new(alphabet.clone(), 0.25, 1.0, Some(1))),
            Box::new(SusTracker::new(&alphabet, 2, 10.0)),
            Box::new(LmsScorer::new(10.0)),
        ];

        let proposals: Vec<Proposal> = policies
            .iter_mut()
            .map(|policy| policy.propose(&memory).unwrap())
            .collect();

        assert_eq!(proposals[0].path.len(), 1);
        assert!(proposals[1].score > 0.0);
        assert_eq!(proposals[2].score, 0.0);
    }
}
