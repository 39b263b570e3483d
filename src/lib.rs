//! Nearest Sequence Memory (NSM) study crate
//!
//! This crate provides:
//! - Randomly generated finite-state environments with validated
//!   goal connectivity and exact per-state shortest paths
//! - A blind-path search that finds one action sequence reaching the
//!   goal from every possible starting state
//! - An append-only episodic memory with backward sequence matching
//! - Sequence-based decision heuristics (SUS, LMS, semi-random)
//! - A nearest-sequence-memory value engine with temporal-difference
//!   value propagation

pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod memory;
pub mod types;

pub use agent::{
    DecisionPolicy, HeuristicAgent, Neighbor, Neighborhood, NsmAgent, Proposal, RandomPolicy,
};
pub use config::{EnvironmentConfig, HeuristicConfig, NsmConfig};
pub use env::Environment;
pub use error::{Error, Result};
pub use memory::{EpisodicMemory, LmsScorer, SusTracker};
pub use types::{Action, Alphabet, Episode, Outcome, Sensors, StateId};
