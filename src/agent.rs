//! Agents and decision policies
//!
//! Strategies are composed behind one [`DecisionPolicy`] seam rather than
//! inherited: the SUS tracker, the LMS scorer, and the semi-random
//! fallback each propose a scored path, and [`HeuristicAgent`] arbitrates
//! between them. [`NsmAgent`] is the nearest-sequence-memory value engine.

pub mod heuristic;
pub mod nsm;
pub mod policy;

pub use heuristic::HeuristicAgent;
pub use nsm::{Neighbor, Neighborhood, NsmAgent};
pub use policy::{DecisionPolicy, Proposal, RandomPolicy};
