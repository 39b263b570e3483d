//! Randomly generated finite-state environment
//!
//! The environment is a total transition table over `N` states and a
//! `K`-letter alphabet. Generation guarantees that every state can reach
//! the goal; exact shortest paths are computed once at construction and
//! back every heuristic in the crate.

pub mod blind_path;
pub mod generator;
pub mod machine;
pub mod shortest_paths;

pub use machine::Environment;
