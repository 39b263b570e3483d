//! Episodic memory and the sequence heuristics built on top of it
//!
//! One agent run owns one append-only [`EpisodicMemory`]; the LMS scorer
//! and SUS tracker read it to score candidate action sequences.

pub mod lms;
pub mod log;
pub mod sus;

pub use lms::LmsScorer;
pub use log::EpisodicMemory;
pub use sus::SusTracker;
