//! Ranking of meta-words and candidates, and what a commit teaches.
//!
//! Ordering runs after the boundary search:
//!
//! 1. [`sort_metaword`] scores every meta-word of every segment from the
//!    `cand_info` table and sorts each segment's meta-words.
//! 2. Candidates are made from the sorted meta-words.
//! 3. [`sort_candidate`] scores the candidates, drops duplicates and
//!    applies what the learning store knows.
//!
//! [`proc_commit`] turns the user's final choice into [`LearningOp`]s; the
//! caller applies them to the store.
//!
//! [`LearningOp`]: crate::learning::LearningOp

mod candhistory;
mod candsort;
mod candswap;
mod commit;
mod infosort;
mod relation;
#[cfg(test)]
mod tests;

pub use candsort::sort_candidate;
pub use commit::proc_commit;
pub use infosort::{metaword_features, sort_metaword};
