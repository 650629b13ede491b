// file: src/source/mod.rs
// description: document sources feeding the batch sink
// reference: internal module structure

pub mod rows;
pub mod walker;

pub use rows::RowReader;
pub use walker::{Candidate, Candidates, FileOutcome, FileWalker, Walk};
