//! Diff-side algorithms: changed-line discovery and interval merging.
//!
//! Runs `git diff` with zero context lines between two revisions, parses
//! the output into per-file changed-line intervals, and merges overlapping
//! intervals into a minimal sorted set.

pub mod filter;
pub mod git;
pub mod parser;
pub mod ranges;
