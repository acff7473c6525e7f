//! Shared utilities.
//!
//! Content hashing, glob expansion and string-level path handling used across
//! the crate.

pub mod glob;
pub mod hash;
pub mod path;
