//! qpc-lib: Core engine for QPC
//!
//! This crate turns project scripts into resolved build plans:
//! - `macros`: `$NAME` substitution with open and frozen tables
//! - `block`: the script block tree, its reader and condition solver
//! - `project`: the pass matrix, file resolution and the script walker
//! - `config`: typed option groups and build steps
//! - `cache`: hash records that let unchanged projects be skipped

pub mod block;
pub mod build_event;
pub mod cache;
pub mod config;
pub mod consts;
pub mod macros;
pub mod options;
pub mod platform;
pub mod project;
pub mod util;
