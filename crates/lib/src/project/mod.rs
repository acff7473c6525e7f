//! Projects and their per-target passes.
//!
//! A [`ProjectContainer`] holds every [`ProjectPass`] of one project script,
//! one per (configuration, platform, architecture) target requested by any
//! generator. [`ProjectContainer::parse_script`] walks the script over each
//! pass.
//!
//! # Submodules
//!
//! - [`base`] - per-platform configurations, extension macros and dependency paths
//! - [`container`] - pass matrix expansion and container-wide queries
//! - [`definition`] - project definitions and groups
//! - [`generator`] - output generator descriptors
//! - [`pass`] - a single resolved target: macros, files, options and build steps

pub mod base;
pub mod container;
pub mod definition;
pub mod generator;
pub mod pass;
mod script;

pub use base::{BaseInfo, PlatformBase};
pub use container::ProjectContainer;
pub use definition::{ProjectDefinition, ProjectGroup, ProjectRegistry};
pub use generator::{Generator, GeneratorInfo};
pub use pass::{PassTarget, ProjectPass, SourceFile};
