//! Typed option groups of a project pass.
//!
//! A `configuration` block holds one child per group:
//!
//! ```text
//! configuration
//! {
//!     general   { out_dir "bin" }
//!     compile   { preprocessor_definitions { "DEBUG" [$DEBUG] } }
//!     link      { libraries { "tier0" - "tier1" } }
//!     debug     { command "$OUT/game" }
//!     post_build { copy_binary "$OUT" }
//! }
//! ```
//!
//! Option groups absorb their options one block at a time through
//! [`OptionGroup::parse_option`]. Every group dispatches on the option key
//! through a fixed `match` and reports keys it does not know; bad values keep
//! the previous value and report a diagnostic. Build steps (`pre_build`,
//! `pre_link`, `post_build`) call build events and are handled by the pass
//! that owns the events.

mod compile;
mod debug;
mod general;
mod linker;

use serde::Serialize;

use crate::block::Block;
use crate::macros::MacroLookup;
use crate::platform::Platform;
use crate::util::path::normalize;

pub use compile::{Compile, PrecompiledHeader, SourceFileCompile};
pub use debug::Debug;
pub use general::{ConfigurationType, General, Language};
pub use linker::Linker;

/// A group that accumulates options from blocks.
pub trait OptionGroup {
  /// Apply one option block. Conditions on list children are evaluated
  /// against `macros`; the option block's own condition has already been
  /// checked by the caller.
  fn parse_option(&mut self, macros: &impl MacroLookup, option: &Block);
}

/// The option groups under `configuration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
  General,
  Compile,
  Linker,
  Debug,
}

impl GroupKind {
  pub fn from_key(key: &str) -> Option<Self> {
    match key {
      "general" => Some(Self::General),
      "compile" | "compiler" => Some(Self::Compile),
      "link" | "linker" => Some(Self::Linker),
      "debug" => Some(Self::Debug),
      _ => None,
    }
  }
}

/// Build lifecycle points that take commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStep {
  PreBuild,
  PreLink,
  PostBuild,
}

impl BuildStep {
  pub fn from_key(key: &str) -> Option<Self> {
    match key {
      "pre_build" => Some(Self::PreBuild),
      "pre_link" => Some(Self::PreLink),
      "post_build" => Some(Self::PostBuild),
      _ => None,
    }
  }
}

/// Every option group of one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
  pub debug: Debug,
  pub general: General,
  pub compile: Compile,
  pub linker: Linker,
  pub pre_build: Vec<String>,
  pub pre_link: Vec<String>,
  pub post_build: Vec<String>,
}

impl Configuration {
  pub fn new(file_name: &str, platform: Platform) -> Self {
    Self {
      debug: Debug::default(),
      general: General::new(file_name, platform),
      compile: Compile::default(),
      linker: Linker::default(),
      pre_build: Vec::new(),
      pre_link: Vec::new(),
      post_build: Vec::new(),
    }
  }

  /// Apply every option of a group block whose condition holds.
  pub fn parse_group(&mut self, macros: &impl MacroLookup, group: &Block) {
    let Some(kind) = GroupKind::from_key(&group.key) else {
      group.warning("unknown configuration group");
      return;
    };

    for option in group.items.iter().filter(|option| option.solve_condition(macros)) {
      self.parse_option(kind, macros, option);
    }
  }

  pub fn parse_option(&mut self, kind: GroupKind, macros: &impl MacroLookup, option: &Block) {
    match kind {
      GroupKind::General => self.general.parse_option(macros, option),
      GroupKind::Compile => self.compile.parse_option(macros, option),
      GroupKind::Linker => self.linker.parse_option(macros, option),
      GroupKind::Debug => self.debug.parse_option(macros, option),
    }
  }

  pub fn step(&self, step: BuildStep) -> &[String] {
    match step {
      BuildStep::PreBuild => &self.pre_build,
      BuildStep::PreLink => &self.pre_link,
      BuildStep::PostBuild => &self.post_build,
    }
  }

  pub fn step_mut(&mut self, step: BuildStep) -> &mut Vec<String> {
    match step {
      BuildStep::PreBuild => &mut self.pre_build,
      BuildStep::PreLink => &mut self.pre_link,
      BuildStep::PostBuild => &mut self.post_build,
    }
  }

  /// Append a literal command line: the key followed by its values.
  ///
  /// A literal `\n` in the command becomes a line break.
  pub fn add_command(&mut self, step: BuildStep, macros: &impl MacroLookup, option: &Block) {
    let mut command = macros.replace(&option.key);
    if !option.values.is_empty() {
      command.push(' ');
      command.push_str(&macros.replace(&option.values.join(" ")));
    }
    if !command.is_empty() {
      self.step_mut(step).push(command.replace("\\n", "\n"));
    }
  }
}

/// Expand macros in a path, then normalise it.
pub(crate) fn clean_path(value: &str, macros: &impl MacroLookup) -> String {
  normalize(&macros.replace(value))
}

/// Extend `list` with the expanded entries of every child whose condition
/// holds.
pub(crate) fn extend_list(list: &mut Vec<String>, macros: &impl MacroLookup, option: &Block) {
  for item in option.items.iter().filter(|item| item.solve_condition(macros)) {
    list.extend(macros.replace_all(&item.get_list()));
  }
}

/// Parse `true`/`false`, keeping `previous` on anything else.
pub(crate) fn convert_bool(previous: bool, option: &Block) -> bool {
  match option.value() {
    Some("true") => true,
    Some("false") => false,
    Some(value) => {
      option.invalid_option(value, &["true", "false"]);
      previous
    }
    None => {
      option.warning("missing value");
      previous
    }
  }
}

/// An enum option spelled as one of a fixed set of lowercase names.
pub(crate) trait OptionEnum: Copy + 'static {
  const NAMES: &'static [(&'static str, Self)];
}

/// Match the option's value case-insensitively, keeping `previous` on no match.
pub(crate) fn convert_enum<T: OptionEnum>(previous: Option<T>, option: &Block) -> Option<T> {
  let Some(value) = option.value() else {
    option.warning("missing value");
    return previous;
  };

  match T::NAMES.iter().find(|(name, _)| name.eq_ignore_ascii_case(value)) {
    Some((_, variant)) => Some(*variant),
    None => {
      let allowed: Vec<&str> = T::NAMES.iter().map(|(name, _)| *name).collect();
      option.invalid_option(value, &allowed);
      previous
    }
  }
}

/// The first value of an option that requires one, warning when absent.
pub(crate) fn required_value(option: &Block) -> Option<&str> {
  let value = option.value();
  if value.is_none() {
    option.warning("missing value");
  }
  value
}
