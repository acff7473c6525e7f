//! Run-wide options shared by every project in an invocation.
//!
//! The CLI builds one [`RunOptions`] from its arguments and hands it to the
//! container, the script walker and the hash store. Nothing in the library
//! mutates it.

use indexmap::IndexMap;
use serde::Serialize;

use crate::platform::{Arch, Platform};

/// Options of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOptions {
  pub verbose: bool,
  pub hide_warnings: bool,
  /// Warn about, and skip, listed files that do not exist on disk.
  pub check_files: bool,
  /// Value of `$ROOT_DIR`.
  pub root_dir: String,
  /// Requested architectures. Passes are only created for these.
  pub archs: Vec<Arch>,
  /// Platforms projects are generated for.
  pub platforms: Vec<Platform>,
  pub add: Vec<String>,
  pub remove: Vec<String>,
  pub generators: Vec<String>,
  /// Macro definitions in `NAME` or `NAME=value` form.
  pub macros: Vec<String>,
  /// Regenerate even when the cache record is valid.
  pub force: bool,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      verbose: false,
      hide_warnings: false,
      check_files: false,
      root_dir: ".".to_string(),
      archs: Arch::current().into_iter().collect(),
      platforms: Platform::current().into_iter().collect(),
      add: Vec::new(),
      remove: Vec::new(),
      generators: Vec::new(),
      macros: Vec::new(),
      force: false,
    }
  }
}

impl RunOptions {
  /// Macros defined on the command line, keyed with their `$` sigil.
  ///
  /// A bare `NAME` is defined as `"1"`.
  pub fn arg_macros(&self) -> IndexMap<String, String> {
    self
      .macros
      .iter()
      .filter(|definition| !definition.is_empty())
      .map(|definition| match definition.split_once('=') {
        Some((name, value)) => (format!("${name}"), value.to_string()),
        None => (format!("${definition}"), "1".to_string()),
      })
      .collect()
  }
}
