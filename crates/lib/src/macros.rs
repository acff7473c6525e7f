//! Macro tables and textual macro substitution.
//!
//! Macros are `name -> value` string pairs scoped to a single project pass.
//! Names carry their sigil (e.g. `$PROJECT_NAME`) and are matched as exact,
//! case-sensitive substrings.
//!
//! # Substitution order
//!
//! The names present in the input are collected once, then substituted from
//! the lexicographically greatest to the smallest. This keeps `$AB` from being
//! corrupted by an earlier substitution of `$A`.
//!
//! # Lifecycle
//!
//! A pass owns a [`MacroBuilder`] while its macro table is being assembled and
//! freezes it into a [`MacroTable`] before files, options and build events are
//! resolved. A frozen table can be cloned cheaply and never changes.
//!
//! ```
//! use qpc_lib::macros::{MacroBuilder, MacroLookup};
//!
//! let mut builder = MacroBuilder::new();
//! builder.set("$A", "foo");
//! builder.set("$AB", "bar");
//! let table = builder.freeze();
//! assert_eq!(table.replace("$AB/$A"), "bar/foo");
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

/// Errors raised when mutating macro state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
  #[error("macro table is frozen, cannot define {0}")]
  Frozen(String),
}

/// Read access to a macro table.
pub trait MacroLookup {
  /// All entries in insertion order.
  fn entries(&self) -> &IndexMap<String, String>;

  /// Look up a macro value by its full name (including the sigil).
  fn get(&self, name: &str) -> Option<&str> {
    self.entries().get(name).map(String::as_str)
  }

  /// Whether a macro with this name is defined.
  fn contains(&self, name: &str) -> bool {
    self.entries().contains_key(name)
  }

  /// Substitute every known macro in `text`.
  fn replace(&self, text: &str) -> String {
    replace_macros(text, self.entries())
  }

  /// Substitute macros in each value.
  fn replace_all(&self, values: &[String]) -> Vec<String> {
    values.iter().map(|value| self.replace(value)).collect()
  }
}

/// Replace every occurrence of a known macro name in `text` with its value.
///
/// Unknown names are left verbatim. Values inserted by a substitution are not
/// scanned for names that were absent from the original text.
pub fn replace_macros(text: &str, macros: &IndexMap<String, String>) -> String {
  let mut candidates: Vec<&str> = macros
    .keys()
    .map(String::as_str)
    .filter(|name| !name.is_empty() && text.contains(name))
    .collect();

  if candidates.is_empty() {
    return text.to_string();
  }

  candidates.sort_unstable_by(|a, b| b.cmp(a));

  let mut result = text.to_string();
  for name in candidates {
    if result.contains(name) {
      result = result.replace(name, &macros[name]);
    }
  }
  result
}

/// Mutable macro table used while a pass is being set up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroBuilder {
  entries: IndexMap<String, String>,
}

impl MacroBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert without expansion or flattening.
  ///
  /// Used to seed a table from already-resolved sources.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.entries.insert(name.into(), value.into());
  }

  /// Extend with entries from another table, later entries winning.
  pub fn extend<I, K, V>(&mut self, entries: I)
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    for (name, value) in entries {
      self.insert(name, value);
    }
  }

  /// Define a macro, expanding its value against the current table first.
  ///
  /// Expanding before insertion lets a macro extend its own previous value
  /// (`$PATH = "$PATH;extra"`). The whole table is flattened afterwards so
  /// earlier macros that referenced `name` pick up the new value.
  pub fn set(&mut self, name: &str, value: &str) {
    let expanded = self.replace(value);
    debug!(name, value = %expanded, "set macro");
    self.entries.insert(name.to_string(), expanded);
    self.flatten();
  }

  /// Define `name` as empty unless it already has a value.
  pub fn set_default(&mut self, name: &str) {
    if !self.entries.contains_key(name) {
      debug!(name, "set empty macro");
      self.entries.insert(name.to_string(), String::new());
      self.flatten();
    }
  }

  /// Re-expand every value against the rest of the table.
  ///
  /// Each value is resolved depth-first, so chains of any depth settle in one
  /// call. A name already being resolved further up the chain is left
  /// verbatim: a macro never expands into itself, and cyclic definitions stop
  /// at the first repeated name. Returns the number of values that changed.
  pub fn flatten(&mut self) -> usize {
    let resolved: Vec<String> = self
      .entries
      .keys()
      .map(|name| self.resolve(name, &mut Vec::new()))
      .collect();

    let mut changed = 0;
    for (value, expanded) in self.entries.values_mut().zip(resolved) {
      if *value != expanded {
        *value = expanded;
        changed += 1;
      }
    }
    changed
  }

  fn resolve<'a>(&'a self, name: &'a str, stack: &mut Vec<&'a str>) -> String {
    let Some(value) = self.entries.get(name) else {
      return name.to_string();
    };
    stack.push(name);

    let mut candidates: Vec<&str> = self
      .entries
      .keys()
      .map(String::as_str)
      .filter(|candidate| !candidate.is_empty() && value.contains(candidate) && !stack.contains(candidate))
      .collect();
    candidates.sort_unstable_by(|a, b| b.cmp(a));

    let mut result = value.clone();
    for candidate in candidates {
      if result.contains(candidate) {
        let expanded = self.resolve(candidate, stack);
        result = result.replace(candidate, &expanded);
      }
    }

    stack.pop();
    result
  }

  /// Freeze into an immutable table.
  pub fn freeze(self) -> MacroTable {
    MacroTable {
      entries: Arc::new(self.entries),
    }
  }
}

impl MacroLookup for MacroBuilder {
  fn entries(&self) -> &IndexMap<String, String> {
    &self.entries
  }
}

/// Frozen, shareable macro table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
  entries: Arc<IndexMap<String, String>>,
}

impl Serialize for MacroTable {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.entries.as_ref().serialize(serializer)
  }
}

impl MacroTable {
  /// Start a new builder seeded with this table's entries.
  pub fn thaw(&self) -> MacroBuilder {
    MacroBuilder {
      entries: (*self.entries).clone(),
    }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl MacroLookup for MacroTable {
  fn entries(&self) -> &IndexMap<String, String> {
    &self.entries
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MacroTable {
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    let mut builder = MacroBuilder::new();
    builder.extend(iter);
    builder.freeze()
  }
}

/// Macro state of a pass: open while the pass is being assembled, frozen once
/// resolution starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroState {
  Open(MacroBuilder),
  Frozen(MacroTable),
}

impl MacroState {
  /// Mutable access to the builder, or an error once frozen.
  pub fn builder(&mut self, name: &str) -> Result<&mut MacroBuilder, MacroError> {
    match self {
      MacroState::Open(builder) => Ok(builder),
      MacroState::Frozen(_) => Err(MacroError::Frozen(name.to_string())),
    }
  }

  /// Freeze in place. Freezing twice is a no-op.
  pub fn freeze(&mut self) {
    if let MacroState::Open(builder) = self {
      let table = std::mem::take(builder).freeze();
      *self = MacroState::Frozen(table);
    }
  }

  /// The frozen table, if resolution has started.
  pub fn table(&self) -> Option<&MacroTable> {
    match self {
      MacroState::Frozen(table) => Some(table),
      MacroState::Open(_) => None,
    }
  }

  pub fn is_frozen(&self) -> bool {
    matches!(self, MacroState::Frozen(_))
  }
}

impl Serialize for MacroState {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.entries().serialize(serializer)
  }
}

impl Default for MacroState {
  fn default() -> Self {
    MacroState::Open(MacroBuilder::new())
  }
}

impl MacroLookup for MacroState {
  fn entries(&self) -> &IndexMap<String, String> {
    match self {
      MacroState::Open(builder) => builder.entries(),
      MacroState::Frozen(table) => table.entries(),
    }
  }
}
