//! Block tree read from project scripts and cache records.
//!
//! Every line of a script is a block: a key, zero or more values, an optional
//! `[condition]` and an optional `{ ... }` list of child blocks.
//!
//! ```text
//! configuration
//! {
//!     general
//!     {
//!         out_dir "$ROOT_DIR/bin"    [$WINDOWS]
//!     }
//! }
//! ```
//!
//! # Submodules
//!
//! - [`condition`] - evaluation of `[...]` conditions against a macro table
//! - [`reader`] - tokenizer and parser for the textual syntax

pub mod condition;
pub mod reader;

use std::sync::Arc;

use tracing::{error, warn};

use crate::macros::MacroLookup;

pub use reader::{BlockError, read_file, read_str};

/// One node of a parsed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
  pub key: String,
  pub values: Vec<String>,
  pub condition: Option<String>,
  pub items: Vec<Block>,
  /// Script the block was read from, for diagnostics.
  pub source: Arc<str>,
  /// 1-based line of the key.
  pub line: usize,
}

impl Block {
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      ..Self::default()
    }
  }

  pub fn with_values<I, S>(mut self, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.values = values.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
    self.condition = Some(condition.into());
    self
  }

  pub fn with_items(mut self, items: Vec<Block>) -> Self {
    self.items = items;
    self
  }

  /// First child with the given key.
  pub fn get_item(&self, key: &str) -> Option<&Block> {
    self.items.iter().find(|item| item.key == key)
  }

  /// Values of the first child with the given key, or an empty slice.
  pub fn get_item_values(&self, key: &str) -> &[String] {
    self.get_item(key).map(|item| item.values.as_slice()).unwrap_or(&[])
  }

  /// The key followed by the values.
  pub fn get_list(&self) -> Vec<String> {
    let mut list = Vec::with_capacity(self.values.len() + 1);
    list.push(self.key.clone());
    list.extend(self.values.iter().cloned());
    list
  }

  /// Evaluate this block's condition. Blocks without one always apply.
  pub fn solve_condition(&self, macros: &impl MacroLookup) -> bool {
    match self.condition.as_deref() {
      None => true,
      Some(condition) => match condition::solve(condition, macros) {
        Ok(result) => result,
        Err(e) => {
          self.warning(&format!("invalid condition [{condition}]: {e}"));
          false
        }
      },
    }
  }

  /// First value, if any.
  pub fn value(&self) -> Option<&str> {
    self.values.first().map(String::as_str)
  }

  pub fn warning(&self, message: &str) {
    warn!(source = %self.source, line = self.line, key = %self.key, "{message}");
  }

  pub fn error(&self, message: &str) {
    error!(source = %self.source, line = self.line, key = %self.key, "{message}");
  }

  /// Report a value that is not one of the allowed tokens.
  pub fn invalid_option(&self, value: &str, allowed: &[&str]) {
    self.warning(&format!(
      "invalid option \"{value}\", expected one of: {}",
      allowed.join(", ")
    ));
  }
}
