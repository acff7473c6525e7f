use serde::Serialize;

use super::{OptionGroup, clean_path, required_value};
use crate::block::Block;
use crate::macros::MacroLookup;

/// How an IDE launches the built output for debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Debug {
  pub command: String,
  pub arguments: String,
  pub working_dir: String,
}

impl Debug {
  /// Whether any debug setting was given.
  pub fn is_set(&self) -> bool {
    !self.command.is_empty() || !self.arguments.is_empty() || !self.working_dir.is_empty()
  }
}

impl OptionGroup for Debug {
  fn parse_option(&mut self, macros: &impl MacroLookup, option: &Block) {
    let field = match option.key.as_str() {
      "command" => &mut self.command,
      "working_dir" => &mut self.working_dir,
      "arguments" => {
        if let Some(value) = required_value(option) {
          self.arguments = macros.replace(value);
        }
        return;
      }
      _ => {
        option.error("unknown debug option");
        return;
      }
    };

    if let Some(value) = required_value(option) {
      *field = clean_path(value, macros);
    }
  }
}
