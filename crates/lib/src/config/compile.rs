use serde::Serialize;

use super::{OptionEnum, OptionGroup, convert_bool, convert_enum, extend_list, required_value};
use crate::block::Block;
use crate::macros::MacroLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecompiledHeader {
  None,
  Create,
  Use,
}

impl OptionEnum for PrecompiledHeader {
  const NAMES: &'static [(&'static str, Self)] = &[("none", Self::None), ("create", Self::Create), ("use", Self::Use)];
}

/// Compiler settings shared by every source file of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Compile {
  pub preprocessor_definitions: Vec<String>,
  pub precompiled_header: Option<PrecompiledHeader>,
  pub precompiled_header_file: Option<String>,
  pub precompiled_header_output_file: Option<String>,
  pub options: Vec<String>,
}

impl OptionGroup for Compile {
  fn parse_option(&mut self, macros: &impl MacroLookup, option: &Block) {
    match option.key.as_str() {
      "preprocessor_definitions" => extend_list(&mut self.preprocessor_definitions, macros, option),
      "options" => extend_list(&mut self.options, macros, option),
      "precompiled_header" => self.precompiled_header = convert_enum(self.precompiled_header, option),
      "precompiled_header_file" => {
        if let Some(value) = required_value(option) {
          self.precompiled_header_file = Some(macros.replace(value));
        }
      }
      "precompiled_header_output_file" => {
        if let Some(value) = required_value(option) {
          self.precompiled_header_output_file = Some(macros.replace(value));
        }
      }
      _ => option.error("unknown compile option"),
    }
  }
}

/// Per-file compiler settings layered over the pass's [`Compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFileCompile {
  #[serde(flatten)]
  pub compile: Compile,
  /// Whether the file takes part in the build.
  pub build: bool,
}

impl Default for SourceFileCompile {
  fn default() -> Self {
    Self {
      compile: Compile::default(),
      build: true,
    }
  }
}

impl OptionGroup for SourceFileCompile {
  fn parse_option(&mut self, macros: &impl MacroLookup, option: &Block) {
    if option.key == "build" {
      self.build = convert_bool(self.build, option);
    } else {
      self.compile.parse_option(macros, option);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::macros::MacroTable;
  use tracing_test::traced_test;

  fn macros() -> MacroTable {
    [("$DEBUG", "1"), ("$PCH", "stdafx")].into_iter().collect()
  }

  #[test]
  fn definitions_accumulate_under_conditions() {
    let mut compile = Compile::default();
    let option = Block::new("preprocessor_definitions").with_items(vec![
      Block::new("_DEBUG").with_condition("$DEBUG"),
      Block::new("NDEBUG").with_condition("!$DEBUG"),
      Block::new("CLIENT_DLL").with_values(["VERSION=2"]),
    ]);
    compile.parse_option(&macros(), &option);
    assert_eq!(compile.preprocessor_definitions, vec!["_DEBUG", "CLIENT_DLL", "VERSION=2"]);
  }

  #[test]
  fn precompiled_header_settings() {
    let mut compile = Compile::default();
    compile.parse_option(&macros(), &Block::new("precompiled_header").with_values(["USE"]));
    compile.parse_option(&macros(), &Block::new("precompiled_header_file").with_values(["$PCH.h"]));
    assert_eq!(compile.precompiled_header, Some(PrecompiledHeader::Use));
    assert_eq!(compile.precompiled_header_file.as_deref(), Some("stdafx.h"));
  }

  #[test]
  fn source_file_compile_intercepts_build() {
    let mut file = SourceFileCompile::default();
    assert!(file.build);
    file.parse_option(&macros(), &Block::new("build").with_values(["false"]));
    file.parse_option(&macros(), &Block::new("options").with_items(vec![Block::new("/W4")]));
    assert!(!file.build);
    assert_eq!(file.compile.options, vec!["/W4"]);
  }

  #[test]
  #[traced_test]
  fn unknown_option_is_reported() {
    let mut compile = Compile::default();
    compile.parse_option(&macros(), &Block::new("optimization").with_values(["max"]));
    assert_eq!(compile, Compile::default());
    assert!(logs_contain("unknown compile option"));
  }
}
