use serde::Serialize;

use super::{OptionEnum, OptionGroup, clean_path, convert_bool, convert_enum, extend_list, required_value};
use crate::block::Block;
use crate::macros::MacroLookup;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationType {
  StaticLibrary,
  DynamicLibrary,
  Application,
}

impl OptionEnum for ConfigurationType {
  const NAMES: &'static [(&'static str, Self)] = &[
    ("static_library", Self::StaticLibrary),
    ("dynamic_library", Self::DynamicLibrary),
    ("application", Self::Application),
  ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  Cpp,
  C,
}

impl OptionEnum for Language {
  const NAMES: &'static [(&'static str, Self)] = &[("cpp", Self::Cpp), ("c", Self::C)];
}

/// Output locations, project kind and toolchain of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct General {
  pub out_dir: String,
  pub build_dir: String,
  pub out_name: String,
  pub configuration_type: Option<ConfigurationType>,
  pub language: Option<Language>,
  pub compiler: String,
  pub default_include_directories: bool,
  pub default_library_directories: bool,
  pub include_directories: Vec<String>,
  pub library_directories: Vec<String>,
  pub options: Vec<String>,
}

impl General {
  pub fn new(file_name: &str, platform: Platform) -> Self {
    Self {
      out_dir: "build".to_string(),
      build_dir: "build".to_string(),
      out_name: file_name.to_string(),
      configuration_type: None,
      language: None,
      compiler: match platform {
        Platform::Windows => "msvc",
        Platform::Linux | Platform::MacOs => "gcc",
      }
      .to_string(),
      default_include_directories: true,
      default_library_directories: true,
      include_directories: Vec::new(),
      library_directories: Vec::new(),
      options: Vec::new(),
    }
  }
}

impl OptionGroup for General {
  fn parse_option(&mut self, macros: &impl MacroLookup, option: &Block) {
    match option.key.as_str() {
      "include_directories" => extend_list(&mut self.include_directories, macros, option),
      "library_directories" => extend_list(&mut self.library_directories, macros, option),
      "options" => extend_list(&mut self.options, macros, option),

      "out_dir" => {
        if let Some(value) = required_value(option) {
          self.out_dir = clean_path(value, macros);
        }
      }
      "build_dir" | "int_dir" => {
        if let Some(value) = required_value(option) {
          self.build_dir = clean_path(value, macros);
        }
      }
      "out_name" => {
        if let Some(value) = required_value(option) {
          self.out_name = macros.replace(value);
        }
      }

      "default_include_directories" => {
        self.default_include_directories = convert_bool(self.default_include_directories, option);
      }
      "default_library_directories" => {
        self.default_library_directories = convert_bool(self.default_library_directories, option);
      }

      "configuration_type" => self.configuration_type = convert_enum(self.configuration_type, option),
      "language" => self.language = convert_enum(self.language, option),

      "compiler" | "toolset_version" => {
        if option.key == "toolset_version" {
          option.warning("toolset_version is deprecated, use compiler");
        }
        if let Some(value) = required_value(option) {
          self.compiler = macros.replace(value);
        }
      }

      _ => option.error("unknown general option"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::macros::MacroTable;
  use tracing_test::traced_test;

  fn macros() -> MacroTable {
    [("$ROOT", "../.."), ("$WINDOWS", "1"), ("$GAME", "hl2")].into_iter().collect()
  }

  fn general() -> General {
    General::new("client", Platform::Linux)
  }

  #[test]
  fn defaults_follow_platform() {
    assert_eq!(General::new("x", Platform::Windows).compiler, "msvc");
    let general = general();
    assert_eq!(general.compiler, "gcc");
    assert_eq!(general.out_dir, "build");
    assert_eq!(general.out_name, "client");
    assert!(general.default_include_directories);
  }

  #[test]
  fn paths_are_expanded_and_normalised() {
    let mut general = general();
    general.parse_option(&macros(), &Block::new("out_dir").with_values(["$ROOT/game//bin/"]));
    general.parse_option(&macros(), &Block::new("int_dir").with_values(["obj\\$GAME"]));
    assert_eq!(general.out_dir, "../../game/bin");
    assert_eq!(general.build_dir, "obj/hl2");
  }

  #[test]
  fn list_options_respect_child_conditions() {
    let mut general = general();
    let option = Block::new("include_directories").with_items(vec![
      Block::new("public").with_values(["$ROOT/common"]),
      Block::new("win32").with_condition("$WINDOWS"),
      Block::new("posix").with_condition("$POSIX"),
    ]);
    general.parse_option(&macros(), &option);
    assert_eq!(general.include_directories, vec!["public", "../../common", "win32"]);
  }

  #[test]
  fn enum_options_are_case_insensitive() {
    let mut general = general();
    general.parse_option(&macros(), &Block::new("configuration_type").with_values(["Dynamic_Library"]));
    general.parse_option(&macros(), &Block::new("language").with_values(["C"]));
    assert_eq!(general.configuration_type, Some(ConfigurationType::DynamicLibrary));
    assert_eq!(general.language, Some(Language::C));
  }

  #[test]
  #[traced_test]
  fn invalid_enum_keeps_previous_value() {
    let mut general = general();
    general.parse_option(&macros(), &Block::new("configuration_type").with_values(["application"]));
    general.parse_option(&macros(), &Block::new("configuration_type").with_values(["plugin"]));
    assert_eq!(general.configuration_type, Some(ConfigurationType::Application));
    assert!(logs_contain("static_library, dynamic_library, application"));
  }

  #[test]
  #[traced_test]
  fn toolset_version_is_an_alias_for_compiler() {
    let mut general = general();
    general.parse_option(&macros(), &Block::new("toolset_version").with_values(["clang"]));
    assert_eq!(general.compiler, "clang");
    assert!(logs_contain("toolset_version is deprecated"));
  }

  #[test]
  #[traced_test]
  fn unknown_option_is_reported() {
    let mut general = general();
    let before = general.clone();
    general.parse_option(&macros(), &Block::new("output_dir").with_values(["x"]));
    assert_eq!(general, before);
    assert!(logs_contain("unknown general option"));
  }
}
