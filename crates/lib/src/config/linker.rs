use serde::Serialize;

use super::{OptionGroup, clean_path, convert_bool, extend_list, required_value};
use crate::block::Block;
use crate::consts::{REMOVE_MARKER, STATICLIB_EXT_MACRO};
use crate::macros::MacroLookup;
use crate::util::path::strip_extension;

/// Linker settings of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Linker {
  pub output_file: Option<String>,
  pub debug_file: Option<String>,
  pub import_library: Option<String>,
  pub ignore_import_library: bool,
  pub entry_point: Option<String>,
  /// Libraries, each normalised to the platform's static library extension.
  pub libraries: Vec<String>,
  pub ignore_libraries: Vec<String>,
  pub options: Vec<String>,
}

impl Linker {
  fn add_libraries(&mut self, macros: &impl MacroLookup, item: &Block) {
    for path in item.get_list() {
      let library = library_path(macros, &path);
      if self.libraries.contains(&library) {
        item.warning(&format!("library already added: {library}"));
      } else {
        self.libraries.push(library);
      }
    }
  }

  fn remove_libraries(&mut self, macros: &impl MacroLookup, item: &Block) {
    for path in &item.values {
      let library = library_path(macros, path);
      match self.libraries.iter().position(|existing| *existing == library) {
        Some(index) => {
          self.libraries.remove(index);
        }
        None => item.warning(&format!("trying to remove a library that hasn't been added: {library}")),
      }
    }
  }
}

/// Clean a library path and swap its extension for the static library one.
///
/// Without a `$_STATICLIB_EXT` macro the cleaned path is kept as is.
fn library_path(macros: &impl MacroLookup, path: &str) -> String {
  let cleaned = clean_path(path, macros);
  match macros.get(STATICLIB_EXT_MACRO) {
    Some(ext) => format!("{}{ext}", strip_extension(&cleaned)),
    None => cleaned,
  }
}

impl OptionGroup for Linker {
  fn parse_option(&mut self, macros: &impl MacroLookup, option: &Block) {
    match option.key.as_str() {
      "libraries" => {
        for item in option.items.iter().filter(|item| item.solve_condition(macros)) {
          if item.key == REMOVE_MARKER {
            self.remove_libraries(macros, item);
          } else {
            self.add_libraries(macros, item);
          }
        }
      }
      "ignore_libraries" => extend_list(&mut self.ignore_libraries, macros, option),
      "options" => extend_list(&mut self.options, macros, option),

      "output_file" => {
        if let Some(value) = required_value(option) {
          self.output_file = Some(clean_path(value, macros));
        }
      }
      "debug_file" => {
        if let Some(value) = required_value(option) {
          self.debug_file = Some(clean_path(value, macros));
        }
      }
      "import_library" => {
        if let Some(value) = required_value(option) {
          self.import_library = Some(macros.replace(value));
        }
      }
      "entry_point" => {
        if let Some(value) = required_value(option) {
          self.entry_point = Some(macros.replace(value));
        }
      }
      "ignore_import_library" => {
        self.ignore_import_library = convert_bool(self.ignore_import_library, option);
      }

      _ => option.error("unknown linker option"),
    }
  }
}
