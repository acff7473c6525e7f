//! Generators known to the command line.
//!
//! Only their descriptors live here: which platforms each one serves and the
//! macro it defines in its passes.

use anyhow::{Result, bail};

use qpc_lib::platform::Platform;
use qpc_lib::project::GeneratorInfo;

pub fn registered() -> Vec<GeneratorInfo> {
  vec![
    GeneratorInfo::new("makefile", Some("MAKEFILE"), &[Platform::Linux, Platform::MacOs]),
    GeneratorInfo::new("visual_studio", Some("VISUAL_STUDIO"), &[Platform::Windows]),
    GeneratorInfo::new("ninja", Some("NINJA"), &Platform::ALL),
    GeneratorInfo::new("compile_commands", Some("COMPILE_COMMANDS"), &Platform::ALL),
  ]
}

/// Descriptors for the requested generator names, in request order.
pub fn select(names: &[String]) -> Result<Vec<GeneratorInfo>> {
  let known = registered();
  let mut selected: Vec<GeneratorInfo> = Vec::new();

  for name in names {
    let Some(generator) = known.iter().find(|generator| generator.id.eq_ignore_ascii_case(name)) else {
      let ids: Vec<&str> = known.iter().map(|generator| generator.id.as_str()).collect();
      bail!("Unknown generator '{}', expected one of: {}", name, ids.join(", "));
    };
    if !selected.contains(generator) {
      selected.push(generator.clone());
    }
  }

  Ok(selected)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn selects_in_request_order_without_duplicates() {
    let names = vec!["ninja".to_string(), "Makefile".to_string(), "ninja".to_string()];
    let ids: Vec<String> = select(&names).unwrap().into_iter().map(|generator| generator.id).collect();
    assert_eq!(ids, vec!["ninja", "makefile"]);
  }

  #[test]
  fn unknown_names_are_errors() {
    let err = select(&["xcode".to_string()]).unwrap_err();
    assert!(err.to_string().contains("xcode"));
    assert!(err.to_string().contains("compile_commands"));
  }
}
