//! Output generator descriptors.
//!
//! Generators consume resolved passes and emit build-tool project files. The
//! engine only needs to know which platforms each one supports and which
//! macro it defines in the passes it is served by.

use serde::Serialize;

use crate::platform::Platform;

/// An output backend as seen by pass expansion.
pub trait Generator {
  /// Stable identifier, also the name used on the command line.
  fn id(&self) -> &str;

  /// Macro name (without `$`) defined as `1` in the generator's passes.
  fn macro_name(&self) -> Option<&str>;

  fn supported_platforms(&self) -> &[Platform];
}

/// Plain descriptor implementing [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorInfo {
  pub id: String,
  pub macro_name: Option<String>,
  pub platforms: Vec<Platform>,
}

impl GeneratorInfo {
  pub fn new(id: impl Into<String>, macro_name: Option<&str>, platforms: &[Platform]) -> Self {
    Self {
      id: id.into(),
      macro_name: macro_name.map(str::to_string),
      platforms: platforms.to_vec(),
    }
  }
}

impl Generator for GeneratorInfo {
  fn id(&self) -> &str {
    &self.id
  }

  fn macro_name(&self) -> Option<&str> {
    self.macro_name.as_deref()
  }

  fn supported_platforms(&self) -> &[Platform] {
    &self.platforms
  }
}
