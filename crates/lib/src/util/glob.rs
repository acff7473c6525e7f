//! Glob expansion against the filesystem.

use std::path::Path;

use tracing::warn;

use crate::util::path::{is_absolute, to_posix};

/// Expand `pattern` and return the sorted matches as forward-slash paths.
///
/// A relative pattern is matched under `base` and its matches are returned
/// relative to `base`. An empty `base` means the current directory.
pub fn expand(base: &Path, pattern: &str) -> Vec<String> {
  let relative = !is_absolute(pattern) && !base.as_os_str().is_empty();
  let full = if relative {
    format!("{}/{}", to_posix(&base.to_string_lossy()), pattern)
  } else {
    pattern.to_string()
  };

  let entries = match ::glob::glob(&full) {
    Ok(paths) => paths,
    Err(e) => {
      warn!(pattern, error = %e, "invalid glob pattern");
      return Vec::new();
    }
  };

  let mut matches: Vec<String> = entries
    .filter_map(Result::ok)
    .map(|path| {
      let path = if relative {
        path.strip_prefix(base).map(Path::to_path_buf).unwrap_or(path)
      } else {
        path
      };
      to_posix(&path.to_string_lossy())
    })
    .collect();
  matches.sort();
  matches
}
