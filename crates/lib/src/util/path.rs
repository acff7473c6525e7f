//! String-level path helpers.
//!
//! Project scripts and cache records store paths as forward-slash strings, so
//! normalisation happens on text rather than through `std::path`.

/// Replace backslashes with forward slashes.
pub fn to_posix(path: &str) -> String {
  path.replace('\\', "/")
}

/// Lexically normalise a path: collapse `.`, `..` and repeated separators.
///
/// Leading `..` components of a relative path are kept. An empty result is
/// returned as `"."`.
pub fn normalize(path: &str) -> String {
  let path = to_posix(path);
  let absolute = path.starts_with('/');
  let mut parts: Vec<&str> = Vec::new();

  for part in path.split('/') {
    match part {
      "" | "." => {}
      ".." => match parts.last() {
        Some(&last) if last != ".." => {
          parts.pop();
        }
        _ if absolute => {}
        _ => parts.push(".."),
      },
      _ => parts.push(part),
    }
  }

  let joined = parts.join("/");
  match (absolute, joined.is_empty()) {
    (true, _) => format!("/{joined}"),
    (false, true) => ".".to_string(),
    (false, false) => joined,
  }
}

/// Join `base` and `path` unless `path` is absolute or `base` is empty, then
/// normalise.
pub fn join_normalized(base: &str, path: &str) -> String {
  if base.is_empty() || is_absolute(path) {
    normalize(path)
  } else {
    normalize(&format!("{base}/{path}"))
  }
}

/// Whether a path is absolute, accepting Windows drive prefixes as well.
pub fn is_absolute(path: &str) -> bool {
  let bytes = path.as_bytes();
  path.starts_with('/')
    || path.starts_with('\\')
    || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// The directory portion of a path, without a trailing separator.
pub fn parent(path: &str) -> &str {
  match path.rfind(['/', '\\']) {
    Some(index) => &path[..index],
    None => "",
  }
}

/// The extension of the final component, including the dot.
pub fn extension(path: &str) -> &str {
  let name_start = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
  let name = &path[name_start..];
  match name.rfind('.') {
    Some(0) | None => "",
    Some(index) => &name[index..],
  }
}

/// The path with its final extension removed.
pub fn strip_extension(path: &str) -> &str {
  let ext = extension(path);
  &path[..path.len() - ext.len()]
}

/// Whether a path contains glob metacharacters.
pub fn is_glob(path: &str) -> bool {
  path.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_collapses_dots_and_separators() {
    assert_eq!(normalize("src/./lib//a.cpp"), "src/lib/a.cpp");
    assert_eq!(normalize("src/lib/../a.cpp"), "src/a.cpp");
    assert_eq!(normalize("../shared/x.h"), "../shared/x.h");
    assert_eq!(normalize("/opt/../usr/lib"), "/usr/lib");
    assert_eq!(normalize("a/.."), ".");
  }

  #[test]
  fn normalize_converts_backslashes() {
    assert_eq!(normalize("build\\bin\\engine.exe"), "build/bin/engine.exe");
  }

  #[test]
  fn join_respects_absolute_paths() {
    assert_eq!(join_normalized("proj", "src/a.cpp"), "proj/src/a.cpp");
    assert_eq!(join_normalized("proj", "/abs/a.cpp"), "/abs/a.cpp");
    assert_eq!(join_normalized("", "a.cpp"), "a.cpp");
    assert!(is_absolute("C:/tools/x.exe"));
  }

  #[test]
  fn extension_handling() {
    assert_eq!(extension("src/main.cpp"), ".cpp");
    assert_eq!(extension("src.dir/Makefile"), "");
    assert_eq!(extension(".gitignore"), "");
    assert_eq!(strip_extension("lib/tier0.lib"), "lib/tier0");
    assert_eq!(strip_extension("lib/tier0"), "lib/tier0");
  }

  #[test]
  fn parent_of_paths() {
    assert_eq!(parent("game/client/client.qpc"), "game/client");
    assert_eq!(parent("client.qpc"), "");
  }

  #[test]
  fn glob_detection() {
    assert!(is_glob("src/*.cpp"));
    assert!(is_glob("src/file?.h"));
    assert!(!is_glob("src/file.h"));
  }
}
