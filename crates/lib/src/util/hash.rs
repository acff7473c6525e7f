//! Content hashing for change detection.
//!
//! This module provides:
//! - `ContentHash`: a 64-character SHA-256 digest, or the missing-file sentinel
//! - `hash_file()`: chunked whole-file hashing
//! - `hash_str()`: hashing of in-memory text (dependency lists)
//! - `hash_glob()`: hashing of a glob pattern's current match list
//! - `hash_path()`: either of the above, depending on the path

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::consts::HASH_CHUNK_SIZE;
use crate::util::glob;
use crate::util::path::is_glob;

/// A lowercase hexadecimal SHA-256 digest.
///
/// A missing or unreadable file hashes to the empty string, which never equals
/// a real digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl ContentHash {
  /// The sentinel used for files that could not be read.
  pub fn missing() -> Self {
    Self(String::new())
  }

  pub fn is_missing(&self) -> bool {
    self.0.is_empty()
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ContentHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl PartialEq<str> for ContentHash {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

/// Hash a file's contents in fixed-size chunks.
///
/// Returns [`ContentHash::missing`] when the file does not exist or cannot be
/// read.
pub fn hash_file(path: &Path) -> ContentHash {
  match try_hash_file(path) {
    Ok(hash) => hash,
    Err(e) if e.kind() == io::ErrorKind::NotFound => ContentHash::missing(),
    Err(e) => {
      warn!(path = %path.display(), error = %e, "failed to hash file");
      ContentHash::missing()
    }
  }
}

fn try_hash_file(path: &Path) -> io::Result<ContentHash> {
  let mut file = fs::File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; HASH_CHUNK_SIZE];

  loop {
    let bytes_read = file.read(&mut buffer)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash arbitrary text.
pub fn hash_str(text: &str) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(text.as_bytes());
  ContentHash(hex::encode(hasher.finalize()))
}

/// Hash the sorted match list of a glob pattern.
///
/// The digest changes when a file starts or stops matching, not when a
/// matched file's content changes.
pub fn hash_glob(pattern: &str) -> ContentHash {
  hash_str(&glob::expand(Path::new(""), pattern).join("\n"))
}

/// Hash a tracked path: glob patterns by their matches, files by content.
pub fn hash_path(path: &str) -> ContentHash {
  if is_glob(path) {
    hash_glob(path)
  } else {
    hash_file(Path::new(path))
  }
}
