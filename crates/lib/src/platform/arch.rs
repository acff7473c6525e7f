use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ParseError;

/// CPU architectures a pass can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  I386,
  Amd64,
  Arm,
  Arm64,
}

impl Arch {
  pub const ALL: [Arch; 4] = [Arch::I386, Arch::Amd64, Arch::Arm, Arch::Arm64];

  /// Detect the host CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::I386),
      "x86_64" => Some(Self::Amd64),
      "arm" => Some(Self::Arm),
      "aarch64" => Some(Self::Arm64),
      _ => None,
    }
  }

  /// Upper-case name used for the architecture's macros (`$AMD64`, `$QPC_ARCH`)
  pub fn name(&self) -> &'static str {
    match self {
      Self::I386 => "I386",
      Self::Amd64 => "AMD64",
      Self::Arm => "ARM",
      Self::Arm64 => "ARM64",
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::I386 => "i386",
      Self::Amd64 => "amd64",
      Self::Arm => "arm",
      Self::Arm64 => "arm64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|arch| arch.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| ParseError::Arch(s.to_string()))
  }
}
