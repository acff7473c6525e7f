use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::arch::Arch;
use super::ParseError;

/// Target platforms a project can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Windows,
  Linux,
  MacOs,
}

impl Platform {
  pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::MacOs];

  /// Detect the host platform at runtime
  ///
  /// Returns `None` if the host OS is not a generation target
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Upper-case name used for the platform's macros (`$WINDOWS`, `$QPC_PLATFORM`)
  pub fn name(&self) -> &'static str {
    match self {
      Self::Windows => "WINDOWS",
      Self::Linux => "LINUX",
      Self::MacOs => "MACOS",
    }
  }

  /// Returns the lowercase string identifier for this platform
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Windows => "windows",
      Self::Linux => "linux",
      Self::MacOs => "macos",
    }
  }

  /// Architectures a pass may target on this platform.
  pub fn archs(&self) -> &'static [Arch] {
    match self {
      Self::Windows | Self::Linux => &Arch::ALL,
      Self::MacOs => &[Arch::Amd64, Arch::Arm64],
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Platform {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|platform| platform.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| ParseError::Platform(s.to_string()))
  }
}
