//! Target platforms and architectures, plus the per-user directories the tool
//! writes to.

pub mod arch;
pub mod os;
pub mod paths;

use thiserror::Error;

pub use arch::Arch;
pub use os::Platform;

/// Unknown platform or architecture name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("unknown platform '{0}', expected one of: windows, linux, macos")]
  Platform(String),

  #[error("unknown architecture '{0}', expected one of: i386, amd64, arm, arm64")]
  Arch(String),
}
