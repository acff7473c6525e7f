//! Crate-wide constants.

/// Application name, used for directory names under the XDG base dirs.
pub const APP_NAME: &str = "qpc";

/// Extension of project scripts.
pub const SCRIPT_EXT: &str = ".qpc";

/// Cache record extension for inputs that are project scripts.
pub const SCRIPT_HASH_EXT: &str = "_hash";

/// Cache record extension for any other input.
pub const HASH_EXT: &str = ".qpc_hash";

/// Environment variable overriding the cache record directory.
pub const CACHE_DIR_ENV: &str = "QPC_CACHE_DIR";

/// Extensions classified as compiled translation units.
pub const COMPILED_SOURCE_EXTS: &[&str] = &[".cpp", ".cxx", ".c", ".cc"];

/// Macro holding the static library extension of the pass's platform.
pub const STATICLIB_EXT_MACRO: &str = "$_STATICLIB_EXT";

/// Token that marks a subtractive entry in lists and build events.
pub const REMOVE_MARKER: &str = "-";

/// Read size used when hashing files.
pub const HASH_CHUNK_SIZE: usize = 8192;
