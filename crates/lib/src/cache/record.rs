//! Cache records rendered in block syntax.
//!
//! ```text
//! commands
//! {
//!     working_dir "/src/engine"
//!     out_dir "/src/engine/build"
//!     generators "makefile"
//!     base_script_count "1"
//!     macros "STEAM"
//! }
//!
//! hashes
//! {
//!     "9f86d0...15b0f00a08" "/src/engine/engine.qpc"
//! }
//! ```

use std::fmt::Write;

use crate::util::hash::ContentHash;

/// The `commands` block: the invocation a record was written under.
///
/// Project records carry `generators` and `base_script_count`, master records
/// carry `add` and `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commands {
  pub working_dir: String,
  pub out_dir: String,
  pub add: Option<Vec<String>>,
  pub remove: Option<Vec<String>>,
  pub generators: Option<Vec<String>>,
  pub base_script_count: Option<usize>,
  pub macros: Vec<String>,
}

/// A cache record as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashRecord {
  pub commands: Commands,
  /// `(hash, path)` pairs.
  pub hashes: Option<Vec<(ContentHash, String)>>,
  /// Direct dependencies of a project record.
  pub dependencies: Option<Vec<String>>,
  /// Member scripts of a master record.
  pub files: Option<Vec<String>>,
  /// Member script to the hash of its sorted dependency list, absent when it
  /// has none.
  pub project_dependencies: Option<Vec<(String, Option<ContentHash>)>>,
}

impl HashRecord {
  pub fn render(&self) -> String {
    let mut out = String::new();
    let commands = &self.commands;

    out.push_str("commands\n{\n");
    line(&mut out, "working_dir", [commands.working_dir.as_str()]);
    line(&mut out, "out_dir", [commands.out_dir.as_str()]);
    if let Some(add) = &commands.add {
      line(&mut out, "add", add.iter().map(String::as_str));
    }
    if let Some(remove) = &commands.remove {
      line(&mut out, "remove", remove.iter().map(String::as_str));
    }
    if let Some(generators) = &commands.generators {
      line(&mut out, "generators", generators.iter().map(String::as_str));
    }
    if let Some(count) = commands.base_script_count {
      line(&mut out, "base_script_count", [count.to_string().as_str()]);
    }
    line(&mut out, "macros", commands.macros.iter().map(String::as_str));
    out.push_str("}\n");

    if let Some(hashes) = &self.hashes {
      section(&mut out, "hashes", hashes.iter().map(|(hash, path)| vec![hash.as_str(), path.as_str()]));
    }
    if let Some(files) = &self.files {
      section(&mut out, "files", files.iter().map(|path| vec![path.as_str()]));
    }
    if let Some(dependencies) = &self.dependencies {
      section(&mut out, "dependencies", dependencies.iter().map(|path| vec![path.as_str()]));
    }
    if let Some(project_dependencies) = &self.project_dependencies {
      section(
        &mut out,
        "project_dependencies",
        project_dependencies.iter().map(|(path, hash)| match hash {
          Some(hash) => vec![path.as_str(), hash.as_str()],
          None => vec![path.as_str()],
        }),
      );
    }

    out
  }
}

fn line<'a>(out: &mut String, key: &str, values: impl IntoIterator<Item = &'a str>) {
  out.push('\t');
  out.push_str(key);
  for value in values {
    let _ = write!(out, " {}", quote(value));
  }
  out.push('\n');
}

fn section<'a>(out: &mut String, key: &str, entries: impl Iterator<Item = Vec<&'a str>>) {
  let _ = write!(out, "\n{key}\n{{\n");
  for entry in entries {
    let quoted: Vec<String> = entry.into_iter().map(quote).collect();
    let _ = writeln!(out, "\t{}", quoted.join(" "));
  }
  out.push_str("}\n");
}

/// Quote a value so the block reader returns it unchanged.
pub fn quote(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
