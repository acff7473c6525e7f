//! Hash-based change detection for generated projects.
//!
//! Every generated project gets a cache record named after its script path.
//! A record is valid while the invocation, the tracked files and (for master
//! records) the member projects' dependency lists are unchanged.
//!
//! # Layout
//!
//! ```text
//! {hash_dir}/
//! ├── engine.engine.qpc_hash      # record for engine/engine.qpc
//! └── game.qpc_hash               # master record for "game"
//! ```
//!
//! # Submodules
//!
//! - [`dependencies`] - transitive dependency lists and their hashes
//! - [`record`] - record structure and rendering

pub mod dependencies;
pub mod record;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::block::{Block, read_file};
use crate::consts::{HASH_EXT, SCRIPT_EXT, SCRIPT_HASH_EXT};
use crate::options::RunOptions;
use crate::platform::paths::hash_dir;
use crate::util::hash::{ContentHash, hash_file, hash_path};
use crate::util::path::{extension, join_normalized, normalize, parent, to_posix};

pub use dependencies::{DependencyRecords, dependency_hash, transitive_dependencies};
pub use record::{Commands, HashRecord};

const PROJECT_BLOCKS: [&str; 2] = ["commands", "hashes"];
const MASTER_BLOCKS: [&str; 3] = ["commands", "files", "project_dependencies"];

/// Number of checked keys a valid `commands` block holds.
const COMMAND_COUNT: usize = 4;

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("no cache directory available, set QPC_CACHE_DIR")]
  NoCacheDir,

  #[error("failed to create cache directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write cache record {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Argument lists a record must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
  pub add: Vec<String>,
  pub remove: Vec<String>,
  pub generators: Vec<String>,
  pub macros: Vec<String>,
}

impl From<&RunOptions> for Invocation {
  fn from(options: &RunOptions) -> Self {
    Self {
      add: options.add.clone(),
      remove: options.remove.clone(),
      generators: options.generators.clone(),
      macros: options.macros.clone(),
    }
  }
}

/// Reads, validates and writes cache records in one directory.
#[derive(Debug, Clone)]
pub struct HashStore {
  dir: PathBuf,
  working_dir: String,
  invocation: Invocation,
  /// Tool files every project record tracks, by path.
  base_hashes: IndexMap<String, ContentHash>,
}

impl HashStore {
  /// A store in `dir` for the current directory and invocation.
  pub fn new(dir: impl Into<PathBuf>, invocation: Invocation) -> Self {
    let working_dir = std::env::current_dir()
      .map(|dir| to_posix(&dir.to_string_lossy()))
      .unwrap_or_else(|_| ".".to_string());
    Self {
      dir: dir.into(),
      working_dir,
      invocation,
      base_hashes: IndexMap::new(),
    }
  }

  /// A store in the default hash directory.
  pub fn from_env(invocation: Invocation) -> Result<Self, CacheError> {
    let dir = hash_dir().ok_or(CacheError::NoCacheDir)?;
    Ok(Self::new(dir, invocation))
  }

  pub fn with_working_dir(mut self, dir: &str) -> Self {
    self.working_dir = normalize(dir);
    self
  }

  /// Track the content of the given tool files in every project record.
  pub fn with_base_files(mut self, files: &[PathBuf]) -> Self {
    self.base_hashes = files
      .iter()
      .map(|file| (to_posix(&file.to_string_lossy()), hash_file(file)))
      .collect();
    self
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// File name of the record for `project_path`.
  ///
  /// Separators become dots. Scripts ending in `.qpc` get `_hash` appended,
  /// anything else `.qpc_hash`.
  pub fn hash_file_name(project_path: &str) -> String {
    let name = to_posix(project_path).replace(['/', ':'], ".");
    let name = name.trim_start_matches('.');
    format!("{name}{}", Self::hash_file_ext(name))
  }

  pub fn hash_file_ext(project_path: &str) -> &'static str {
    if extension(project_path) == SCRIPT_EXT {
      SCRIPT_HASH_EXT
    } else {
      HASH_EXT
    }
  }

  pub fn hash_file_path(&self, project_path: &str) -> PathBuf {
    self.dir.join(Self::hash_file_name(project_path))
  }

  /// Whether the record for `project_path` is still valid.
  ///
  /// `file_list` is the authoritative member list of a master record.
  pub fn check_hash(&self, project_path: &str, file_list: Option<&[String]>, master: bool) -> bool {
    self.check_hash_with(project_path, file_list, master, self)
  }

  /// [`check_hash`](Self::check_hash) with member dependency lists taken from
  /// `records`.
  pub fn check_hash_with(
    &self,
    project_path: &str,
    file_list: Option<&[String]>,
    master: bool,
    records: &impl DependencyRecords,
  ) -> bool {
    let Some(blocks) = self.read_record(project_path) else {
      return false;
    };

    let project_dir = parent(project_path);
    let mut found = BTreeSet::new();

    for block in &blocks {
      let valid = match block.key.as_str() {
        "commands" => self.check_commands(project_dir, &block.items),
        "hashes" => check_file_hashes(project_dir, &block.items),
        "project_dependencies" => check_project_dependencies(project_dir, &block.items, records),
        "files" => file_list.is_none_or(|list| check_files(project_dir, &block.items, list)),
        "dependencies" => continue,
        _ => {
          block.warning("unknown key in cache record");
          continue;
        }
      };
      if !valid {
        debug!(project = project_path, block = %block.key, "cache record out of date");
        return false;
      }
      found.insert(block.key.as_str());
    }

    let expected: BTreeSet<&str> = if master {
      MASTER_BLOCKS.into_iter().collect()
    } else {
      PROJECT_BLOCKS.into_iter().collect()
    };
    if found != expected {
      debug!(project = project_path, ?found, "cache record incomplete");
      return false;
    }

    info!("Valid: {}{}", project_path, Self::hash_file_ext(project_path));
    true
  }

  fn read_record(&self, project_path: &str) -> Option<Vec<Block>> {
    let path = self.hash_file_path(project_path);
    if !path.is_file() {
      debug!(path = %path.display(), "no cache record");
      return None;
    }
    match read_file(&path) {
      Ok(blocks) if !blocks.is_empty() => Some(blocks),
      Ok(_) => None,
      Err(e) => {
        debug!(path = %path.display(), error = %e, "unreadable cache record");
        None
      }
    }
  }

  fn project_working_dir(&self, project_dir: &str) -> String {
    join_normalized(&self.working_dir, project_dir)
  }

  fn check_commands(&self, project_dir: &str, commands: &[Block]) -> bool {
    let mut found = 0;

    for command in commands {
      let matches = match command.key.as_str() {
        "working_dir" => command.value().map(normalize) == Some(self.project_working_dir(project_dir)),
        "out_dir" => continue,
        "add" => same_arguments(&self.invocation.add, &command.values),
        "remove" => same_arguments(&self.invocation.remove, &command.values),
        "generators" => same_arguments(&self.invocation.generators, &command.values),
        "macros" => same_arguments(&self.invocation.macros, &command.values),
        "base_script_count" => command.value().and_then(|count| count.parse().ok()) == Some(self.base_hashes.len()),
        _ => {
          command.warning("unknown key in cache record");
          continue;
        }
      };
      if !matches {
        debug!(key = %command.key, "invocation changed");
        return false;
      }
      found += 1;
    }

    found == COMMAND_COUNT
  }

  /// Working directory stored in the record for `project_path`.
  pub fn recorded_working_dir(&self, project_path: &str) -> Option<String> {
    let blocks = self.read_record(project_path)?;
    let commands = blocks.iter().find(|block| block.key == "commands")?;
    commands.get_item("working_dir")?.value().map(normalize)
  }

  fn commands(&self, project_path: &str, out_dir: &str) -> Commands {
    Commands {
      working_dir: self.project_working_dir(parent(project_path)),
      out_dir: to_posix(out_dir),
      macros: self.invocation.macros.clone(),
      ..Default::default()
    }
  }

  /// Write the record of an ordinary project.
  ///
  /// `tracked` holds files and glob patterns, resolved like the record's
  /// own paths: relative to the project's directory.
  pub fn write_hash_file(
    &self,
    project_path: &str,
    out_dir: &str,
    tracked: &[String],
    dependencies: &[String],
  ) -> Result<PathBuf, CacheError> {
    let project_dir = parent(project_path);
    let mut hashes: Vec<(ContentHash, String)> = self
      .base_hashes
      .iter()
      .map(|(path, hash)| (hash.clone(), path.clone()))
      .collect();
    hashes.extend(
      tracked
        .iter()
        .map(|path| (hash_path(&join_normalized(project_dir, path)), to_posix(path))),
    );

    let record = HashRecord {
      commands: Commands {
        generators: Some(self.invocation.generators.clone()),
        base_script_count: Some(self.base_hashes.len()),
        ..self.commands(project_path, out_dir)
      },
      hashes: Some(hashes),
      dependencies: Some(dependencies.iter().map(|path| to_posix(path)).collect()),
      ..Default::default()
    };
    self.write_record(project_path, &record)
  }

  /// Write the record of a master file listing `files`, with each member's
  /// transitive dependency list taken from `records`.
  pub fn write_master_file(
    &self,
    master_path: &str,
    out_dir: &str,
    files: &[String],
    records: &impl DependencyRecords,
  ) -> Result<PathBuf, CacheError> {
    let project_dependencies = files
      .iter()
      .map(|file| {
        let dependencies = transitive_dependencies(records, file);
        let hash = (!dependencies.is_empty()).then(|| dependency_hash(&dependencies));
        (to_posix(file), hash)
      })
      .collect();

    let record = HashRecord {
      commands: Commands {
        add: Some(self.invocation.add.clone()),
        remove: Some(self.invocation.remove.clone()),
        ..self.commands(master_path, out_dir)
      },
      files: Some(files.iter().map(|file| to_posix(file)).collect()),
      project_dependencies: Some(project_dependencies),
      ..Default::default()
    };
    self.write_record(master_path, &record)
  }

  fn write_record(&self, project_path: &str, record: &HashRecord) -> Result<PathBuf, CacheError> {
    self.ensure_dir()?;

    let path = self.hash_file_path(project_path);
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, record.render()).map_err(|source| CacheError::Write {
      path: temp_path.clone(),
      source,
    })?;
    fs::rename(&temp_path, &path).map_err(|source| CacheError::Write {
      path: path.clone(),
      source,
    })?;

    debug!(project = project_path, path = %path.display(), "wrote cache record");
    Ok(path)
  }

  fn ensure_dir(&self) -> Result<(), CacheError> {
    fs::create_dir_all(&self.dir).map_err(|source| CacheError::CreateDir {
      path: self.dir.clone(),
      source,
    })
  }
}

impl DependencyRecords for HashStore {
  fn recorded_dependencies(&self, project_path: &str) -> Vec<String> {
    let Some(blocks) = self.read_record(project_path) else {
      return Vec::new();
    };
    blocks
      .iter()
      .find(|block| block.key == "dependencies")
      .map(|block| block.items.iter().flat_map(Block::get_list).collect())
      .unwrap_or_default()
  }
}

fn same_arguments(current: &[String], recorded: &[String]) -> bool {
  let mut current = current.to_vec();
  let mut recorded = recorded.to_vec();
  current.sort();
  recorded.sort();
  current == recorded
}

fn check_file_hashes(project_dir: &str, hashes: &[Block]) -> bool {
  hashes.iter().all(|entry| {
    let Some(path) = entry.value() else {
      return false;
    };
    let valid = hash_path(&join_normalized(project_dir, path)) == *entry.key.as_str();
    if !valid {
      debug!(path, "tracked file changed");
    }
    valid
  })
}

fn check_project_dependencies(project_dir: &str, entries: &[Block], records: &impl DependencyRecords) -> bool {
  entries.iter().all(|entry| {
    let script = join_normalized(project_dir, &entry.key);
    let dependencies = transitive_dependencies(records, &script);
    match (entry.value(), dependencies.is_empty()) {
      (None, true) => true,
      (Some(_), true) | (None, false) => {
        debug!(project = %script, "dependency set changed");
        false
      }
      (Some(recorded), false) => dependency_hash(&dependencies) == *recorded,
    }
  })
}

fn check_files(project_dir: &str, entries: &[Block], file_list: &[String]) -> bool {
  let members: BTreeSet<String> = file_list.iter().map(|file| normalize(file)).collect();
  entries.iter().all(|entry| {
    let member = join_normalized(project_dir, &entry.key);
    let listed = members.contains(&member);
    if !listed {
      debug!(project = %member, "master file members changed");
    }
    listed
  })
}
