//! A single resolved (configuration, platform, architecture) target.
//!
//! A pass is built in two phases. While its macro table is open, the script
//! walker defines macros and build events. Once the table is frozen, files,
//! options and build steps are resolved against it.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use super::base::PlatformBase;
use super::generator::Generator;
use crate::block::Block;
use crate::build_event::BuildEvents;
use crate::config::{BuildStep, Configuration, OptionGroup, SourceFileCompile, convert_bool};
use crate::consts::COMPILED_SOURCE_EXTS;
use crate::macros::{MacroError, MacroLookup, MacroState};
use crate::platform::{Arch, Platform};
use crate::util::glob;
use crate::util::path::{extension, is_glob, parent};

/// The (configuration, platform, architecture) triple a pass resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PassTarget {
  pub config: String,
  pub platform: Platform,
  pub arch: Arch,
}

impl PassTarget {
  pub fn new(config: impl Into<String>, platform: Platform, arch: Arch) -> Self {
    Self {
      config: config.into(),
      platform,
      arch,
    }
  }
}

/// A compiled translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
  pub folder: String,
  pub compile: SourceFileCompile,
}

impl SourceFile {
  pub fn new(folder: impl Into<String>) -> Self {
    Self {
      folder: folder.into(),
      compile: SourceFileCompile::default(),
    }
  }
}

/// One resolved build target of a project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPass {
  pub target: PassTarget,
  macros: MacroState,
  pub config: Configuration,
  /// Compiled sources by path.
  pub source_files: IndexMap<String, SourceFile>,
  /// Other files by path, with their folder.
  pub files: IndexMap<String, String>,
  glob_files: IndexSet<String>,
  generators: BTreeSet<String>,
  #[serde(skip)]
  base: Arc<PlatformBase>,
  #[serde(skip)]
  build_events: BuildEvents,
  #[serde(skip)]
  base_dir: PathBuf,
  #[serde(skip)]
  check_files: bool,
}

impl ProjectPass {
  pub fn new(
    target: PassTarget,
    container_macros: &IndexMap<String, String>,
    base: Arc<PlatformBase>,
    file_name: &str,
    generator: &impl Generator,
    check_files: bool,
  ) -> Self {
    let mut macros = MacroState::default();
    if let MacroState::Open(builder) = &mut macros {
      builder.extend(container_macros.iter().map(|(k, v)| (k.as_str(), v.as_str())));
      builder.extend(base.macros.iter().map(|(k, v)| (k.as_str(), v.as_str())));
      builder.insert(format!("${}", target.config.to_uppercase()), "1");
      builder.insert(format!("${}", target.platform.name()), "1");
      builder.insert(format!("${}", target.arch.name()), "1");
      builder.insert("$QPC_CONFIG", target.config.as_str());
      builder.insert("$QPC_PLATFORM", target.platform.name());
      builder.insert("$QPC_ARCH", target.arch.name());
    }

    let mut pass = Self {
      config: Configuration::new(file_name, target.platform),
      target,
      macros,
      source_files: IndexMap::new(),
      files: IndexMap::new(),
      glob_files: IndexSet::new(),
      generators: BTreeSet::new(),
      base,
      build_events: BuildEvents::default(),
      base_dir: PathBuf::new(),
      check_files,
    };
    pass.add_generator(generator);
    pass
  }

  /// Join this pass if it resolves `target`, adding the generator to it.
  pub fn check_pass(&mut self, target: &PassTarget, generator: &impl Generator) -> bool {
    if self.target == *target {
      self.add_generator(generator);
      true
    } else {
      false
    }
  }

  pub fn add_generator(&mut self, generator: &impl Generator) {
    self.generators.insert(generator.id().to_string());
    if let Some(name) = generator.macro_name() {
      let name = format!("${name}");
      match self.macros.builder(&name) {
        Ok(builder) => builder.insert(name, "1"),
        Err(e) => debug!(error = %e, "generator added after macros were frozen"),
      }
    }
  }

  pub fn generators(&self) -> &BTreeSet<String> {
    &self.generators
  }

  /// Whether this pass is served by the generator `id`.
  pub fn serves(&self, id: &str) -> bool {
    self.generators.contains(id)
  }

  pub fn macros(&self) -> &MacroState {
    &self.macros
  }

  pub fn replace(&self, text: &str) -> String {
    self.macros.replace(text)
  }

  /// Directory relative paths, globs and existence checks resolve against.
  /// Empty means the current directory.
  pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
    self.base_dir = dir.into();
  }

  /// Define `$name`. A value-less definition only creates the macro, empty,
  /// when it does not exist yet.
  pub fn set_macro(&mut self, name: &str, value: Option<&str>) -> Result<(), MacroError> {
    let key = format!("${name}");
    let builder = self.macros.builder(&key)?;
    match value.filter(|value| !value.is_empty()) {
      Some(value) => builder.set(&key, value),
      None => builder.set_default(&key),
    }
    Ok(())
  }

  pub fn freeze_macros(&mut self) {
    self.macros.freeze();
  }

  pub fn define_build_event(&mut self, block: &Block) {
    self.build_events.define(block);
  }

  pub fn build_events(&self) -> &BuildEvents {
    &self.build_events
  }

  /// Script path for a dependency key, with macros expanded.
  pub fn dependency_path(&self, key: &str) -> String {
    self.replace(&self.base.dependency_path(key))
  }

  /// Add the files named by a block (its key and values).
  ///
  /// Returns the paths that were added as source files.
  pub fn add_file(&mut self, folders: &[String], block: &Block) -> Vec<String> {
    let folder = folders.join("/");
    let mut added = Vec::new();

    for path in block.get_list() {
      let path = self.replace(&path);
      if is_glob(&path) {
        let matches = glob::expand(&self.base_dir, &path);
        self.glob_files.insert(path);
        for found in matches {
          if self.add_file_path(&folder, found.clone(), block) {
            added.push(found);
          }
        }
      } else if self.add_file_path(&folder, path.clone(), block) {
        added.push(path);
      }
    }

    added
  }

  /// Route one literal path into the source or other file map. Returns
  /// whether it was added as a source file.
  fn add_file_path(&mut self, folder: &str, path: String, block: &Block) -> bool {
    if self.source_files.contains_key(&path) || self.files.contains_key(&path) {
      block.warning(&format!("file already added: {path}"));
      return false;
    }
    if !self.file_exists(&path, block) {
      return false;
    }

    let forced = block
      .get_item("build")
      .is_some_and(|build| build.solve_condition(&self.macros) && build.value() == Some("true"));

    if forced || COMPILED_SOURCE_EXTS.contains(&extension(&path)) {
      debug!(path, folder, "add source file");
      self.source_files.insert(path, SourceFile::new(folder));
      true
    } else {
      debug!(path, folder, "add file");
      self.files.insert(path, folder.to_string());
      false
    }
  }

  fn file_exists(&self, path: &str, block: &Block) -> bool {
    if !self.check_files || self.base_dir.join(path).is_file() {
      return true;
    }
    block.warning(&format!("file does not exist: {path}"));
    false
  }

  /// Apply a file block's `build` and `compile` children to the source files
  /// it added.
  pub fn apply_file_options(&mut self, paths: &[String], block: &Block) {
    let macros = &self.macros;
    for path in paths {
      let Some(source_file) = self.source_files.get_mut(path) else {
        continue;
      };
      for child in block.items.iter().filter(|child| child.solve_condition(macros)) {
        match child.key.as_str() {
          "build" => source_file.compile.build = convert_bool(source_file.compile.build, child),
          "compile" | "compiler" => {
            for option in child.items.iter().filter(|option| option.solve_condition(macros)) {
              source_file.compile.parse_option(macros, option);
            }
          }
          _ => child.warning("unknown file option"),
        }
      }
    }
  }

  /// Remove the files named by a block's values.
  pub fn remove_file(&mut self, block: &Block) {
    for path in &block.values {
      let path = self.replace(path);
      if is_glob(&path) {
        let matches = glob::expand(&self.base_dir, &path);
        self.glob_files.insert(path);
        for found in matches {
          self.remove_file_path(&found, block);
        }
      } else {
        self.remove_file_path(&path, block);
      }
    }
  }

  fn remove_file_path(&mut self, path: &str, block: &Block) {
    if self.source_files.shift_remove(path).is_none() && self.files.shift_remove(path).is_none() {
      block.warning(&format!("trying to remove a file that isn't added: \"{path}\""));
    }
  }

  /// Apply a `configuration` block: option groups and build steps whose
  /// condition holds.
  pub fn parse_configuration(&mut self, block: &Block) {
    for group in &block.items {
      if !group.solve_condition(&self.macros) {
        continue;
      }
      match BuildStep::from_key(&group.key) {
        Some(step) => self.parse_build_step(step, group),
        None => self.config.parse_group(&self.macros, group),
      }
    }
  }

  /// Apply a `pre_build`/`pre_link`/`post_build` block.
  ///
  /// `post_build copy "a" "b"` calls `copy` once with the values. In the
  /// list form each child either calls the event it is named after or, when
  /// no such event exists, is appended as a literal command.
  pub fn parse_build_step(&mut self, step: BuildStep, group: &Block) {
    if let Some((event_name, args)) = group.values.split_first() {
      if !self.build_events.contains(event_name) {
        group.warning(&format!("undefined build event: {event_name}"));
      } else if group.items.is_empty() {
        self.call_build_event(step, event_name, args, group);
      } else {
        self.call_build_event_items(step, event_name, &group.items);
      }
      return;
    }

    for option in &group.items {
      if !option.solve_condition(&self.macros) {
        continue;
      }
      if !self.build_events.contains(&option.key) {
        self.config.add_command(step, &self.macros, option);
      } else if option.items.is_empty() {
        self.call_build_event(step, &option.key, &option.values, option);
      } else {
        self.call_build_event_items(step, &option.key, &option.items);
      }
    }
  }

  /// Call an event once with macro-expanded `args`.
  pub fn call_build_event(&mut self, step: BuildStep, event_name: &str, args: &[String], site: &Block) {
    let Some(event) = self.build_events.get(event_name) else {
      return;
    };
    let args = self.macros.replace_all(args);
    event.call(self.config.step_mut(step), &args, site);
  }

  /// Call an event once per argument of each child block whose condition
  /// holds.
  ///
  /// A child named after the event passes its values, any other child passes
  /// its key and values, and a child with its own children does the same for
  /// each grandchild.
  pub fn call_build_event_items(&mut self, step: BuildStep, event_name: &str, items: &[Block]) {
    for option in items {
      if !option.solve_condition(&self.macros) {
        continue;
      }
      if !option.items.is_empty() {
        for nested in &option.items {
          if nested.solve_condition(&self.macros) {
            self.fire_build_event(step, event_name, nested, &nested.get_list());
          }
        }
      } else if option.key == event_name {
        self.fire_build_event(step, event_name, option, &option.values);
      } else {
        self.fire_build_event(step, event_name, option, &option.get_list());
      }
    }
  }

  /// Call an event with each of `args` on its own. A glob argument fires once
  /// per match.
  fn fire_build_event(&mut self, step: BuildStep, event_name: &str, site: &Block, args: &[String]) {
    let Some(event) = self.build_events.get(event_name) else {
      return;
    };
    let args = self.macros.replace_all(args);
    let target = self.config.step_mut(step);

    for arg in &args {
      if is_glob(arg) {
        for found in glob::expand(&self.base_dir, arg) {
          event.call(target, std::slice::from_ref(&found), site);
        }
      } else {
        event.call(target, std::slice::from_ref(arg), site);
      }
    }
  }

  /// Every folder used by the pass's files, with each nesting level listed
  /// separately and joined with `sep`.
  pub fn get_editor_folders(&self, sep: &str) -> BTreeSet<String> {
    let folders = self
      .files
      .values()
      .map(String::as_str)
      .chain(self.source_files.values().map(|file| file.folder.as_str()));
    split_folders(folders, sep)
  }

  /// Every directory containing one of the pass's files, with each nesting
  /// level listed separately.
  pub fn get_folders(&self) -> BTreeSet<String> {
    let dirs = self.files.keys().chain(self.source_files.keys()).map(|path| parent(path));
    split_folders(dirs, "/")
  }

  pub fn get_files_in_folder(&self, folder: &str) -> Vec<&str> {
    self
      .files
      .iter()
      .filter(|(_, file_folder)| *file_folder == folder)
      .map(|(path, _)| path.as_str())
      .chain(
        self
          .source_files
          .iter()
          .filter(|(_, file)| file.folder == folder)
          .map(|(path, _)| path.as_str()),
      )
      .collect()
  }

  /// Folder of a non-compiled file. The path may contain macros.
  pub fn get_file_folder(&self, path: &str) -> Option<&str> {
    self.files.get(&self.replace(path)).map(String::as_str)
  }

  /// A compiled source file. The path may contain macros.
  pub fn get_source_file(&self, path: &str) -> Option<&SourceFile> {
    self.source_files.get(&self.replace(path))
  }

  /// Glob patterns expanded while adding or removing files.
  pub fn get_glob_files(&self) -> &IndexSet<String> {
    &self.glob_files
  }
}

/// Split `a/b/c` into `a`, `a<sep>b` and `a<sep>b<sep>c`.
fn split_folders<'a>(folders: impl Iterator<Item = &'a str>, sep: &str) -> BTreeSet<String> {
  let mut result = BTreeSet::new();
  for folder in folders {
    let mut current = String::new();
    for part in folder.split(['/', '\\']).filter(|part| !part.is_empty()) {
      if !current.is_empty() {
        current.push_str(sep);
      }
      current.push_str(part);
      result.insert(current.clone());
    }
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::project::base::PlatformBase;
  use crate::project::generator::GeneratorInfo;
  use std::fs;
  use tempfile::tempdir;
  use tracing_test::traced_test;

  fn make_generator() -> GeneratorInfo {
    GeneratorInfo::new("makefile", Some("MAKEFILE"), &[Platform::Linux])
  }

  fn make_pass() -> ProjectPass {
    let container: IndexMap<String, String> = [("$PROJECT_NAME", "engine"), ("$ROOT_DIR", "..")]
      .into_iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    ProjectPass::new(
      PassTarget::new("Debug", Platform::Linux, Arch::Amd64),
      &container,
      Arc::new(PlatformBase::for_platform(Platform::Linux)),
      "engine",
      &make_generator(),
      false,
    )
  }

  fn frozen_pass() -> ProjectPass {
    let mut pass = make_pass();
    pass.freeze_macros();
    pass
  }

  fn folder(name: &str) -> Vec<String> {
    vec![name.to_string()]
  }

  mod macros {
    use super::*;

    #[test]
    fn seeded_with_target_flags() {
      let pass = make_pass();
      let macros = pass.macros();
      assert_eq!(macros.get("$DEBUG"), Some("1"));
      assert_eq!(macros.get("$LINUX"), Some("1"));
      assert_eq!(macros.get("$AMD64"), Some("1"));
      assert_eq!(macros.get("$MAKEFILE"), Some("1"));
      assert_eq!(macros.get("$QPC_CONFIG"), Some("Debug"));
      assert_eq!(macros.get("$QPC_PLATFORM"), Some("LINUX"));
      assert_eq!(macros.get("$QPC_ARCH"), Some("AMD64"));
      assert_eq!(macros.get("$_STATICLIB_EXT"), Some(".a"));
      assert_eq!(macros.get("$PROJECT_NAME"), Some("engine"));
    }

    #[test]
    fn valueless_macro_keeps_existing_value() {
      let mut pass = make_pass();
      pass.set_macro("OUT", Some("$ROOT_DIR/bin")).unwrap();
      pass.set_macro("OUT", None).unwrap();
      pass.set_macro("EMPTY", None).unwrap();
      assert_eq!(pass.replace("$OUT"), "../bin");
      assert_eq!(pass.macros().get("$EMPTY"), Some(""));
    }

    #[test]
    fn frozen_pass_rejects_macros() {
      let mut pass = frozen_pass();
      assert!(matches!(pass.set_macro("LATE", Some("1")), Err(MacroError::Frozen(_))));
    }

    #[test]
    fn check_pass_merges_generators_for_the_same_target() {
      let mut pass = make_pass();
      let ninja = GeneratorInfo::new("ninja", Some("NINJA"), &[Platform::Linux]);
      assert!(pass.check_pass(&PassTarget::new("Debug", Platform::Linux, Arch::Amd64), &ninja));
      assert!(!pass.check_pass(&PassTarget::new("Release", Platform::Linux, Arch::Amd64), &ninja));
      assert!(pass.serves("ninja") && pass.serves("makefile"));
      assert_eq!(pass.macros().get("$NINJA"), Some("1"));
    }
  }

  mod files {
    use super::*;

    #[test]
    fn classified_by_extension() {
      let mut pass = frozen_pass();
      let block = Block::new("src/main.cpp").with_values(["src/util.c", "include/util.h"]);
      let added = pass.add_file(&folder("Source Files"), &block);

      assert_eq!(added, vec!["src/main.cpp", "src/util.c"]);
      assert_eq!(pass.source_files.len(), 2);
      assert_eq!(pass.files.get("include/util.h").map(String::as_str), Some("Source Files"));
    }

    #[test]
    fn build_true_forces_a_source_file() {
      let mut pass = frozen_pass();
      let block = Block::new("shaders/list.txt").with_items(vec![Block::new("build").with_values(["true"])]);
      pass.add_file(&[], &block);
      assert!(pass.source_files.contains_key("shaders/list.txt"));
      assert!(pass.files.is_empty());
    }

    #[test]
    #[traced_test]
    fn duplicates_are_ignored_with_a_warning() {
      let mut pass = frozen_pass();
      pass.add_file(&[], &Block::new("a.cpp").with_values(["notes.txt"]));
      pass.add_file(&[], &Block::new("a.cpp").with_values(["notes.txt"]));
      assert_eq!(pass.source_files.len(), 1);
      assert_eq!(pass.files.len(), 1);
      assert!(logs_contain("file already added: a.cpp"));
    }

    #[test]
    #[traced_test]
    fn remove_looks_in_both_maps() {
      let mut pass = frozen_pass();
      pass.add_file(&[], &Block::new("a.cpp").with_values(["b.h"]));
      pass.remove_file(&Block::new("-").with_values(["a.cpp", "b.h", "c.h"]));
      assert!(pass.source_files.is_empty());
      assert!(pass.files.is_empty());
      assert!(logs_contain("isn't added: \"c.h\""));
    }

    #[test]
    fn globs_are_expanded_and_recorded() {
      let temp = tempdir().unwrap();
      fs::create_dir(temp.path().join("src")).unwrap();
      fs::write(temp.path().join("src/a.cpp"), "").unwrap();
      fs::write(temp.path().join("src/b.cpp"), "").unwrap();

      let mut pass = frozen_pass();
      pass.set_base_dir(temp.path());
      pass.add_file(&[], &Block::new("src/*.cpp"));
      pass.remove_file(&Block::new("-").with_values(["src/b.*"]));

      assert_eq!(pass.source_files.keys().collect::<Vec<_>>(), vec!["src/a.cpp"]);
      assert_eq!(pass.get_glob_files().iter().collect::<Vec<_>>(), vec!["src/*.cpp", "src/b.*"]);
    }

    #[test]
    #[traced_test]
    fn check_files_skips_missing_paths() {
      let temp = tempdir().unwrap();
      fs::write(temp.path().join("present.h"), "").unwrap();

      let mut pass = make_pass();
      pass.check_files = true;
      pass.set_base_dir(temp.path());
      pass.add_file(&[], &Block::new("present.h").with_values(["absent.h"]));

      assert_eq!(pass.files.len(), 1);
      assert!(logs_contain("file does not exist: absent.h"));
    }

    #[test]
    fn per_file_compile_options() {
      let mut pass = frozen_pass();
      let block = Block::new("fast.cpp").with_items(vec![
        Block::new("build").with_values(["false"]),
        Block::new("compile").with_items(vec![
          Block::new("preprocessor_definitions").with_items(vec![Block::new("FAST")]),
        ]),
      ]);
      let added = pass.add_file(&[], &block);
      pass.apply_file_options(&added, &block);

      let file = pass.get_source_file("fast.cpp").unwrap();
      assert!(!file.compile.build);
      assert_eq!(file.compile.compile.preprocessor_definitions, vec!["FAST"]);
    }

    #[test]
    fn folder_queries() {
      let mut pass = frozen_pass();
      pass.add_file(&["Game".into(), "Client".into()], &Block::new("game/client/hud.cpp"));
      pass.add_file(&folder("Docs"), &Block::new("README.md"));

      let editor: Vec<_> = pass.get_editor_folders("\\").into_iter().collect();
      assert_eq!(editor, vec!["Docs", "Game", "Game\\Client"]);

      let dirs: Vec<_> = pass.get_folders().into_iter().collect();
      assert_eq!(dirs, vec!["game", "game/client"]);

      assert_eq!(pass.get_files_in_folder("Game/Client"), vec!["game/client/hud.cpp"]);
      assert_eq!(pass.get_file_folder("README.md"), Some("Docs"));
      assert_eq!(pass.get_file_folder("missing.md"), None);
    }
  }

  mod build_steps {
    use super::*;

    fn copy_event() -> Block {
      Block::new("build_event")
        .with_values(["copy", "SRC", "DEST"])
        .with_items(vec![Block::new("cp").with_values(["$SRC", "$DEST"])])
    }

    fn pass_with_event() -> ProjectPass {
      let mut pass = make_pass();
      pass.set_macro("OUT", Some("out")).unwrap();
      pass.define_build_event(&copy_event());
      pass.freeze_macros();
      pass
    }

    #[test]
    fn inline_call_expands_pass_macros_in_arguments() {
      let mut pass = pass_with_event();
      let group = Block::new("post_build").with_values(["copy", "$OUT/a.so", "bin"]);
      pass.parse_build_step(BuildStep::PostBuild, &group);
      assert_eq!(pass.config.post_build, vec!["cp out/a.so bin"]);
    }

    #[test]
    fn list_form_mixes_events_and_literal_commands() {
      let mut pass = pass_with_event();
      let group = Block::new("pre_build").with_items(vec![
        Block::new("copy").with_values(["x", "y"]),
        Block::new("echo").with_values(["$OUT"]),
        Block::new("copy").with_values(["skipped", "z"]).with_condition("$WINDOWS"),
      ]);
      pass.parse_build_step(BuildStep::PreBuild, &group);
      assert_eq!(pass.config.pre_build, vec!["cp x y", "echo out"]);
    }

    fn install_event() -> Block {
      Block::new("build_event")
        .with_values(["install", "FILE"])
        .with_items(vec![Block::new("cp").with_values(["$FILE", "bin"])])
    }

    fn pass_in(dir: &std::path::Path) -> ProjectPass {
      let mut pass = make_pass();
      pass.define_build_event(&install_event());
      pass.freeze_macros();
      pass.set_base_dir(dir);
      pass
    }

    #[test]
    fn glob_arguments_fire_once_per_match() {
      let temp = tempdir().unwrap();
      fs::write(temp.path().join("a.dll"), "").unwrap();
      fs::write(temp.path().join("b.dll"), "").unwrap();

      let mut pass = pass_in(temp.path());
      let group = Block::new("post_build")
        .with_values(["install"])
        .with_items(vec![Block::new("*.dll")]);
      pass.parse_build_step(BuildStep::PostBuild, &group);

      assert_eq!(pass.config.post_build, vec!["cp a.dll bin", "cp b.dll bin"]);
    }

    #[test]
    #[traced_test]
    fn list_form_fires_once_per_argument() {
      let temp = tempdir().unwrap();
      for file in ["a.dll", "b.dll", "c.pdb", "d.pdb"] {
        fs::write(temp.path().join(file), "").unwrap();
      }

      let mut pass = pass_in(temp.path());
      let group = Block::new("post_build")
        .with_values(["install"])
        .with_items(vec![Block::new("install").with_values(["readme.txt", "*.dll", "*.pdb", "$PROJECT_NAME.so"])]);
      pass.parse_build_step(BuildStep::PostBuild, &group);

      assert_eq!(
        pass.config.post_build,
        vec![
          "cp readme.txt bin",
          "cp a.dll bin",
          "cp b.dll bin",
          "cp c.pdb bin",
          "cp d.pdb bin",
          "cp engine.so bin",
        ]
      );
      assert!(!logs_contain("extra arguments"));
    }

    #[test]
    #[traced_test]
    fn undefined_event_warns() {
      let mut pass = pass_with_event();
      pass.parse_build_step(BuildStep::PreLink, &Block::new("pre_link").with_values(["sign", "x"]));
      assert!(pass.config.pre_link.is_empty());
      assert!(logs_contain("undefined build event: sign"));
    }
  }
}
