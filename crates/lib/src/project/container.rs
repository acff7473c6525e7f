//! All passes of one project script.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, warn};

use super::base::{BaseInfo, PlatformBase};
use super::definition::ProjectDefinition;
use super::generator::Generator;
use super::pass::{PassTarget, ProjectPass};
use crate::consts::SCRIPT_EXT;
use crate::macros::MacroLookup;
use crate::options::RunOptions;
use crate::platform::{Arch, Platform};
use crate::util::path::{parent, strip_extension, to_posix};

/// The realised build plan of one project script.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContainer {
  pub file_name: String,
  pub project_path: String,
  pub out_dir: String,
  /// Macros every pass starts from.
  pub macros: IndexMap<String, String>,
  pub dependencies: IndexSet<String>,
  passes: Vec<ProjectPass>,
  #[serde(skip)]
  pub(crate) base_dir: PathBuf,
}

impl ProjectContainer {
  /// Expand the pass matrix for `definition`.
  ///
  /// One pass is created per (configuration, platform, architecture) triple
  /// reachable through any generator, whatever the number of generators
  /// asking for it.
  pub fn new<G: Generator>(
    name: &str,
    project_path: &str,
    base_info: &BaseInfo,
    definition: &ProjectDefinition,
    generators: &[G],
    options: &RunOptions,
  ) -> Self {
    let project_path = to_posix(project_path);
    let out_dir = parent(&project_path).to_string();

    let mut macros: IndexMap<String, String> = [
      ("$PROJECT_NAME", name),
      ("$PROJECT_DIR", out_dir.as_str()),
      ("$SCRIPT_NAME", name),
      ("$ROOT_DIR", options.root_dir.as_str()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    macros.extend(options.arg_macros());

    let mut container = Self {
      file_name: name.to_string(),
      project_path,
      out_dir,
      macros,
      dependencies: IndexSet::new(),
      passes: Vec::new(),
      base_dir: PathBuf::new(),
    };

    for generator in generators {
      let supported = generator.supported_platforms();
      for &platform in definition.platforms.iter().filter(|p| supported.contains(p)) {
        let Some(base) = base_info.get(platform) else {
          warn!(%platform, project = name, "no base info for platform");
          continue;
        };
        for config in &base.configurations {
          for &arch in platform.archs().iter().filter(|arch| options.archs.contains(arch)) {
            container.add_pass(
              PassTarget::new(config.as_str(), platform, arch),
              base,
              generator,
              options.check_files,
            );
          }
        }
      }
    }

    debug!(project = name, passes = container.passes.len(), "expanded passes");
    container
  }

  /// Add `generator` to the pass resolving `target`, creating it if needed.
  pub fn add_pass(
    &mut self,
    target: PassTarget,
    base: &Arc<PlatformBase>,
    generator: &impl Generator,
    check_files: bool,
  ) {
    if self.passes.iter_mut().any(|pass| pass.check_pass(&target, generator)) {
      return;
    }

    let mut pass = ProjectPass::new(
      target,
      &self.macros,
      Arc::clone(base),
      &self.file_name,
      generator,
      check_files,
    );
    pass.set_base_dir(self.base_dir.clone());
    self.passes.push(pass);
  }

  /// Directory relative file paths resolve against, for every pass.
  pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
    self.base_dir = dir.into();
    for pass in &mut self.passes {
      pass.set_base_dir(self.base_dir.clone());
    }
  }

  pub fn get_all_passes(&self) -> &[ProjectPass] {
    &self.passes
  }

  pub(crate) fn passes_mut(&mut self) -> &mut [ProjectPass] {
    &mut self.passes
  }

  /// Passes served by the generator `id`.
  pub fn get_passes(&self, id: &str) -> Vec<&ProjectPass> {
    self.passes.iter().filter(|pass| pass.serves(id)).collect()
  }

  pub fn get_passes_platform(&self, platforms: &[Platform]) -> Vec<&ProjectPass> {
    self
      .passes
      .iter()
      .filter(|pass| platforms.contains(&pass.target.platform))
      .collect()
  }

  pub fn get_platforms(&self) -> Vec<Platform> {
    let platforms: BTreeSet<Platform> = self.passes.iter().map(|pass| pass.target.platform).collect();
    platforms.into_iter().collect()
  }

  pub fn get_archs(&self) -> Vec<Arch> {
    let archs: BTreeSet<Arch> = self.passes.iter().map(|pass| pass.target.arch).collect();
    archs.into_iter().collect()
  }

  /// Glob patterns of every pass.
  pub fn get_glob_files(&self) -> IndexSet<String> {
    self
      .passes
      .iter()
      .flat_map(|pass| pass.get_glob_files().iter().cloned())
      .collect()
  }

  pub fn get_editor_folders(&self, sep: &str) -> BTreeSet<String> {
    self.passes.iter().flat_map(|pass| pass.get_editor_folders(sep)).collect()
  }

  pub fn get_folders(&self) -> BTreeSet<String> {
    self.passes.iter().flat_map(|pass| pass.get_folders()).collect()
  }

  /// `$PROJECT_NAME` as seen by the first pass, or the file name.
  pub fn get_display_name(&self) -> String {
    self
      .passes
      .first()
      .and_then(|pass| pass.macros().get("$PROJECT_NAME"))
      .unwrap_or(self.file_name.as_str())
      .to_string()
  }

  pub fn get_all_source_files(&self) -> IndexSet<String> {
    self
      .passes
      .iter()
      .flat_map(|pass| pass.source_files.keys().cloned())
      .collect()
  }

  pub fn get_all_files(&self) -> IndexSet<String> {
    self.passes.iter().flat_map(|pass| pass.files.keys().cloned()).collect()
  }

  /// Record a dependency on another project's script.
  ///
  /// The `.qpc` extension is added when missing. The project's own script is
  /// never recorded.
  pub fn add_dependency(&mut self, path: &str) {
    let path = dependency_script_path(path);
    if path != self.project_path {
      debug!(project = %self.project_path, dependency = %path, "add dependency");
      self.dependencies.insert(path);
    }
  }

  pub fn remove_dependency(&mut self, path: &str) {
    let path = dependency_script_path(path);
    self.dependencies.shift_remove(&path);
  }
}

fn dependency_script_path(path: &str) -> String {
  if path.ends_with(SCRIPT_EXT) {
    to_posix(path)
  } else {
    to_posix(&format!("{}{SCRIPT_EXT}", strip_extension(path)))
  }
}
