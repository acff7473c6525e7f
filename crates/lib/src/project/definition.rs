//! Project identities and groups, known before any pass is expanded.

use std::collections::BTreeSet;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use crate::platform::Platform;
use crate::util::path::to_posix;

/// A project as declared by name, with the scripts that make it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDefinition {
  pub name: String,
  pub scripts: IndexSet<String>,
  pub platforms: BTreeSet<Platform>,
  pub groups: BTreeSet<String>,
  /// Folder the project is shown under in generated solutions.
  pub folders: Vec<String>,
}

impl ProjectDefinition {
  pub fn new(name: impl Into<String>, folders: Vec<String>) -> Self {
    Self {
      name: name.into(),
      scripts: IndexSet::new(),
      platforms: BTreeSet::new(),
      groups: BTreeSet::new(),
      folders,
    }
  }

  pub fn add_group(&mut self, group: &str) {
    self.groups.insert(group.to_string());
  }

  /// Record `script_path` if the file exists at `cwd_path`.
  pub fn add_script(&mut self, cwd_path: &Path, script_path: &str) -> bool {
    if cwd_path.is_file() {
      self.scripts.insert(to_posix(script_path));
      true
    } else {
      false
    }
  }

  /// Record every script that exists under `base`. Returns whether all did.
  pub fn add_script_list(&mut self, base: &Path, script_paths: &[String]) -> bool {
    script_paths
      .iter()
      .map(|script| self.add_script(&base.join(script), script))
      .fold(true, |all, added| all && added)
  }
}

/// A named group of projects. Holds project names only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectGroup {
  pub name: String,
  pub projects: IndexSet<String>,
}

impl ProjectGroup {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      projects: IndexSet::new(),
    }
  }

  pub fn project_defined(&mut self, project: &str) {
    self.projects.insert(project.to_string());
  }
}

/// Every project definition and group of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectRegistry {
  projects: IndexMap<String, ProjectDefinition>,
  groups: IndexMap<String, ProjectGroup>,
}

impl ProjectRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// The definition named `name`, created on first use.
  pub fn define_project(&mut self, name: &str) -> &mut ProjectDefinition {
    self.projects.entry(name.to_string()).or_insert_with(|| {
      debug!(project = name, "define project");
      ProjectDefinition::new(name, Vec::new())
    })
  }

  /// Declare that `project` belongs to `group`.
  ///
  /// An already defined project joins the group immediately and takes
  /// `folders` if it has none yet. An unknown project is created with
  /// `folders` and joins when [`update_groups`](Self::update_groups) runs for
  /// it.
  pub fn add_project_to_group(&mut self, group: &str, project: &str, folders: &[String]) {
    let group_entry = self
      .groups
      .entry(group.to_string())
      .or_insert_with(|| ProjectGroup::new(group));

    match self.projects.get_mut(project) {
      Some(definition) => {
        if definition.folders.is_empty() {
          definition.folders = folders.to_vec();
        }
        group_entry.project_defined(project);
        definition.add_group(group);
      }
      None => {
        let mut definition = ProjectDefinition::new(project, folders.to_vec());
        definition.add_group(group);
        self.projects.insert(project.to_string(), definition);
      }
    }
  }

  /// Record `name` as a member of every group it declared.
  pub fn update_groups(&mut self, name: &str) {
    let Some(definition) = self.projects.get(name) else {
      return;
    };
    for group in &definition.groups {
      if let Some(group) = self.groups.get_mut(group) {
        group.project_defined(name);
      }
    }
  }

  pub fn project(&self, name: &str) -> Option<&ProjectDefinition> {
    self.projects.get(name)
  }

  pub fn project_mut(&mut self, name: &str) -> Option<&mut ProjectDefinition> {
    self.projects.get_mut(name)
  }

  pub fn group(&self, name: &str) -> Option<&ProjectGroup> {
    self.groups.get(name)
  }

  pub fn projects(&self) -> impl Iterator<Item = &ProjectDefinition> {
    self.projects.values()
  }

  pub fn groups(&self) -> impl Iterator<Item = &ProjectGroup> {
    self.groups.values()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn folders(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
  }

  #[test]
  fn group_membership_waits_for_update() {
    let mut registry = ProjectRegistry::new();
    registry.add_project_to_group("everything", "client", &folders(&["Game"]));

    assert!(registry.group("everything").unwrap().projects.is_empty());
    assert_eq!(registry.project("client").unwrap().folders, vec!["Game"]);

    registry.update_groups("client");
    let group = registry.group("everything").unwrap();
    assert_eq!(group.projects.iter().collect::<Vec<_>>(), vec!["client"]);
  }

  #[test]
  fn existing_project_joins_immediately_and_keeps_folders() {
    let mut registry = ProjectRegistry::new();
    registry.add_project_to_group("game", "client", &folders(&["Game"]));
    registry.add_project_to_group("all", "client", &folders(&["Other"]));

    let client = registry.project("client").unwrap();
    assert_eq!(client.folders, vec!["Game"]);
    assert_eq!(client.groups.iter().collect::<Vec<_>>(), vec!["all", "game"]);
    assert!(registry.group("all").unwrap().projects.contains("client"));
  }

  #[test]
  fn define_project_is_idempotent() {
    let mut registry = ProjectRegistry::new();
    registry.define_project("server").platforms.insert(Platform::Linux);
    registry.define_project("server").platforms.insert(Platform::Windows);
    assert_eq!(registry.projects().count(), 1);
    assert_eq!(registry.project("server").unwrap().platforms.len(), 2);
  }

  #[test]
  fn only_existing_scripts_are_recorded() {
    let temp = tempdir().unwrap();
    fs::create_dir(temp.path().join("client")).unwrap();
    fs::write(temp.path().join("client/client.qpc"), "").unwrap();

    let mut definition = ProjectDefinition::new("client", Vec::new());
    let scripts = vec!["client/client.qpc".to_string(), "client/missing.qpc".to_string()];
    assert!(!definition.add_script_list(temp.path(), &scripts));
    assert_eq!(definition.scripts.iter().collect::<Vec<_>>(), vec!["client/client.qpc"]);
  }
}
