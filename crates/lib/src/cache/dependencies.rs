//! Dependency lists recorded in project cache records.

use indexmap::{IndexMap, IndexSet};

use crate::util::hash::{ContentHash, hash_str};

/// A source of per-project dependency lists.
pub trait DependencyRecords {
  /// Direct dependencies recorded for `project_path`. Empty when the project
  /// has none or no record exists.
  fn recorded_dependencies(&self, project_path: &str) -> Vec<String>;
}

impl DependencyRecords for IndexMap<String, Vec<String>> {
  fn recorded_dependencies(&self, project_path: &str) -> Vec<String> {
    self.get(project_path).cloned().unwrap_or_default()
  }
}

/// Every project `project_path` depends on, directly or through another
/// dependency, in discovery order. The project itself is never included,
/// even when a cycle leads back to it.
pub fn transitive_dependencies(records: &impl DependencyRecords, project_path: &str) -> Vec<String> {
  let mut seen: IndexSet<String> = IndexSet::new();
  let mut pending = records.recorded_dependencies(project_path);
  pending.reverse();

  while let Some(dependency) = pending.pop() {
    if dependency == project_path || !seen.insert(dependency.clone()) {
      continue;
    }
    let mut nested = records.recorded_dependencies(&dependency);
    nested.reverse();
    pending.extend(nested);
  }

  seen.into_iter().collect()
}

/// Hash of a dependency list, independent of its order.
pub fn dependency_hash(dependencies: &[String]) -> ContentHash {
  let mut sorted: Vec<&str> = dependencies.iter().map(String::as_str).collect();
  sorted.sort_unstable();
  hash_str(&sorted.join(" "))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn records(entries: &[(&str, Vec<&str>)]) -> IndexMap<String, Vec<String>> {
    entries
      .iter()
      .map(|(project, deps)| (project.to_string(), deps.iter().map(|d| d.to_string()).collect()))
      .collect()
  }

  #[test]
  fn follows_nested_dependencies() {
    let records = records(&[
      ("client.qpc", vec!["engine.qpc", "tier1.qpc"]),
      ("engine.qpc", vec!["tier0.qpc"]),
      ("tier1.qpc", vec!["tier0.qpc"]),
    ]);
    assert_eq!(
      transitive_dependencies(&records, "client.qpc"),
      vec!["engine.qpc", "tier0.qpc", "tier1.qpc"]
    );
  }

  #[test]
  fn cycles_terminate_and_exclude_the_root() {
    let records = records(&[("a.qpc", vec!["b.qpc"]), ("b.qpc", vec!["a.qpc", "c.qpc"])]);
    assert_eq!(transitive_dependencies(&records, "a.qpc"), vec!["b.qpc", "c.qpc"]);
    assert!(transitive_dependencies(&records, "unknown.qpc").is_empty());
  }

  #[test]
  fn hash_ignores_order() {
    let forward = vec!["a.qpc".to_string(), "b.qpc".to_string()];
    let backward = vec!["b.qpc".to_string(), "a.qpc".to_string()];
    assert_eq!(dependency_hash(&forward), dependency_hash(&backward));
    assert_eq!(dependency_hash(&forward), hash_str("a.qpc b.qpc"));
  }
}
