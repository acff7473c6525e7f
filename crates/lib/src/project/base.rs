//! Per-platform base information shared by every project of a run.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::platform::Platform;

/// Configurations, extension macros and dependency aliases of one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformBase {
  pub configurations: Vec<String>,
  pub macros: IndexMap<String, String>,
  /// Project name to script path.
  pub dependency_paths: IndexMap<String, String>,
}

impl PlatformBase {
  /// `Debug` and `Release` with the platform's file extension macros.
  pub fn for_platform(platform: Platform) -> Self {
    let (staticlib, sharedlib, app, obj) = match platform {
      Platform::Windows => (".lib", ".dll", ".exe", ".obj"),
      Platform::Linux => (".a", ".so", "", ".o"),
      Platform::MacOs => (".a", ".dylib", "", ".o"),
    };

    let macros = [
      ("$_STATICLIB_EXT", staticlib),
      ("$_SHAREDLIB_EXT", sharedlib),
      ("$_APP_EXT", app),
      ("$_OBJ_EXT", obj),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect();

    Self {
      configurations: vec!["Debug".to_string(), "Release".to_string()],
      macros,
      dependency_paths: IndexMap::new(),
    }
  }

  /// Script path registered for `key`, or `key` itself.
  pub fn dependency_path(&self, key: &str) -> String {
    self.dependency_paths.get(key).cloned().unwrap_or_else(|| key.to_string())
  }
}

/// Base information for every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseInfo {
  platforms: IndexMap<Platform, Arc<PlatformBase>>,
}

impl Default for BaseInfo {
  fn default() -> Self {
    Self {
      platforms: Platform::ALL
        .into_iter()
        .map(|platform| (platform, Arc::new(PlatformBase::for_platform(platform))))
        .collect(),
    }
  }
}

impl BaseInfo {
  pub fn insert(&mut self, platform: Platform, base: PlatformBase) {
    self.platforms.insert(platform, Arc::new(base));
  }

  pub fn get(&self, platform: Platform) -> Option<&Arc<PlatformBase>> {
    self.platforms.get(&platform)
  }

  /// Register a project's script path on every platform.
  pub fn add_dependency_path(&mut self, name: &str, path: &str) {
    for base in self.platforms.values_mut() {
      Arc::make_mut(base)
        .dependency_paths
        .insert(name.to_string(), path.to_string());
    }
  }
}
