//! Generation of project plans and their cache records.
//!
//! Each script is checked against its cache record first. Stale or missing
//! records cause the script to be walked over every pass and the record to be
//! rewritten. A master file tracks the whole script list as one record.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use qpc_lib::block::read_file;
use qpc_lib::cache::{HashStore, Invocation};
use qpc_lib::options::RunOptions;
use qpc_lib::project::{BaseInfo, GeneratorInfo, ProjectContainer, ProjectRegistry};
use qpc_lib::util::path::{join_normalized, parent, strip_extension, to_posix};

use crate::generators;
use crate::output::{format_list, print_info, print_json, print_stat, print_success, print_warning};

pub struct GenerateArgs {
  pub scripts: Vec<PathBuf>,
  pub master_file: Option<PathBuf>,
  pub json: bool,
  pub options: RunOptions,
}

/// A project script resolved to an absolute path.
struct Script {
  file: PathBuf,
  dir: PathBuf,
  /// Absolute forward-slash path, the project's identity in cache records.
  path: String,
  file_name: String,
  name: String,
}

impl Script {
  fn resolve(path: &Path) -> Result<Self> {
    let file =
      dunce::canonicalize(path).with_context(|| format!("Failed to resolve project script: {}", path.display()))?;
    let posix = to_posix(&file.to_string_lossy());
    let file_name = posix[parent(&posix).len()..].trim_start_matches('/').to_string();
    let name = strip_extension(&file_name).to_string();
    let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();

    Ok(Self {
      file,
      dir,
      path: posix,
      file_name,
      name,
    })
  }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
  Generated,
  Skipped,
}

#[derive(Serialize)]
struct ProjectReport {
  script: String,
  status: Status,
  #[serde(skip_serializing_if = "Option::is_none")]
  record: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  project: Option<ProjectContainer>,
}

#[derive(Serialize)]
struct MasterReport {
  path: String,
  status: Status,
  members: Vec<String>,
}

#[derive(Serialize)]
struct RunReport {
  projects: Vec<ProjectReport>,
  #[serde(skip_serializing_if = "Option::is_none")]
  master: Option<MasterReport>,
}

pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
  let options = &args.options;
  let generators = generators::select(&options.generators)?;

  let exe = std::env::current_exe().context("Failed to locate the qpc executable")?;
  let store = HashStore::from_env(Invocation::from(options))
    .context("Failed to open the cache directory")?
    .with_base_files(&[exe]);

  let scripts = args
    .scripts
    .iter()
    .map(|path| Script::resolve(path))
    .collect::<Result<Vec<_>>>()?;

  let mut registry = ProjectRegistry::new();
  let mut base_info = BaseInfo::default();
  for script in &scripts {
    let definition = registry.define_project(&script.name);
    definition.add_script(&script.file, &script.path);
    definition.platforms.extend(options.platforms.iter().copied());
    base_info.add_dependency_path(&script.name, &script.path);
  }

  let mut projects = Vec::with_capacity(scripts.len());
  for script in &scripts {
    let report = generate_script(script, &registry, &base_info, &generators, &store, args.json, options)?;
    projects.push(report);
  }

  let master = match &args.master_file {
    Some(path) => Some(update_master(path, &scripts, &store, args.json, options)?),
    None => None,
  };

  if args.json {
    print_json(&RunReport { projects, master })?;
  }

  Ok(())
}

fn generate_script(
  script: &Script,
  registry: &ProjectRegistry,
  base_info: &BaseInfo,
  generators: &[GeneratorInfo],
  store: &HashStore,
  json: bool,
  options: &RunOptions,
) -> Result<ProjectReport> {
  if !options.force && store.check_hash(&script.path, None, false) {
    if !json {
      print_info(&format!("Up to date: {}", script.path));
    }
    return Ok(ProjectReport {
      script: script.path.clone(),
      status: Status::Skipped,
      record: None,
      project: None,
    });
  }

  debug!(script = %script.path, "walking project script");
  let blocks = read_file(&script.file).with_context(|| format!("Failed to read project script: {}", script.path))?;
  let definition = registry
    .project(&script.name)
    .with_context(|| format!("Project not defined: {}", script.name))?;

  let mut project = ProjectContainer::new(&script.name, &script.path, base_info, definition, generators, options);
  project.set_base_dir(script.dir.clone());
  project.parse_script(&blocks);

  if project.get_all_passes().is_empty() {
    print_warning(&format!(
      "No passes for {}: no selected generator supports the requested platforms",
      project.get_display_name()
    ));
  }

  debug!(
    project = %script.name,
    passes = project.get_all_passes().len(),
    dependencies = project.dependencies.len(),
    "resolved project"
  );

  let mut tracked = vec![script.file_name.clone()];
  tracked.extend(project.get_glob_files());
  let dependencies: Vec<String> = project.dependencies.iter().cloned().collect();
  let record = store
    .write_hash_file(&script.path, &project.out_dir, &tracked, &dependencies)
    .with_context(|| format!("Failed to write cache record for {}", script.path))?;

  if !json {
    print_summary(&project, &record);
  }

  Ok(ProjectReport {
    script: script.path.clone(),
    status: Status::Generated,
    record: Some(to_posix(&record.to_string_lossy())),
    project: Some(project),
  })
}

fn print_summary(project: &ProjectContainer, record: &Path) {
  let platforms: Vec<String> = project.get_platforms().iter().map(ToString::to_string).collect();
  let archs: Vec<String> = project.get_archs().iter().map(ToString::to_string).collect();
  let dependencies: Vec<String> = project.dependencies.iter().cloned().collect();

  print_success(&format!("Generated {}", project.get_display_name()));
  print_stat("Passes", &project.get_all_passes().len().to_string());
  print_stat("Platforms", &format_list(&platforms));
  print_stat("Archs", &format_list(&archs));
  print_stat("Source files", &project.get_all_source_files().len().to_string());
  print_stat("Dependencies", &format_list(&dependencies));
  print_stat("Record", &record.display().to_string());
}

fn update_master(
  path: &Path,
  scripts: &[Script],
  store: &HashStore,
  json: bool,
  options: &RunOptions,
) -> Result<MasterReport> {
  let cwd = std::env::current_dir().context("Failed to read the current directory")?;
  let master_path = join_normalized(&to_posix(&cwd.to_string_lossy()), &to_posix(&path.to_string_lossy()));
  let members: Vec<String> = scripts.iter().map(|script| script.path.clone()).collect();

  let status = if !options.force && store.check_hash(&master_path, Some(&members), true) {
    if !json {
      print_info(&format!("Up to date: {master_path}"));
    }
    Status::Skipped
  } else {
    let record = store
      .write_master_file(&master_path, parent(&master_path), &members, store)
      .with_context(|| format!("Failed to write master record for {master_path}"))?;
    if !json {
      print_success(&format!("Updated master file {master_path}"));
      print_stat("Members", &members.len().to_string());
      print_stat("Record", &record.display().to_string());
    }
    Status::Generated
  };

  Ok(MasterReport {
    path: master_path,
    status,
    members,
  })
}
