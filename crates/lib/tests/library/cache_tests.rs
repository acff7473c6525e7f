use qpc_lib::block::read_file;
use qpc_lib::cache::{DependencyRecords, HashStore, Invocation};
use qpc_lib::options::RunOptions;
use qpc_lib::platform::Platform;
use qpc_lib::project::ProjectContainer;
use tempfile::TempDir;

use super::common::{container, engine_tree, linux_options, makefile, posix, write};

fn generate(temp: &TempDir, options: &RunOptions) -> (String, ProjectContainer) {
  let script_path = format!("{}/engine/engine.qpc", posix(temp.path()));
  let script = read_file(&temp.path().join("engine/engine.qpc")).unwrap();
  let mut engine = container("engine", &script_path, &[Platform::Linux], &[makefile()], options);
  engine.set_base_dir(temp.path().join("engine"));
  engine.parse_script(&script);
  (script_path, engine)
}

fn store(temp: &TempDir, options: &RunOptions) -> HashStore {
  HashStore::new(temp.path().join("hashes"), Invocation::from(options)).with_working_dir(&posix(temp.path()))
}

fn write_record(store: &HashStore, script_path: &str, engine: &ProjectContainer) {
  let mut tracked = vec!["engine.qpc".to_string()];
  tracked.extend(engine.get_glob_files());
  let dependencies: Vec<String> = engine.dependencies.iter().cloned().collect();
  store
    .write_hash_file(script_path, &engine.out_dir, &tracked, &dependencies)
    .unwrap();
}

#[test]
fn regenerated_project_is_skipped_until_something_changes() {
  let temp = TempDir::new().unwrap();
  engine_tree(temp.path());
  let options = linux_options(&posix(temp.path()));
  let store = store(&temp, &options);

  let (script_path, engine) = generate(&temp, &options);
  assert!(!store.check_hash(&script_path, None, false));
  write_record(&store, &script_path, &engine);
  assert!(store.check_hash(&script_path, None, false));

  // a new source picked up by the recorded glob
  write(temp.path(), "engine/src/audio.cpp", "");
  assert!(!store.check_hash(&script_path, None, false));

  let (_, engine) = generate(&temp, &options);
  assert_eq!(engine.get_all_source_files().len(), 3);
  write_record(&store, &script_path, &engine);
  assert!(store.check_hash(&script_path, None, false));
}

#[test]
fn changed_macros_invalidate() {
  let temp = TempDir::new().unwrap();
  engine_tree(temp.path());
  let options = linux_options(&posix(temp.path()));

  let (script_path, engine) = generate(&temp, &options);
  write_record(&store(&temp, &options), &script_path, &engine);

  let mut with_macro = options.clone();
  with_macro.macros = vec!["STEAM".to_string()];
  assert!(!store(&temp, &with_macro).check_hash(&script_path, None, false));
}

#[test]
fn master_record_tracks_member_dependencies() {
  let temp = TempDir::new().unwrap();
  engine_tree(temp.path());
  let options = linux_options(&posix(temp.path()));
  let store = store(&temp, &options);

  let (script_path, engine) = generate(&temp, &options);
  write_record(&store, &script_path, &engine);
  assert_eq!(store.recorded_dependencies(&script_path), vec!["tier0/tier0.qpc"]);

  let master = format!("{}/everything", posix(temp.path()));
  let members = vec![script_path.clone()];
  store.write_master_file(&master, "", &members, &store).unwrap();
  assert!(store.check_hash(&master, Some(&members), true));

  // the engine drops its dependency on regeneration
  write(
    temp.path(),
    "engine/engine.qpc",
    "files\n{\n    \"src/*.cpp\"\n}\n",
  );
  let (_, engine) = generate(&temp, &options);
  assert!(engine.dependencies.is_empty());
  write_record(&store, &script_path, &engine);
  assert!(!store.check_hash(&master, Some(&members), true));
}
