use qpc_lib::block::read_file;
use qpc_lib::config::ConfigurationType;
use qpc_lib::macros::MacroLookup;
use qpc_lib::platform::{Arch, Platform};
use qpc_lib::project::GeneratorInfo;
use tempfile::TempDir;

use super::common::{container, engine_tree, linux_options, makefile, posix};

#[test]
fn engine_script_resolves_on_linux() {
  let temp = TempDir::new().unwrap();
  engine_tree(temp.path());
  let root = posix(temp.path());

  let script = read_file(&temp.path().join("engine/engine.qpc")).unwrap();
  let mut engine = container("engine", "engine/engine.qpc", &[Platform::Linux], &[makefile()], &linux_options(&root));
  engine.set_base_dir(temp.path().join("engine"));
  engine.parse_script(&script);

  assert_eq!(engine.get_all_passes().len(), 2);
  for pass in engine.get_all_passes() {
    assert_eq!(
      pass.source_files.keys().collect::<Vec<_>>(),
      vec!["src/engine.cpp", "src/render.cpp"]
    );
    assert_eq!(pass.get_file_folder("src/engine.h"), Some("Headers"));
    assert_eq!(pass.config.general.out_dir, format!("{root}/lib"));
    assert_eq!(pass.config.general.configuration_type, Some(ConfigurationType::StaticLibrary));
    assert_eq!(
      pass.config.linker.libraries,
      vec!["tier0.a".to_string(), format!("{root}/thirdparty/zlib.a")]
    );
    assert_eq!(pass.config.post_build, vec![format!("cp {root}/lib")]);

    let definitions = &pass.config.compile.preprocessor_definitions;
    match pass.target.config.as_str() {
      "Debug" => assert_eq!(definitions, &vec!["ENGINE_DLL", "_DEBUG"]),
      _ => assert_eq!(definitions, &vec!["ENGINE_DLL"]),
    }
  }

  assert_eq!(engine.get_glob_files().iter().collect::<Vec<_>>(), vec!["src/*.cpp"]);
  assert_eq!(engine.dependencies.iter().collect::<Vec<_>>(), vec!["tier0/tier0.qpc"]);
  let folders: Vec<_> = engine.get_editor_folders("/").into_iter().collect();
  assert_eq!(folders, vec!["Headers", "Source Files"]);
}

#[test]
fn windows_passes_see_windows_macros() {
  let temp = TempDir::new().unwrap();
  engine_tree(temp.path());
  let root = posix(temp.path());

  let script = read_file(&temp.path().join("engine/engine.qpc")).unwrap();
  let generators = [GeneratorInfo::new("visual_studio", Some("VISUAL_STUDIO"), &[Platform::Windows])];
  let mut options = linux_options(&root);
  options.archs = vec![Arch::I386, Arch::Amd64];
  let mut engine = container("engine", "engine/engine.qpc", &[Platform::Windows], &generators, &options);
  engine.set_base_dir(temp.path().join("engine"));
  engine.parse_script(&script);

  assert_eq!(engine.get_all_passes().len(), 4);
  assert_eq!(engine.get_archs(), vec![Arch::I386, Arch::Amd64]);
  for pass in engine.get_passes("visual_studio") {
    assert_eq!(pass.macros().get("$VISUAL_STUDIO"), Some("1"));
    assert_eq!(pass.config.general.out_dir, format!("{root}/bin"));
    assert!(pass.config.linker.libraries.contains(&"tier0.lib".to_string()));
  }
}

#[test]
fn passes_serialize_to_a_json_plan() {
  let temp = TempDir::new().unwrap();
  engine_tree(temp.path());
  let root = posix(temp.path());

  let script = read_file(&temp.path().join("engine/engine.qpc")).unwrap();
  let mut engine = container("engine", "engine/engine.qpc", &[Platform::Linux], &[makefile()], &linux_options(&root));
  engine.set_base_dir(temp.path().join("engine"));
  engine.parse_script(&script);

  let plan = serde_json::to_value(&engine).unwrap();
  let pass = &plan["passes"][0];
  assert_eq!(pass["target"]["config"], "Debug");
  assert_eq!(pass["target"]["platform"], "linux");
  assert_eq!(pass["target"]["arch"], "amd64");
  assert_eq!(pass["config"]["general"]["out_dir"], format!("{root}/lib"));
  assert_eq!(pass["macros"]["$QPC_CONFIG"], "Debug");
  assert!(pass["source_files"]["src/engine.cpp"].is_object());
  assert_eq!(plan["dependencies"][0], "tier0/tier0.qpc");
}
