use std::fs;
use std::path::Path;

use qpc_lib::options::RunOptions;
use qpc_lib::platform::{Arch, Platform};
use qpc_lib::project::{BaseInfo, GeneratorInfo, ProjectContainer, ProjectDefinition};
use qpc_lib::util::path::to_posix;

pub const ENGINE_SCRIPT: &str = r#"
// engine library
macro SRC_DIR "src"
macro OUT "$ROOT_DIR/bin"   [$WINDOWS]
macro OUT "$ROOT_DIR/lib"   [!$WINDOWS]

build_event copy_output DEST
{
    "cp" "$DEST"
}

files
{
    folder "Source Files"
    {
        "$SRC_DIR/*.cpp"
        - "$SRC_DIR/broken.cpp"
    }
    folder "Headers"
    {
        "$SRC_DIR/engine.h"
    }
}

dependencies
{
    "tier0/tier0"
}

configuration
{
    general
    {
        out_dir "$OUT"
        configuration_type "static_library"
    }
    compile
    {
        preprocessor_definitions
        {
            "ENGINE_DLL"
            "_DEBUG"    [$DEBUG]
        }
    }
    link
    {
        libraries
        {
            "tier0"
            "$ROOT_DIR/thirdparty/zlib.lib"
        }
    }
    post_build
    {
        copy_output "$OUT"
    }
}
"#;

/// Write a file, creating its parent directories.
pub fn write(root: &Path, relative: &str, content: &str) {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
}

/// Lay out an engine project with three sources.
pub fn engine_tree(root: &Path) {
  write(root, "engine/engine.qpc", ENGINE_SCRIPT);
  write(root, "engine/src/engine.cpp", "");
  write(root, "engine/src/render.cpp", "");
  write(root, "engine/src/broken.cpp", "");
  write(root, "engine/src/engine.h", "");
}

pub fn posix(path: &Path) -> String {
  to_posix(&path.to_string_lossy())
}

pub fn container(
  name: &str,
  script_path: &str,
  platforms: &[Platform],
  generators: &[GeneratorInfo],
  options: &RunOptions,
) -> ProjectContainer {
  let mut definition = ProjectDefinition::new(name, Vec::new());
  definition.platforms.extend(platforms.iter().copied());
  ProjectContainer::new(name, script_path, &BaseInfo::default(), &definition, generators, options)
}

pub fn linux_options(root_dir: &str) -> RunOptions {
  RunOptions {
    archs: vec![Arch::Amd64],
    platforms: vec![Platform::Linux],
    root_dir: root_dir.to_string(),
    generators: vec!["makefile".to_string()],
    ..Default::default()
  }
}

pub fn makefile() -> GeneratorInfo {
  GeneratorInfo::new("makefile", Some("MAKEFILE"), &[Platform::Linux, Platform::MacOs])
}
