mod cmd;
mod generators;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qpc_lib::options::RunOptions;
use qpc_lib::platform::{Arch, Platform};
use qpc_lib::util::path::to_posix;

use cmd::GenerateArgs;
use output::print_error;

/// qpc - project generator for multi-platform C/C++ builds
#[derive(Parser)]
#[command(name = "qpc")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project scripts to generate
  #[arg(required = true)]
  scripts: Vec<PathBuf>,

  /// Value of $ROOT_DIR (default: current directory)
  #[arg(long)]
  root_dir: Option<PathBuf>,

  /// Architectures to create passes for (default: host architecture)
  #[arg(short, long = "arch", num_args = 1..)]
  archs: Vec<Arch>,

  /// Output generators to run
  #[arg(short, long, num_args = 1.., required = true)]
  generators: Vec<String>,

  /// Projects or groups to add
  #[arg(long, num_args = 1..)]
  add: Vec<String>,

  /// Projects or groups to remove
  #[arg(long, num_args = 1..)]
  remove: Vec<String>,

  /// Macros to define, as NAME or NAME=value
  #[arg(short, long, num_args = 1..)]
  macros: Vec<String>,

  /// Platforms to generate for (default: host platform)
  #[arg(long, num_args = 1..)]
  platforms: Vec<Platform>,

  /// Warn about and skip listed files that do not exist
  #[arg(long)]
  check_files: bool,

  /// Regenerate even when the cache record is valid
  #[arg(short, long)]
  force: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,

  /// Only report errors
  #[arg(long)]
  hide_warnings: bool,

  /// Print the resolved plan as JSON
  #[arg(long)]
  json: bool,

  /// Also track the scripts in an aggregate record at this path
  #[arg(long)]
  master_file: Option<PathBuf>,
}

impl Cli {
  fn run_options(&self) -> Result<RunOptions> {
    let root_dir = match &self.root_dir {
      Some(dir) => dunce::canonicalize(dir).with_context(|| format!("Failed to resolve root dir: {}", dir.display()))?,
      None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let defaults = RunOptions::default();
    Ok(RunOptions {
      verbose: self.verbose,
      hide_warnings: self.hide_warnings,
      check_files: self.check_files,
      root_dir: to_posix(&root_dir.to_string_lossy()),
      archs: if self.archs.is_empty() { defaults.archs } else { self.archs.clone() },
      platforms: if self.platforms.is_empty() {
        defaults.platforms
      } else {
        self.platforms.clone()
      },
      add: self.add.clone(),
      remove: self.remove.clone(),
      generators: self.generators.clone(),
      macros: self.macros.clone(),
      force: self.force,
    })
  }
}

fn log_filter(verbose: bool, hide_warnings: bool) -> EnvFilter {
  if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
    return EnvFilter::from_default_env();
  }
  let level = if verbose {
    "debug"
  } else if hide_warnings {
    "error"
  } else {
    "info"
  };
  EnvFilter::new(level)
}

fn run(cli: Cli) -> Result<()> {
  let options = cli.run_options()?;
  cmd::cmd_generate(GenerateArgs {
    scripts: cli.scripts,
    master_file: cli.master_file,
    json: cli.json,
    options,
  })
}

fn main() {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(log_filter(cli.verbose, cli.hide_warnings))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_lists_and_flags() {
    let cli = Cli::parse_from([
      "qpc",
      "engine.qpc",
      "-g",
      "makefile",
      "ninja",
      "-a",
      "amd64",
      "ARM64",
      "--platforms",
      "linux",
      "-m",
      "STEAM",
      "GAME=hl2",
      "--force",
    ]);
    assert_eq!(cli.scripts, vec![PathBuf::from("engine.qpc")]);
    assert_eq!(cli.generators, vec!["makefile", "ninja"]);
    assert_eq!(cli.archs, vec![Arch::Amd64, Arch::Arm64]);
    assert_eq!(cli.platforms, vec![Platform::Linux]);
    assert_eq!(cli.macros, vec!["STEAM", "GAME=hl2"]);
    assert!(cli.force);
    assert!(!cli.json);
  }

  #[test]
  fn rejects_unknown_architectures() {
    let result = Cli::try_parse_from(["qpc", "engine.qpc", "-g", "makefile", "-a", "x64"]);
    assert!(result.is_err());
  }

  #[test]
  fn empty_lists_fall_back_to_the_host() {
    let cli = Cli::parse_from(["qpc", "engine.qpc", "-g", "makefile"]);
    let options = cli.run_options().unwrap();
    let defaults = RunOptions::default();
    assert_eq!(options.archs, defaults.archs);
    assert_eq!(options.platforms, defaults.platforms);
    assert!(!options.root_dir.contains('\\'));
  }
}
