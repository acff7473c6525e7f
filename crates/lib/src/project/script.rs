//! Walks a project script over every pass of a container.

use tracing::debug;

use super::container::ProjectContainer;
use super::pass::ProjectPass;
use crate::block::Block;
use crate::consts::REMOVE_MARKER;

impl ProjectContainer {
  /// Apply a parsed project script to every pass.
  ///
  /// Each pass first takes the script's `macro` and `build_event` blocks,
  /// then has its macro table frozen and resolves files, dependencies and
  /// configuration against it.
  pub fn parse_script(&mut self, script: &[Block]) {
    for index in 0..self.passes_mut().len() {
      let first = index == 0;
      let pass = &mut self.passes_mut()[index];
      debug!(
        config = %pass.target.config,
        platform = %pass.target.platform,
        arch = %pass.target.arch,
        "walk script"
      );

      define_macros(pass, script);
      pass.freeze_macros();

      let mut dependencies = Vec::new();
      for block in script {
        if !block.solve_condition(pass.macros()) {
          continue;
        }
        match block.key.as_str() {
          "macro" | "build_event" => {}
          "files" => parse_files(pass, block, &mut Vec::new()),
          "dependencies" => dependencies.extend(parse_dependencies(pass, block)),
          "configuration" => pass.parse_configuration(block),
          _ if first => block.warning("unknown key"),
          _ => {}
        }
      }

      for (remove, path) in dependencies {
        if remove {
          self.remove_dependency(&path);
        } else {
          self.add_dependency(&path);
        }
      }
    }
  }
}

fn define_macros(pass: &mut ProjectPass, script: &[Block]) {
  for block in script {
    if !matches!(block.key.as_str(), "macro" | "build_event") || !block.solve_condition(pass.macros()) {
      continue;
    }

    if block.key == "build_event" {
      pass.define_build_event(block);
      continue;
    }

    let Some(name) = block.values.first() else {
      block.warning("macro without a name");
      continue;
    };
    let value = block.values.get(1).map(String::as_str);
    if let Err(e) = pass.set_macro(name, value) {
      block.error(&e.to_string());
    }
  }
}

fn parse_files(pass: &mut ProjectPass, block: &Block, folders: &mut Vec<String>) {
  for item in &block.items {
    if !item.solve_condition(pass.macros()) {
      continue;
    }
    match item.key.as_str() {
      "folder" => match item.value() {
        Some(name) => {
          folders.push(pass.replace(name));
          parse_files(pass, item, folders);
          folders.pop();
        }
        None => item.warning("folder without a name"),
      },
      REMOVE_MARKER => pass.remove_file(item),
      _ => {
        let added = pass.add_file(folders, item);
        pass.apply_file_options(&added, item);
      }
    }
  }
}

/// Resolved dependency edits of a `dependencies` block, as
/// `(is_removal, script_path)` in script order.
fn parse_dependencies(pass: &ProjectPass, block: &Block) -> Vec<(bool, String)> {
  let mut edits = Vec::new();
  for item in block.items.iter().filter(|item| item.solve_condition(pass.macros())) {
    if item.key == REMOVE_MARKER {
      if item.values.is_empty() {
        item.warning("attempting to remove nothing");
      }
      edits.extend(item.values.iter().map(|key| (true, pass.dependency_path(key))));
    } else {
      edits.extend(item.get_list().iter().map(|key| (false, pass.dependency_path(key))));
    }
  }
  edits
}
