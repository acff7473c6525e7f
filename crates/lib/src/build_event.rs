//! Named, parameterised command templates.
//!
//! A script declares an event once and calls it from build steps:
//!
//! ```text
//! build_event copy_file SRC DEST
//! {
//!     "cp $SRC $DEST"
//! }
//!
//! configuration
//! {
//!     post_build { copy_file "$OUT/game.so" "../bin" }
//! }
//! ```
//!
//! Template lines are expanded against the call's bound parameters only, not
//! the pass macros. A line starting with `-` removes earlier commands from the
//! step instead of adding one.

use indexmap::IndexMap;
use tracing::debug;

use crate::block::Block;
use crate::consts::REMOVE_MARKER;
use crate::macros::replace_macros;

/// One declared build event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEvent {
  pub name: String,
  /// Parameter macro names in positional order, with their `$` sigil.
  pub params: Vec<String>,
  /// Template lines as token lists.
  pub lines: Vec<Vec<String>>,
}

impl BuildEvent {
  pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self {
      name: name.into(),
      params: params.into_iter().map(|param| format!("${}", param.as_ref())).collect(),
      lines: Vec::new(),
    }
  }

  pub fn with_line<I, S>(mut self, line: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.lines.push(line.into_iter().map(Into::into).collect());
    self
  }

  /// Build from a `build_event NAME [PARAMS...] { lines }` block.
  pub fn from_block(block: &Block) -> Option<Self> {
    let (name, params) = block.values.split_first()?;
    let mut event = Self::new(name.as_str(), params);
    event.lines = block.items.iter().map(Block::get_list).collect();
    Some(event)
  }

  /// Expand the template with positional `args` and apply it to `step`.
  ///
  /// Extra arguments are dropped and missing ones leave their parameter
  /// unexpanded; both are reported through `site`.
  pub fn call(&self, step: &mut Vec<String>, args: &[String], site: &Block) {
    if args.len() > self.params.len() {
      site.warning(&format!("calling build event \"{}\" with extra arguments", self.name));
    } else if args.len() < self.params.len() {
      site.warning(&format!("calling build event \"{}\" with too few arguments", self.name));
    }

    let bound: IndexMap<String, String> = self.params.iter().cloned().zip(args.iter().cloned()).collect();
    debug!(event = %self.name, args = ?args, "call build event");

    for line in &self.lines {
      let tokens: Vec<String> = line.iter().map(|token| replace_macros(token, &bound)).collect();
      match tokens.split_first() {
        Some((first, rest)) if first == REMOVE_MARKER => self.remove(step, rest, site),
        Some(_) => step.push(tokens.join(" ")),
        None => {}
      }
    }
  }

  fn remove(&self, step: &mut Vec<String>, commands: &[String], site: &Block) {
    if commands.is_empty() {
      site.warning(&format!("attempting to remove nothing in \"{}\"", self.name));
      return;
    }

    for command in commands {
      let before = step.len();
      step.retain(|existing| existing != command);
      if step.len() == before {
        site.warning(&format!("attempting to remove command that doesn't exist: {command}"));
      }
    }
  }
}

/// Build events declared by a script, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEvents {
  events: IndexMap<String, BuildEvent>,
}

impl BuildEvents {
  /// Register an event from its declaration block. Redeclaring a name
  /// replaces the earlier template.
  pub fn define(&mut self, block: &Block) {
    match BuildEvent::from_block(block) {
      Some(event) => self.insert(event),
      None => block.warning("build event without a name"),
    }
  }

  pub fn insert(&mut self, event: BuildEvent) {
    debug!(event = %event.name, params = ?event.params, "define build event");
    self.events.insert(event.name.clone(), event);
  }

  pub fn get(&self, name: &str) -> Option<&BuildEvent> {
    self.events.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.events.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }
}
