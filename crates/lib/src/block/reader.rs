//! Tokenizer and parser for the block syntax.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::Block;

/// Syntax and I/O errors raised while reading a block file.
#[derive(Debug, Error)]
pub enum BlockError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("{path}:{line}: unterminated string")]
  UnterminatedString { path: String, line: usize },

  #[error("{path}:{line}: unterminated condition")]
  UnterminatedCondition { path: String, line: usize },

  #[error("{path}:{line}: unexpected '}}'")]
  UnexpectedClose { path: String, line: usize },

  #[error("{path}:{line}: unclosed '{{'")]
  UnclosedBrace { path: String, line: usize },

  #[error("{path}:{line}: expected a key before {found}")]
  MissingKey { path: String, line: usize, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Word(String),
  Open,
  Close,
  Condition(String),
  Newline,
}

impl Token {
  fn describe(&self) -> String {
    match self {
      Token::Word(word) => format!("\"{word}\""),
      Token::Open => "'{'".to_string(),
      Token::Close => "'}'".to_string(),
      Token::Condition(condition) => format!("[{condition}]"),
      Token::Newline => "end of line".to_string(),
    }
  }
}

/// Read and parse a block file.
pub fn read_file(path: &Path) -> Result<Vec<Block>, BlockError> {
  let display = path.display().to_string();
  let text = fs::read_to_string(path).map_err(|source| BlockError::Read {
    path: display.clone(),
    source,
  })?;
  read_str(&text, &display)
}

/// Parse block syntax from a string. `source` names the text in diagnostics.
pub fn read_str(text: &str, source: &str) -> Result<Vec<Block>, BlockError> {
  let tokens = tokenize(text, source)?;
  let mut parser = Parser {
    tokens,
    pos: 0,
    source: Arc::from(source),
  };
  parser.blocks(0)
}

fn tokenize(text: &str, source: &str) -> Result<Vec<(Token, usize)>, BlockError> {
  let mut tokens = Vec::new();
  let mut chars = text.chars().peekable();
  let mut line = 1;

  while let Some(ch) = chars.next() {
    match ch {
      '\n' => {
        tokens.push((Token::Newline, line));
        line += 1;
      }
      c if c.is_whitespace() => {}
      '{' => tokens.push((Token::Open, line)),
      '}' => tokens.push((Token::Close, line)),
      '/' if chars.peek() == Some(&'/') => {
        while chars.peek().is_some_and(|&c| c != '\n') {
          chars.next();
        }
      }
      '/' if chars.peek() == Some(&'*') => {
        chars.next();
        let mut previous = '\0';
        for c in chars.by_ref() {
          if c == '\n' {
            line += 1;
          }
          if previous == '*' && c == '/' {
            break;
          }
          previous = c;
        }
      }
      '"' => {
        let start = line;
        let mut word = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
          match c {
            '"' => {
              closed = true;
              break;
            }
            '\\' => match chars.peek() {
              Some(&next) if next == '"' || next == '\\' => {
                word.push(next);
                chars.next();
              }
              _ => word.push('\\'),
            },
            '\n' => {
              line += 1;
              word.push('\n');
            }
            c => word.push(c),
          }
        }
        if !closed {
          return Err(BlockError::UnterminatedString {
            path: source.to_string(),
            line: start,
          });
        }
        tokens.push((Token::Word(word), start));
      }
      '[' => {
        let mut condition = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
          if c == ']' {
            closed = true;
            break;
          }
          condition.push(c);
        }
        if !closed {
          return Err(BlockError::UnterminatedCondition {
            path: source.to_string(),
            line,
          });
        }
        tokens.push((Token::Condition(condition.trim().to_string()), line));
      }
      c => {
        let mut word = String::from(c);
        while let Some(&next) = chars.peek() {
          if next.is_whitespace() || matches!(next, '{' | '}' | '"' | '[') {
            break;
          }
          word.push(next);
          chars.next();
        }
        tokens.push((Token::Word(word), line));
      }
    }
  }

  Ok(tokens)
}

struct Parser {
  tokens: Vec<(Token, usize)>,
  pos: usize,
  source: Arc<str>,
}

impl Parser {
  fn peek(&self) -> Option<&(Token, usize)> {
    self.tokens.get(self.pos)
  }

  fn skip_newlines(&mut self) {
    while matches!(self.peek(), Some((Token::Newline, _))) {
      self.pos += 1;
    }
  }

  fn last_line(&self) -> usize {
    self.tokens.last().map(|(_, line)| *line).unwrap_or(1)
  }

  fn blocks(&mut self, depth: usize) -> Result<Vec<Block>, BlockError> {
    let mut blocks = Vec::new();

    loop {
      self.skip_newlines();
      let Some((token, line)) = self.peek().cloned() else {
        if depth > 0 {
          return Err(BlockError::UnclosedBrace {
            path: self.source.to_string(),
            line: self.last_line(),
          });
        }
        return Ok(blocks);
      };

      match token {
        Token::Close => {
          if depth == 0 {
            return Err(BlockError::UnexpectedClose {
              path: self.source.to_string(),
              line,
            });
          }
          self.pos += 1;
          return Ok(blocks);
        }
        Token::Word(key) => {
          self.pos += 1;
          blocks.push(self.block(key, line, depth)?);
        }
        other => {
          return Err(BlockError::MissingKey {
            path: self.source.to_string(),
            line,
            found: other.describe(),
          });
        }
      }
    }
  }

  fn block(&mut self, key: String, line: usize, depth: usize) -> Result<Block, BlockError> {
    let mut block = Block {
      key,
      source: Arc::clone(&self.source),
      line,
      ..Block::default()
    };

    while let Some((token, _)) = self.peek() {
      match token {
        Token::Word(value) => block.values.push(value.clone()),
        Token::Condition(condition) => block.condition = Some(condition.clone()),
        _ => break,
      }
      self.pos += 1;
    }

    self.skip_newlines();
    if matches!(self.peek(), Some((Token::Open, _))) {
      self.pos += 1;
      block.items = self.blocks(depth + 1)?;
    }

    Ok(block)
  }
}
