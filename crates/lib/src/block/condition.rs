//! Evaluation of block conditions.
//!
//! Conditions are small boolean expressions over macro references:
//!
//! ```text
//! [$WINDOWS && !$ARM64]
//! [($QPC_CONFIG == Debug || $PROFILE) && $VERSION >= 3]
//! ```
//!
//! Precedence from loosest to tightest: `||`, `&&`, comparisons
//! (`==`, `!=`, `<`, `<=`, `>`, `>=`), `!`. Comparisons are numeric when both
//! sides parse as integers and textual otherwise.

use thiserror::Error;

use crate::macros::MacroLookup;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
  #[error("unexpected end of condition")]
  UnexpectedEnd,

  #[error("unexpected token '{0}'")]
  UnexpectedToken(String),

  #[error("unterminated string")]
  UnterminatedString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Value(String),
  Macro(String),
  Not,
  And,
  Or,
  Compare(CompareOp),
  Open,
  Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

impl Token {
  fn text(&self) -> String {
    match self {
      Token::Value(value) => value.clone(),
      Token::Macro(name) => name.clone(),
      Token::Not => "!".into(),
      Token::And => "&&".into(),
      Token::Or => "||".into(),
      Token::Compare(op) => match op {
        CompareOp::Eq => "==",
        CompareOp::Ne => "!=",
        CompareOp::Lt => "<",
        CompareOp::Le => "<=",
        CompareOp::Gt => ">",
        CompareOp::Ge => ">=",
      }
      .into(),
      Token::Open => "(".into(),
      Token::Close => ")".into(),
    }
  }
}

/// Evaluate `condition` against a macro table. An empty condition is true.
pub fn solve(condition: &str, macros: &impl MacroLookup) -> Result<bool, ConditionError> {
  let tokens = tokenize(condition)?;
  if tokens.is_empty() {
    return Ok(true);
  }

  let mut solver = Solver {
    tokens,
    pos: 0,
    macros,
  };
  let result = solver.or()?;
  match solver.tokens.get(solver.pos) {
    None => Ok(truthy(&result)),
    Some(token) => Err(ConditionError::UnexpectedToken(token.text())),
  }
}

/// A value is true when it is non-empty and not `"0"`.
pub fn truthy(value: &str) -> bool {
  !value.is_empty() && value != "0"
}

fn tokenize(condition: &str) -> Result<Vec<Token>, ConditionError> {
  let mut tokens = Vec::new();
  let mut chars = condition.chars().peekable();

  while let Some(ch) = chars.next() {
    let token = match ch {
      c if c.is_whitespace() => continue,
      '(' => Token::Open,
      ')' => Token::Close,
      '&' if chars.next_if_eq(&'&').is_some() => Token::And,
      '|' if chars.next_if_eq(&'|').is_some() => Token::Or,
      '=' if chars.next_if_eq(&'=').is_some() => Token::Compare(CompareOp::Eq),
      '!' if chars.next_if_eq(&'=').is_some() => Token::Compare(CompareOp::Ne),
      '!' => Token::Not,
      '<' if chars.next_if_eq(&'=').is_some() => Token::Compare(CompareOp::Le),
      '<' => Token::Compare(CompareOp::Lt),
      '>' if chars.next_if_eq(&'=').is_some() => Token::Compare(CompareOp::Ge),
      '>' => Token::Compare(CompareOp::Gt),
      '"' => {
        let mut value = String::new();
        loop {
          match chars.next() {
            Some('"') => break,
            Some(c) => value.push(c),
            None => return Err(ConditionError::UnterminatedString),
          }
        }
        Token::Value(value)
      }
      c if is_word_char(c) || c == '$' => {
        let mut word = String::from(c);
        while let Some(next) = chars.next_if(|&next| is_word_char(next)) {
          word.push(next);
        }
        if c == '$' {
          Token::Macro(word)
        } else {
          Token::Value(word)
        }
      }
      other => return Err(ConditionError::UnexpectedToken(other.to_string())),
    };
    tokens.push(token);
  }

  Ok(tokens)
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

struct Solver<'a, M: MacroLookup> {
  tokens: Vec<Token>,
  pos: usize,
  macros: &'a M,
}

impl<M: MacroLookup> Solver<'_, M> {
  fn next(&mut self) -> Option<Token> {
    let token = self.tokens.get(self.pos).cloned();
    if token.is_some() {
      self.pos += 1;
    }
    token
  }

  fn eat(&mut self, expected: &Token) -> bool {
    if self.tokens.get(self.pos) == Some(expected) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  fn or(&mut self) -> Result<String, ConditionError> {
    let mut left = self.and()?;
    while self.eat(&Token::Or) {
      let right = self.and()?;
      left = flag(truthy(&left) || truthy(&right));
    }
    Ok(left)
  }

  fn and(&mut self) -> Result<String, ConditionError> {
    let mut left = self.compare()?;
    while self.eat(&Token::And) {
      let right = self.compare()?;
      left = flag(truthy(&left) && truthy(&right));
    }
    Ok(left)
  }

  fn compare(&mut self) -> Result<String, ConditionError> {
    let left = self.unary()?;
    let Some(Token::Compare(op)) = self.tokens.get(self.pos).cloned() else {
      return Ok(left);
    };
    self.pos += 1;
    let right = self.unary()?;

    let ordering = match (left.parse::<i64>(), right.parse::<i64>()) {
      (Ok(l), Ok(r)) => l.cmp(&r),
      _ => left.cmp(&right),
    };
    let result = match op {
      CompareOp::Eq => ordering.is_eq(),
      CompareOp::Ne => ordering.is_ne(),
      CompareOp::Lt => ordering.is_lt(),
      CompareOp::Le => ordering.is_le(),
      CompareOp::Gt => ordering.is_gt(),
      CompareOp::Ge => ordering.is_ge(),
    };
    Ok(flag(result))
  }

  fn unary(&mut self) -> Result<String, ConditionError> {
    if self.eat(&Token::Not) {
      let value = self.unary()?;
      return Ok(flag(!truthy(&value)));
    }
    self.primary()
  }

  fn primary(&mut self) -> Result<String, ConditionError> {
    match self.next() {
      Some(Token::Open) => {
        let value = self.or()?;
        if !self.eat(&Token::Close) {
          return match self.next() {
            Some(token) => Err(ConditionError::UnexpectedToken(token.text())),
            None => Err(ConditionError::UnexpectedEnd),
          };
        }
        Ok(value)
      }
      Some(Token::Macro(name)) => Ok(self.macros.get(&name).unwrap_or_default().to_string()),
      Some(Token::Value(value)) => Ok(value),
      Some(token) => Err(ConditionError::UnexpectedToken(token.text())),
      None => Err(ConditionError::UnexpectedEnd),
    }
  }
}

fn flag(value: bool) -> String {
  if value { "1" } else { "0" }.to_string()
}
