//! Patching scripts so they activate their environment when run.
//!
//! A script is classified line by line. The activation statement goes after
//! the leading block of `from __future__ import` lines, which the interpreter
//! requires to come before any other statement, or after the interpreter
//! directive when there are none. Only a module docstring may precede the
//! future imports, and a future import may continue over several lines.

use crate::consts::ACTIVATE_THIS;

/// Classification of one script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  /// `#!` on the first line, or an encoding declaration on the first two lines
  Directive,
  /// A `from __future__ import ...` statement, including its continuation lines
  Reserved,
  /// Module docstring preceding every other statement
  Docstring,
  /// Blank line or comment
  Trivia,
  /// Anything else
  Statement,
}

/// Classify every line of a script.
pub fn classify(lines: &[String]) -> Vec<LineKind> {
  let mut kinds = Vec::with_capacity(lines.len());
  let mut open_docstring: Option<&'static str> = None;
  let mut open_parens = 0i32;
  let mut continued = false;
  let mut seen_code = false;

  for (idx, line) in lines.iter().enumerate() {
    if let Some(quote) = open_docstring {
      kinds.push(LineKind::Docstring);
      if line.contains(quote) {
        open_docstring = None;
      }
      continue;
    }

    if continued || open_parens > 0 {
      kinds.push(LineKind::Reserved);
      open_parens += paren_delta(line);
      continued = ends_with_backslash(line);
      continue;
    }

    let mut kind = classify_line(idx, line);
    match kind {
      LineKind::Reserved => {
        seen_code = true;
        open_parens = paren_delta(line);
        continued = ends_with_backslash(line);
      }
      LineKind::Statement if !seen_code => {
        seen_code = true;
        if let Some((quote, closed)) = docstring_opening(line.trim()) {
          kind = LineKind::Docstring;
          if !closed {
            open_docstring = Some(quote);
          }
        }
      }
      _ => {}
    }
    kinds.push(kind);
  }

  kinds
}

fn classify_line(idx: usize, line: &str) -> LineKind {
  let trimmed = line.trim();

  if idx == 0 && line.starts_with("#!") {
    return LineKind::Directive;
  }
  if idx < 2 && is_encoding_declaration(trimmed) {
    return LineKind::Directive;
  }
  if trimmed.is_empty() || trimmed.starts_with('#') {
    return LineKind::Trivia;
  }

  let mut words = trimmed.split_whitespace();
  if words.next() == Some("from") && words.next() == Some("__future__") && words.next() == Some("import") {
    return LineKind::Reserved;
  }

  LineKind::Statement
}

fn is_encoding_declaration(line: &str) -> bool {
  line.starts_with('#') && (line.contains("coding:") || line.contains("coding="))
}

/// Quote that closes a string literal opening `line`, and whether it closes on the same line.
fn docstring_opening(line: &str) -> Option<(&'static str, bool)> {
  let body = line.trim_start_matches(['r', 'R', 'u', 'U']);

  for quote in ["\"\"\"", "'''"] {
    if let Some(rest) = body.strip_prefix(quote) {
      return Some((quote, rest.contains(quote)));
    }
  }
  if body.starts_with('"') || body.starts_with('\'') {
    return Some(("", true));
  }
  None
}

/// Opened minus closed parentheses, ignoring a trailing comment.
fn paren_delta(line: &str) -> i32 {
  let code = line.split('#').next().unwrap_or("");
  code.chars().fold(0, |depth, c| match c {
    '(' => depth + 1,
    ')' => depth - 1,
    _ => depth,
  })
}

fn ends_with_backslash(line: &str) -> bool {
  line.trim_end().ends_with('\\')
}

/// Index at which the activation block is inserted.
///
/// After the last reserved line preceding the first statement, else after
/// the last directive, else at the top. A docstring does not end the leading
/// block.
pub fn insertion_point(kinds: &[LineKind]) -> usize {
  let leading = kinds
    .iter()
    .position(|kind| *kind == LineKind::Statement)
    .unwrap_or(kinds.len());
  let leading = &kinds[..leading];

  if let Some(idx) = leading.iter().rposition(|kind| *kind == LineKind::Reserved) {
    return idx + 1;
  }
  if let Some(idx) = leading.iter().rposition(|kind| *kind == LineKind::Directive) {
    return idx + 1;
  }
  0
}

/// Single-line statement that runs the activation helper next to the script.
pub fn activation_line() -> String {
  format!(
    "import os; activate_this=os.path.join(os.path.dirname(os.path.realpath(__file__)), '{ACTIVATE_THIS}'); \
     exec(compile(open(activate_this).read(), activate_this, 'exec'), dict(__file__=activate_this)); \
     del os, activate_this"
  )
}

/// Insert the activation statement, surrounded by blank lines.
///
/// Calling this twice on the same document inserts the statement twice.
pub fn insert_activation(lines: &[String]) -> Vec<String> {
  let at = insertion_point(&classify(lines));

  let mut patched = Vec::with_capacity(lines.len() + 3);
  patched.extend_from_slice(&lines[..at]);
  patched.push(String::new());
  patched.push(activation_line());
  patched.push(String::new());
  patched.extend_from_slice(&lines[at..]);
  patched
}
