use serde::Serialize;

/// How a raw string from the environment or a config file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
  /// Free-form string
  Text,
  /// Boolean flag whose presence sets the destination to `true`
  Flag,
  /// Boolean flag whose presence sets the destination to `false`
  InvertedFlag,
  /// Repeatable flag counting its occurrences
  Count,
  /// Whitespace separated values that accumulate across sources
  List,
}

/// A merged option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
  Text(String),
  Bool(bool),
  Count(u32),
  List(Vec<String>),
}

/// Declaration of one configurable option.
///
/// `name` is the surface name (the long flag without dashes), `dest` the key
/// the value is stored under. Several options may share a `dest`, such as
/// `system-site-packages` and its inverse `no-site-packages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigOption {
  pub name: &'static str,
  pub dest: &'static str,
  pub kind: OptionKind,
}

impl ConfigOption {
  pub const fn new(name: &'static str, dest: &'static str, kind: OptionKind) -> Self {
    Self { name, dest, kind }
  }

  /// Convert a raw string into the value stored under `dest`.
  ///
  /// An inverted flag given a truthy string stores `false`.
  pub fn parse(&self, raw: &str) -> Result<Value, String> {
    let raw = raw.trim();
    match self.kind {
      OptionKind::Text => Ok(Value::Text(raw.to_string())),
      OptionKind::Flag => parse_bool(raw).map(Value::Bool).ok_or_else(|| not_a_bool(raw)),
      OptionKind::InvertedFlag => parse_bool(raw)
        .map(|enabled| Value::Bool(!enabled))
        .ok_or_else(|| not_a_bool(raw)),
      OptionKind::Count => raw
        .parse::<u32>()
        .ok()
        .or_else(|| parse_bool(raw).map(u32::from))
        .map(Value::Count)
        .ok_or_else(|| format!("{raw:?} is neither a number nor a boolean")),
      OptionKind::List => Ok(Value::List(raw.split_whitespace().map(String::from).collect())),
    }
  }
}

/// Upper-case a surface name for use in an environment variable.
pub(crate) fn env_key(name: &str) -> String {
  name.replace('-', "_").to_uppercase()
}

/// Parse a boolean string.
///
/// True: `1 y yes t true on`. False: `0 n no f false off`. Case-insensitive.
/// Anything else is `None`.
pub fn parse_bool(raw: &str) -> Option<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "1" | "y" | "yes" | "t" | "true" | "on" => Some(true),
    "0" | "n" | "no" | "f" | "false" | "off" => Some(false),
    _ => None,
  }
}

fn not_a_bool(raw: &str) -> String {
  format!("{raw:?} is not a boolean")
}
