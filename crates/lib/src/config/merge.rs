use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::option::{ConfigOption, Value};
use super::source::ConfigSource;

/// Values keyed by option destination.
pub type Defaults = BTreeMap<String, Value>;

/// Values given explicitly on the command line, keyed by destination.
///
/// Only options the user actually passed belong here; absent flags must not be
/// inserted as `false` or they would shadow every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  values: BTreeMap<String, Value>,
}

impl Overrides {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, dest: &str, value: Value) -> &mut Self {
    self.values.insert(dest.to_string(), value);
    self
  }
}

/// Merges option values from an ordered list of sources.
pub struct ConfigMerger {
  options: Vec<ConfigOption>,
  defaults: Defaults,
  /// Highest priority first.
  sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigMerger {
  pub fn new(options: Vec<ConfigOption>, defaults: Defaults) -> Self {
    Self {
      options,
      defaults,
      sources: Vec::new(),
    }
  }

  /// Add a source with lower priority than every source added before it.
  pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
    self.sources.push(Box::new(source));
    self
  }

  pub fn source_names(&self) -> Vec<&str> {
    self.sources.iter().map(|source| source.name()).collect()
  }

  /// Apply every source on top of `defaults`.
  ///
  /// Scalars take the value of the highest priority source that sets them.
  /// List items accumulate, higher priority sources first, followed by the
  /// items already in `defaults`. Empty and unparsable values fall through.
  pub fn update_defaults(&self, mut defaults: Defaults) -> Defaults {
    let mut lists: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for source in self.sources.iter().rev() {
      for option in &self.options {
        let Some(raw) = source.lookup(option.name) else {
          continue;
        };
        if raw.trim().is_empty() {
          continue;
        }

        match option.parse(&raw) {
          Ok(Value::List(items)) => {
            let acc = lists.entry(option.dest).or_default();
            let older = std::mem::replace(acc, items);
            acc.extend(older);
          }
          Ok(value) => {
            debug!(source = source.name(), option = option.name, dest = option.dest, ?value, "option set");
            defaults.insert(option.dest.to_string(), value);
          }
          Err(reason) => {
            warn!(source = source.name(), option = option.name, "ignoring value: {reason}");
          }
        }
      }
    }

    for (dest, mut items) in lists {
      if let Some(Value::List(base)) = defaults.remove(dest) {
        items.extend(base);
      }
      debug!(dest, ?items, "list option accumulated");
      defaults.insert(dest.to_string(), Value::List(items));
    }

    defaults
  }

  /// Produce the final snapshot: explicit overrides on top of every source
  /// and the declared defaults.
  pub fn merge(&self, overrides: &Overrides) -> ConfigSnapshot {
    let mut values = self.update_defaults(self.defaults.clone());

    for (dest, value) in &overrides.values {
      let merged = match (value, values.remove(dest)) {
        (Value::List(explicit), Some(Value::List(rest))) => {
          Value::List(explicit.iter().cloned().chain(rest).collect())
        }
        (value, _) => value.clone(),
      };
      values.insert(dest.clone(), merged);
    }

    ConfigSnapshot { values }
  }
}

/// Immutable result of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
  values: BTreeMap<String, Value>,
}

impl ConfigSnapshot {
  fn get(&self, dest: &str) -> Option<&Value> {
    self.values.get(dest)
  }

  pub fn text(&self, dest: &str) -> Option<&str> {
    match self.get(dest) {
      Some(Value::Text(text)) => Some(text),
      _ => None,
    }
  }

  pub fn flag(&self, dest: &str) -> bool {
    matches!(self.get(dest), Some(Value::Bool(true)))
  }

  pub fn count(&self, dest: &str) -> u32 {
    match self.get(dest) {
      Some(Value::Count(n)) => *n,
      _ => 0,
    }
  }

  pub fn list(&self, dest: &str) -> &[String] {
    match self.get(dest) {
      Some(Value::List(items)) => items,
      _ => &[],
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.values.iter().map(|(dest, value)| (dest.as_str(), value))
  }
}
