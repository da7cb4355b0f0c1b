use anyhow::Result;
use serde::Serialize;

use isoenv_lib::config::{ConfigMerger, ConfigSnapshot, Value};
use isoenv_lib::platform::{self, paths};

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Serialize)]
struct InfoJson<'a> {
  platform: Option<String>,
  config_file: Option<String>,
  sources: Vec<&'a str>,
  settings: &'a ConfigSnapshot,
}

pub fn cmd_info(merger: &ConfigMerger, snapshot: &ConfigSnapshot, format: OutputFormat) -> Result<()> {
  let platform = platform::platform_triple();
  let config_file = paths::config_file().map(|path| path.display().to_string());

  if format.is_json() {
    return print_json(&InfoJson {
      platform,
      config_file,
      sources: merger.source_names(),
      settings: snapshot,
    });
  }

  println!("System:");
  match platform {
    Some(triple) => print_stat("Platform", &triple),
    _ => print_stat("Platform", "could not detect platform"),
  }
  print_stat("Config file", config_file.as_deref().unwrap_or("none"));
  print_stat("Sources", &merger.source_names().join(", "));

  println!();
  println!("Settings:");
  for (dest, value) in snapshot.iter() {
    print_stat(dest, &display_value(value));
  }
  Ok(())
}

fn display_value(value: &Value) -> String {
  match value {
    Value::Text(text) => text.clone(),
    Value::Bool(flag) => flag.to_string(),
    Value::Count(count) => count.to_string(),
    Value::List(items) if items.is_empty() => "(none)".to_string(),
    Value::List(items) => items.join(", "),
  }
}
