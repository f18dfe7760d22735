use crate::types::*;
use std::{
    env,
    fs,
    path::{Path, PathBuf},
};

pub fn repo_root() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn resolve_repo_path(raw: &str) -> PathBuf {
  resolve_path_from(&repo_root(), raw)
}

fn resolve_path_from(root: &Path, raw: &str) -> PathBuf {
  let path = PathBuf::from(raw);
  if path.is_absolute() {
    path
  } else {
    root.join(path)
  }
}

pub fn config_path() -> PathBuf {
  repo_root().join("config.json")
}

pub fn logs_dir() -> PathBuf {
  repo_root().join("logs")
}

pub fn env_default(key: &str) -> Option<String> {
  env::var(key)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

pub fn apply_env_defaults(mut config: AppConfig) -> AppConfig {
  if let Some(value) = env_default("DRAW_SERVER_ADDR") {
    config.server_addr = value;
  }
  if let Some(value) = env_default("DRAW_STATIC_DIR") {
    config.static_dir = value;
  }
  if let Some(value) = env_default("DRAW_EXPORTS_DIR") {
    config.exports_dir = value;
  }
  if let Some(value) = env_default("DRAW_PAGE_GROUP_SIZE") {
    match value.parse::<usize>() {
      Ok(size) => config.page_group_size = size,
      Err(e) => tracing::warn!("ignoring DRAW_PAGE_GROUP_SIZE={value}: {e}"),
    }
  }
  normalize_config(config)
}

fn normalize_config(mut config: AppConfig) -> AppConfig {
  if config.page_group_size == 0 {
    config.page_group_size = DEFAULT_PAGE_GROUP_SIZE;
  }
  if config.default_title.trim().is_empty() {
    config.default_title = DEFAULT_TITLE.to_string();
  }
  if config.server_addr.trim().is_empty() {
    config.server_addr = DEFAULT_SERVER_ADDR.to_string();
  }
  config
}

pub fn parse_config(data: &str) -> Result<AppConfig, String> {
  serde_json::from_str::<AppConfig>(data).map_err(|e| e.to_string())
}

pub fn load_config_inner() -> Result<AppConfig, String> {
  let path = config_path();
  if !path.is_file() {
    return Ok(apply_env_defaults(AppConfig::default()));
  }
  let data = fs::read_to_string(&path).map_err(|e| format!("read config {}: {e}", path.display()))?;
  let config = parse_config(&data).map_err(|e| format!("parse config {}: {e}", path.display()))?;
  Ok(apply_env_defaults(config))
}

pub fn static_dir(config: &AppConfig) -> PathBuf {
  resolve_repo_path(&config.static_dir)
}

pub fn exports_dir(config: &AppConfig) -> PathBuf {
  resolve_repo_path(&config.exports_dir)
}

pub fn load_env_file() {
  let env_path = repo_root().join(".env");
  if !env_path.is_file() {
    return;
  }
  let contents = match fs::read_to_string(&env_path) {
    Ok(data) => data,
    Err(_) => return,
  };
  for line in contents.lines() {
    if let Some((key, value)) = parse_env_line(line) {
      if env::var_os(&key).is_none() {
        env::set_var(key, value);
      }
    }
  }
}

pub fn parse_env_line(line: &str) -> Option<(String, String)> {
  let trimmed = line.trim();
  if trimmed.is_empty() || trimmed.starts_with('#') {
    return None;
  }
  let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
  let (key, raw_value) = trimmed.split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }
  let mut value = raw_value.trim();
  if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
    value = &value[1..value.len() - 1];
  } else if let Some(idx) = value.find('#') {
    value = value[..idx].trim_end();
  }
  Some((key.to_string(), value.to_string()))
}

pub fn log_config_warnings(config: &AppConfig) {
  let static_dir = static_dir(config);
  if !static_dir.is_dir() {
    tracing::warn!(
      "static dir {} does not exist; only the JSON routes will respond",
      static_dir.display()
    );
  }
  let exports_dir = exports_dir(config);
  if !exports_dir.is_dir() {
    tracing::warn!("exports dir {} does not exist yet; it is created on first export", exports_dir.display());
  }
}
