//! Application configuration: an optional TOML file layered under
//! `WORKLOAD_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use workload_core::config::AssessmentConfig;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
  pub host:       String,
  pub port:       u16,
  pub assessment: AssessmentConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("~/.local/share/workload/workload.db"),
      host:       "127.0.0.1".to_string(),
      port:       7870,
      assessment: AssessmentConfig::default(),
    }
  }
}

impl AppConfig {
  /// Read `path` (if it exists) and then the environment, e.g.
  /// `WORKLOAD_PORT=9000` or `WORKLOAD_ASSESSMENT__BANDS__MEDIUM=4`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("WORKLOAD")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .with_context(|| format!("failed to read config from {}", path.display()))?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.assessment.validate().context("invalid [assessment] section")?;
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;
  use workload_core::weight::ScoreBands;

  fn write_temp(contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("workload-config-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("workload-does-not-exist.toml");
    let cfg = AppConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 7870);
    assert_eq!(cfg.assessment, AssessmentConfig::default());
  }

  #[test]
  fn file_overrides_defaults() {
    let path = write_temp(
      r#"
store_path = "/tmp/w.db"
port = 9001

[assessment.bands]
medium = 3
"#,
    );
    let cfg = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.store_path, PathBuf::from("/tmp/w.db"));
    assert_eq!(cfg.port, 9001);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(
      cfg.assessment.bands,
      ScoreBands { medium: 3, ..ScoreBands::default() }
    );
  }

  #[test]
  fn out_of_order_bands_are_rejected() {
    let path = write_temp("[assessment.bands]\nmedium = 12\n");
    let result = AppConfig::load(&path);
    std::fs::remove_file(&path).ok();
    assert!(result.is_err());
  }

  #[test]
  fn tilde_is_expanded() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data/w.db")),
      PathBuf::from(home).join("data/w.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/w.db")), PathBuf::from("/abs/w.db"));
  }
}
