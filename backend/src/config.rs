use cantus_config::{CantusPaths, ConfigBackend, ConfigError};
use cantus_core::domain::IntakePaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[intake]` section: local directories used by a run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IntakeConfig {
  pub receive_dir: PathBuf,
  pub staging_dir: PathBuf,
  pub dest_dir: PathBuf,
}

// What the file actually holds; missing keys default under the data dir.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoredIntake {
  receive_dir: Option<PathBuf>,
  staging_dir: Option<PathBuf>,
  dest_dir: Option<PathBuf>,
}

impl IntakeConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B, paths: &CantusPaths) -> Result<Self, ConfigError> {
    let stored: StoredIntake = backend.load_section_or_default("intake")?;

    let cfg = IntakeConfig {
      receive_dir: stored.receive_dir.unwrap_or_else(|| paths.data_path("received")),
      staging_dir: stored.staging_dir.unwrap_or_else(|| paths.data_path("staging")),
      dest_dir: stored.dest_dir.unwrap_or_else(|| paths.data_path("library")),
    };

    backend.save_section("intake", &cfg)?;
    Ok(cfg)
  }
}

impl From<IntakeConfig> for IntakePaths {
  fn from(cfg: IntakeConfig) -> Self {
    IntakePaths { receive_dir: cfg.receive_dir, staging_dir: cfg.staging_dir, dest_dir: cfg.dest_dir }
  }
}

/// `[log]` section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogConfig {
  pub file: PathBuf,
  /// Size above which the file is rotated at startup.
  pub max_bytes: u64,
  /// How many `cantus.log.N` files are kept.
  pub backups: u32,
  /// `EnvFilter` directives; `RUST_LOG` takes precedence.
  pub filter: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoredLog {
  file: Option<PathBuf>,
  max_bytes: Option<u64>,
  backups: Option<u32>,
  filter: Option<String>,
}

impl LogConfig {
  pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
  pub const DEFAULT_BACKUPS: u32 = 3;

  pub fn load_from<B: ConfigBackend>(backend: &B, paths: &CantusPaths) -> Result<Self, ConfigError> {
    let stored: StoredLog = backend.load_section_or_default("log")?;

    let cfg = LogConfig {
      file: stored.file.unwrap_or_else(|| paths.data_path("cantus.log")),
      max_bytes: stored.max_bytes.unwrap_or(Self::DEFAULT_MAX_BYTES),
      backups: stored.backups.unwrap_or(Self::DEFAULT_BACKUPS),
      filter: stored.filter.unwrap_or_else(|| "info".into()),
    };

    backend.save_section("log", &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cantus_config::TomlConfigBackend;

  #[test]
  fn fresh_install_gets_directories_under_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = CantusPaths::under(tmp.path()).unwrap();
    let backend = TomlConfigBackend::new(&paths);

    let intake = IntakeConfig::load_from(&backend, &paths).unwrap();
    assert_eq!(intake.dest_dir, paths.data_dir.join("library"));

    let written = std::fs::read_to_string(paths.config_file()).unwrap();
    assert!(written.contains("[intake]"));
    assert!(written.contains("staging_dir"));
  }

  #[test]
  fn configured_values_win_over_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = CantusPaths::under(tmp.path()).unwrap();
    std::fs::create_dir_all(&paths.config_dir).unwrap();
    std::fs::write(paths.config_file(), "# mi biblioteca\n[remote]\nbackend = \"local\"\n\n[intake]\ndest_dir = \"/music\"\n\n[log]\nbackups = 1\n").unwrap();
    let backend = TomlConfigBackend::new(&paths);

    let intake = IntakeConfig::load_from(&backend, &paths).unwrap();
    let log = LogConfig::load_from(&backend, &paths).unwrap();

    assert_eq!(intake.dest_dir, PathBuf::from("/music"));
    assert_eq!(intake.receive_dir, paths.data_dir.join("received"));
    assert_eq!(log.backups, 1);
    assert_eq!(log.max_bytes, LogConfig::DEFAULT_MAX_BYTES);

    let written = std::fs::read_to_string(paths.config_file()).unwrap();
    assert!(written.contains("# mi biblioteca"));
  }
}
