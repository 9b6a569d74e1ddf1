use cantus_config::{ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
  #[default]
  Rclone,
  Local,
}

/// `[remote]` section of cantus.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
  /// `remote:path` for rclone, or a local directory with `backend = "local"`.
  pub remote_dir: String,
  pub backend: RemoteKind,
  pub rclone_bin: PathBuf,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    RemoteConfig { remote_dir: "cantus:uploads".into(), backend: RemoteKind::Rclone, rclone_bin: PathBuf::from("rclone") }
  }
}

impl RemoteConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_or_default("remote")?;
    backend.save_section("remote", &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cantus_config::TomlConfigBackend;

  #[test]
  fn partial_section_keeps_defaults_and_is_written_back() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cantus.toml");
    std::fs::write(&path, "[remote]\nbackend = \"local\"\nremote_dir = \"/srv/uploads\"\n").unwrap();

    let backend = TomlConfigBackend::at(&path);
    let cfg = RemoteConfig::load_from(&backend).unwrap();

    assert_eq!(cfg.backend, RemoteKind::Local);
    assert_eq!(cfg.remote_dir, "/srv/uploads");
    assert_eq!(cfg.rclone_bin, PathBuf::from("rclone"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("rclone_bin"));
  }
}
