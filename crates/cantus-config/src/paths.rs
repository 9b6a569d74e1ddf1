use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza una instalación "portable".
pub const BASE_DIR_ENV: &str = "CANTUS_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de la instalación.
///
/// Se construye una vez al arrancar y se pasa explícitamente a quien lo
/// necesite; no hay singleton global.
#[derive(Debug, Clone)]
pub struct CantusPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: PathBuf,
}

impl CantusPaths {
  /// `$CANTUS_BASE_DIR/{config,data,cache}` si está definida; si no, los
  /// directorios de usuario de la plataforma.
  pub fn detect() -> Result<Self, ConfigError> {
    match std::env::var(BASE_DIR_ENV) {
      Ok(base) => Self::under(base),
      Err(_) => {
        let proj_dirs = ProjectDirs::from("org", "cantus", "cantus").ok_or(ConfigError::Directories)?;
        Self::create(Self {
          base_dir: proj_dirs.config_dir().to_path_buf(),
          config_dir: proj_dirs.config_dir().to_path_buf(),
          data_dir: proj_dirs.data_dir().to_path_buf(),
          cache_dir: proj_dirs.cache_dir().to_path_buf(),
        })
      }
    }
  }

  /// Layout portable bajo una única raíz.
  pub fn under(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base: PathBuf = base.into();
    Self::create(Self {
      config_dir: base.join("config"),
      data_dir: base.join("data"),
      cache_dir: base.join("cache"),
      base_dir: base,
    })
  }

  fn create(paths: Self) -> Result<Self, ConfigError> {
    for dir in [&paths.config_dir, &paths.data_dir, &paths.cache_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(paths)
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("cantus.toml")
  }

  pub fn data_path(&self, name: impl AsRef<Path>) -> PathBuf {
    self.data_dir.join(name)
  }
}
