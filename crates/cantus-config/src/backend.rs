use crate::paths::{CantusPaths, ConfigError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

// toml_edit para escribir sin perder los comentarios del usuario
use toml_edit::{DocumentMut, Item};

/// Acceso por secciones (`[intake]`, `[remote]`, ...) al archivo de config.
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  /// Como `load_section`, pero sin archivo o sin sección devuelve `T::default()`.
  fn load_section_or_default<T: DeserializeOwned + Default>(&self, section: &str) -> Result<T, ConfigError>;
}

pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(paths: &CantusPaths) -> Self {
    Self { path: paths.config_file() }
  }

  /// Backend sobre un archivo concreto (tests, rutas a medida).
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &std::path::Path {
    &self.path
  }

  fn read_value(&self) -> Result<Option<toml::Value>, ConfigError> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(Some(toml::from_str(&content)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

fn decode<T: DeserializeOwned>(section: &str, table: toml::Value) -> Result<T, ConfigError> {
  table.try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let value = self
      .read_value()?
      .ok_or_else(|| ConfigError::Other(format!("config file {:?} not found", self.path)))?;

    let table = value
      .get(section)
      .cloned()
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", self.path)))?;

    decode(section, table)
  }

  fn load_section_or_default<T: DeserializeOwned + Default>(&self, section: &str) -> Result<T, ConfigError> {
    match self.read_value()?.and_then(|v| v.get(section).cloned()) {
      Some(table) => decode(section, table),
      None => {
        tracing::debug!(section, path = %self.path.display(), "section not configured, using defaults");
        Ok(T::default())
      }
    }
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    // 1) Documento actual (o vacío si aún no existe).
    let mut doc: DocumentMut = match fs::read_to_string(&self.path) {
      Ok(content) => content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) La sección se serializa con serde y se re-parsea como tabla.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    // 3) Solo se sustituye esa sección; el resto del documento queda igual.
    doc[section] = section_item;

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    cantus_fs::atomic_write_str(&self.path, &doc.to_string())?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;

  #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
  struct Section {
    dir: String,
    enabled: bool,
  }

  #[test]
  fn missing_file_yields_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = TomlConfigBackend::at(tmp.path().join("cantus.toml"));

    let section: Section = backend.load_section_or_default("intake").unwrap();
    assert_eq!(section, Section::default());
    assert!(backend.load_section::<Section>("intake").is_err());
  }

  #[test]
  fn saving_a_section_keeps_other_sections_and_comments() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cantus.toml");
    fs::write(&path, "# hand written\n[remote]\nremote_dir = \"gdrive:music\" # upload folder\n").unwrap();

    let backend = TomlConfigBackend::at(&path);
    let section = Section { dir: "/srv/library".into(), enabled: true };
    backend.save_section("intake", &section).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# hand written"));
    assert!(content.contains("# upload folder"));

    let loaded: Section = backend.load_section("intake").unwrap();
    assert_eq!(loaded, section);
  }
}
