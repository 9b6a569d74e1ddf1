use serde::{Deserialize, Serialize};

/// Una entrada listada en el almacenamiento remoto.
///
/// `path` es relativo a la raíz remota configurada en el adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
  pub path: String,
  /// Tamaño en bytes, si el adapter lo conoce.
  pub size: Option<u64>,
}

impl RemoteEntry {
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: path.into(), size: None }
  }

  /// Último componente de la ruta: el nombre con el que aterriza en local.
  pub fn file_name(&self) -> &str {
    self.path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(&self.path)
  }
}
