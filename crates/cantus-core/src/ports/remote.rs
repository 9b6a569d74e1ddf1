use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::RemoteEntry;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
  #[error("list failed: {0}")]
  List(String),

  #[error("fetch of {path} failed: {reason}")]
  Fetch { path: String, reason: String },

  #[error("delete of {path} failed: {reason}")]
  Delete { path: String, reason: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Port del almacenamiento remoto donde se suben los archivos nuevos.
///
/// La raíz remota es configuración del adapter; las rutas de las entradas son
/// relativas a ella.
#[async_trait]
pub trait RemoteStore: Send + Sync {
  /// Lista las entradas (solo archivos) bajo la raíz remota.
  async fn list(&self) -> Result<Vec<RemoteEntry>, RemoteError>;

  /// Copia la entrada dentro de `dest_dir` y devuelve la ruta local resultante.
  async fn fetch(&self, entry: &RemoteEntry, dest_dir: &Path) -> Result<PathBuf, RemoteError>;

  /// Borra la entrada remota. Solo se llama tras absorber el archivo entero.
  async fn delete(&self, entry: &RemoteEntry) -> Result<(), RemoteError>;
}
