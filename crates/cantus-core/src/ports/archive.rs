use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
  /// El contenedor no se puede leer. El archivo se deja intacto en remoto.
  #[error("bad archive: {0}")]
  BadArchive(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Port que desempaqueta un archivo descargado en el árbol de staging.
#[async_trait]
pub trait ArchiveExpander: Send + Sync {
  /// Devuelve las rutas relativas a `staging_dir` de los archivos extraídos,
  /// en el orden en que aparecen dentro del contenedor.
  async fn expand(&self, archive: &Path, staging_dir: &Path) -> Result<Vec<PathBuf>, ExpandError>;
}
