use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use cantus_core::ports::{ArchiveExpander, ExpandError};

/// Basura que añade el compresor de macOS.
const RESOURCE_FORK_DIR: &str = "__MACOSX";

/// `ArchiveExpander` para contenedores zip.
///
/// La extracción es síncrona (crate `zip`), así que se hace en el pool
/// bloqueante de Tokio.
#[derive(Debug, Clone, Default)]
pub struct ZipExpander;

impl ZipExpander {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl ArchiveExpander for ZipExpander {
  async fn expand(&self, archive: &Path, staging_dir: &Path) -> Result<Vec<PathBuf>, ExpandError> {
    let archive = archive.to_path_buf();
    let staging_dir = staging_dir.to_path_buf();

    tokio::task::spawn_blocking(move || expand_sync(&archive, &staging_dir))
      .await
      .map_err(|e| ExpandError::Io(io::Error::other(format!("expand task join error: {e}"))))?
  }
}

fn expand_sync(archive_path: &Path, staging_dir: &Path) -> Result<Vec<PathBuf>, ExpandError> {
  let file = fs::File::open(archive_path)?;
  let mut archive = ZipArchive::new(file).map_err(bad_archive)?;

  fs::create_dir_all(staging_dir)?;

  let mut extracted = Vec::with_capacity(archive.len());

  for index in 0..archive.len() {
    let mut entry = archive.by_index(index).map_err(bad_archive)?;

    if entry.is_dir() {
      continue;
    }

    // `enclosed_name` descarta rutas absolutas y las que escapan con "..".
    let Some(relative) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
      warn!(entry = entry.name(), archive = %archive_path.display(), "skipping entry outside archive root");
      continue;
    };

    if relative.components().next().is_some_and(|c| c.as_os_str() == RESOURCE_FORK_DIR) {
      continue;
    }

    let target = staging_dir.join(&relative);
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }

    let mut out = fs::File::create(&target)?;
    io::copy(&mut entry, &mut out).map_err(|e| match e.kind() {
      // CRC o datos comprimidos rotos: el contenedor está mal, no el disco.
      io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => ExpandError::BadArchive(e.to_string()),
      _ => ExpandError::Io(e),
    })?;

    debug!(entry = %relative.display(), "extracted");
    extracted.push(relative);
  }

  Ok(extracted)
}

fn bad_archive(err: ZipError) -> ExpandError {
  match err {
    ZipError::Io(e) if e.kind() != io::ErrorKind::InvalidData && e.kind() != io::ErrorKind::UnexpectedEof => {
      ExpandError::Io(e)
    }
    other => ExpandError::BadArchive(other.to_string()),
  }
}
