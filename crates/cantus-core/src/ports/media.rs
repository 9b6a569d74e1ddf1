use std::path::Path;

use async_trait::async_trait;

use crate::domain::{ProbeReport, TargetFormat};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("unreadable probe output: {0}")]
  InvalidOutput(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("{tool} failed: {stderr}")]
  Failed { tool: String, stderr: String },

  #[error("image error: {0}")]
  Image(String),
}

/// Port de inspección de archivos multimedia.
///
/// Implementaciones posibles:
/// - ffprobe (proceso externo)
/// - libav en proceso
#[async_trait]
pub trait MediaProbe: Send + Sync {
  async fn probe(&self, path: &Path) -> Result<ProbeReport, ProbeError>;
}

/// Port de recodificación.
#[async_trait]
pub trait MediaTranscoder: Send + Sync {
  /// Recodifica `src` en `dest` con un único stream de audio en `target`.
  /// Los streams de vídeo/carátula se descartan de la salida.
  async fn transcode(&self, src: &Path, dest: &Path, target: &TargetFormat) -> Result<(), TranscodeError>;

  /// Extrae la imagen incrustada de `src` como JPEG en `dest`.
  async fn extract_picture(&self, src: &Path, dest: &Path) -> Result<(), TranscodeError>;

  /// Convierte una imagen arbitraria a JPEG baseline en `dest`.
  async fn encode_jpeg(&self, image: &[u8], dest: &Path) -> Result<(), TranscodeError>;
}
