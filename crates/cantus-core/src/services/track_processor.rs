use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{IntakePaths, TargetFormat, Track, TrackAction};
use crate::ports::{CoverLookup, MediaProbe, MediaTranscoder, ProbeError, TranscodeError};
use crate::services::cover_art::CoverArtResolver;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
  #[error("probe failed: {0}")]
  Probe(#[from] ProbeError),

  #[error("transcode failed: {0}")]
  Transcode(#[from] TranscodeError),

  #[error("copy failed: {0}")]
  Copy(std::io::Error),

  #[error("could not create {path}: {source}")]
  Prepare { path: PathBuf, source: std::io::Error },

  #[error("could not remove staged source: {0}")]
  RemoveSource(std::io::Error),
}

/// Coloca una pista del staging en la biblioteca.
///
/// Semántica de "mover": si todo va bien la pista desaparece del staging; si
/// algo falla se queda allí intacta y se puede reintentar.
pub struct TrackProcessor<P, T, L> {
  probe: P,
  transcoder: T,
  lookup: Option<L>,
  /// Directorios de álbum cuya carátula ya se intentó en esta ejecución,
  /// haya salido bien o no.
  cover_attempts: Mutex<HashSet<PathBuf>>,
}

impl<P, T, L> TrackProcessor<P, T, L>
where
  P: MediaProbe,
  T: MediaTranscoder,
  L: CoverLookup,
{
  /// `lookup == None` desactiva la búsqueda remota de carátulas.
  pub fn new(probe: P, transcoder: T, lookup: Option<L>) -> Self {
    Self { probe, transcoder, lookup, cover_attempts: Mutex::new(HashSet::new()) }
  }

  /// Olvida los intentos de carátula de la ejecución anterior.
  pub async fn begin_run(&self) {
    self.cover_attempts.lock().await.clear();
  }

  /// `true` solo la primera vez que se pide para `album_dir` en la ejecución.
  async fn claim_cover_attempt(&self, album_dir: &Path) -> bool {
    self.cover_attempts.lock().await.insert(album_dir.to_path_buf())
  }

  pub fn covers(&self) -> CoverArtResolver<'_, P, T, L> {
    CoverArtResolver::new(&self.probe, &self.transcoder, self.lookup.as_ref())
  }

  /// Devuelve la ruta final de la pista en destino.
  pub async fn process(&self, track: &Track, paths: &IntakePaths) -> Result<PathBuf, TrackError> {
    let src = track.source_path(&paths.staging_dir);
    let dest = track.destination_path(&paths.dest_dir);
    let album_dir = track.album_dir(&paths.dest_dir);

    let report = self.probe.probe(&src).await?;

    fs::create_dir_all(&album_dir).await.map_err(|source| TrackError::Prepare { path: album_dir.clone(), source })?;

    match TrackAction::for_report(&report) {
      TrackAction::Transcode => {
        info!(src = %src.display(), dest = %dest.display(), "transcoding");
        self.transcoder.transcode(&src, &dest, &TargetFormat::CD_QUALITY).await?;
      }
      TrackAction::Copy => {
        info!(src = %src.display(), dest = %dest.display(), "copying");
        fs::copy(&src, &dest).await.map_err(TrackError::Copy)?;
      }
    }

    // Libretos e imágenes no aportan carátula: solo pistas de audio.
    if report.audio.is_some() && self.claim_cover_attempt(&album_dir).await {
      self.covers().ensure(&src, &album_dir).await;
    }

    remove_source(&src).await?;
    Ok(dest)
  }
}

async fn remove_source(src: &Path) -> Result<(), TrackError> {
  fs::remove_file(src).await.map_err(TrackError::RemoveSource)
}
