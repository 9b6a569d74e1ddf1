use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::ports::{CoverError, CoverLookup, MediaProbe, MediaTranscoder};

/// Nombre del marcador de carátula dentro de cada directorio de álbum.
pub const COVER_FILE_NAME: &str = "folder.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverOutcome {
  AlreadyPresent,
  Extracted,
  Downloaded,
  Missing,
}

/// Obtiene una carátula por directorio de álbum.
///
/// Orden de estrategias:
/// 1. imagen incrustada en la pista,
/// 2. búsqueda remota por (artista, álbum).
///
/// Nunca falla: cualquier error se registra a nivel debug y se abandona.
pub struct CoverArtResolver<'a, P, T, L> {
  probe: &'a P,
  transcoder: &'a T,
  lookup: Option<&'a L>,
}

impl<'a, P, T, L> CoverArtResolver<'a, P, T, L>
where
  P: MediaProbe,
  T: MediaTranscoder,
  L: CoverLookup,
{
  pub fn new(probe: &'a P, transcoder: &'a T, lookup: Option<&'a L>) -> Self {
    Self { probe, transcoder, lookup }
  }

  pub async fn ensure(&self, track_file: &Path, album_dir: &Path) -> CoverOutcome {
    let target = album_dir.join(COVER_FILE_NAME);

    if fs::try_exists(&target).await.unwrap_or(false) {
      return CoverOutcome::AlreadyPresent;
    }

    match self.extract_embedded(track_file, &target).await {
      Ok(()) => {
        debug!(album = %album_dir.display(), "cover extracted from embedded picture");
        return CoverOutcome::Extracted;
      }
      Err(e) => {
        discard(&target).await;
        debug!(track = %track_file.display(), error = %e, "embedded cover unavailable");
      }
    }

    let Some(lookup) = self.lookup else {
      return CoverOutcome::Missing;
    };

    match self.download(lookup, track_file, &target).await {
      Ok(()) => {
        debug!(album = %album_dir.display(), "cover downloaded");
        CoverOutcome::Downloaded
      }
      Err(e) => {
        discard(&target).await;
        debug!(track = %track_file.display(), error = %e, "cover lookup abandoned");
        CoverOutcome::Missing
      }
    }
  }

  async fn extract_embedded(&self, track_file: &Path, target: &Path) -> Result<(), CoverError> {
    self.transcoder.extract_picture(track_file, target).await?;

    // ffmpeg puede terminar bien sin haber escrito nada útil.
    match fs::metadata(target).await {
      Ok(meta) if meta.len() > 0 => Ok(()),
      _ => Err(CoverError::NoEmbeddedPicture),
    }
  }

  async fn download(&self, lookup: &L, track_file: &Path, target: &Path) -> Result<(), CoverError> {
    let report = self.probe.probe(track_file).await?;

    let (Some(artist), Some(album)) = (report.artist(), report.album()) else {
      return Err(CoverError::MissingTags);
    };

    let image = lookup.fetch_front_cover(artist, album).await?;
    self.transcoder.encode_jpeg(&image, target).await?;

    Ok(())
  }
}

async fn discard(path: &Path) {
  if let Err(e) = fs::remove_file(path).await {
    if e.kind() != ErrorKind::NotFound {
      debug!(path = %path.display(), error = %e, "could not remove partial cover");
    }
  }
}
