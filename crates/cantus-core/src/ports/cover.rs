use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CoverError {
  #[error("no embedded picture")]
  NoEmbeddedPicture,

  #[error("missing artist/album tags")]
  MissingTags,

  #[error("no cover found for {artist} - {album}")]
  NotFound { artist: String, album: String },

  #[error("network error: {0}")]
  Network(String),

  #[error("lookup service error {0}: {1}")]
  Service(u16, String),

  #[error("unexpected response: {0}")]
  Parse(String),

  #[error("probe error: {0}")]
  Probe(#[from] crate::ports::ProbeError),

  #[error("encode error: {0}")]
  Encode(#[from] crate::ports::TranscodeError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Port del servicio externo de metadatos musicales para carátulas.
#[async_trait]
pub trait CoverLookup: Send + Sync {
  /// Busca la portada de (artista, álbum) y devuelve los bytes de la imagen.
  async fn fetch_front_cover(&self, artist: &str, album: &str) -> Result<Vec<u8>, CoverError>;
}
