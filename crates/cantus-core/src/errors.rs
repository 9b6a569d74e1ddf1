use thiserror::Error;

/// Errores a nivel de ejecución completa del pipeline.
///
/// Los fallos de un archivo o de una pista no llegan aquí: se convierten en
/// un [`ArchiveFailure`](crate::domain::ArchiveFailure) y la ejecución sigue.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("remote listing failed: {0}")]
  RemoteList(String),

  #[error("an intake run is already in progress")]
  RunInFlight,

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}
