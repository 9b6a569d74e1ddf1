use std::fmt;
use std::path::PathBuf;

use crate::domain::remote_entry::RemoteEntry;
use crate::domain::track::Track;

/// Un archivo remoto ya descargado, con las pistas en que se expandió.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
  pub entry: RemoteEntry,
  pub local_path: PathBuf,
  pub tracks: Vec<Track>,
}

/// Estados por los que pasa cada archivo remoto durante una ejecución.
///
/// `Pending → Fetched → Expanded → TracksProcessing → Completed`, o `Failed`
/// desde cualquiera de los intermedios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveState {
  Pending,
  Fetched,
  Expanded,
  TracksProcessing,
  Completed,
  Failed,
}

impl fmt::Display for ArchiveState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ArchiveState::Pending => "pending",
      ArchiveState::Fetched => "fetched",
      ArchiveState::Expanded => "expanded",
      ArchiveState::TracksProcessing => "tracks-processing",
      ArchiveState::Completed => "completed",
      ArchiveState::Failed => "failed",
    };
    f.write_str(s)
  }
}

/// Motivo por el que un archivo terminó en `Failed`.
///
/// En todos los casos la copia remota y la local se conservan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveFailure {
  Fetch(String),
  /// Contenedor corrupto o ilegible.
  BadArchive(String),
  Expand(String),
  /// Falló una pista; `placed` pistas anteriores ya están en destino.
  Track { track: PathBuf, placed: usize, reason: String },
}

impl fmt::Display for ArchiveFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArchiveFailure::Fetch(reason) => write!(f, "download failed: {reason}"),
      ArchiveFailure::BadArchive(reason) => write!(f, "invalid archive, left on remote: {reason}"),
      ArchiveFailure::Expand(reason) => write!(f, "could not expand: {reason}"),
      ArchiveFailure::Track { track, placed, reason } => {
        write!(f, "{} failed after {placed} placed: {reason}", track.display())
      }
    }
  }
}

/// Problemas de limpieza tras un archivo completado. No cambian el resultado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupIssue {
  RemoteDelete(String),
  LocalDelete(String),
}

impl fmt::Display for CleanupIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CleanupIssue::RemoteDelete(reason) => write!(f, "remote copy not removed: {reason}"),
      CleanupIssue::LocalDelete(reason) => write!(f, "local copy not removed: {reason}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
  Completed { tracks_placed: usize, cleanup: Vec<CleanupIssue> },
  Failed(ArchiveFailure),
}

/// Resultado de un archivo, tal y como se notifica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
  pub entry: RemoteEntry,
  pub outcome: ArchiveOutcome,
}

impl ArchiveReport {
  pub fn is_completed(&self) -> bool {
    matches!(self.outcome, ArchiveOutcome::Completed { .. })
  }
}

impl fmt::Display for ArchiveReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = self.entry.file_name();
    match &self.outcome {
      ArchiveOutcome::Completed { tracks_placed, cleanup } => {
        write!(f, "✔ {name}: {tracks_placed} files placed")?;
        for issue in cleanup {
          write!(f, " ({issue})")?;
        }
        Ok(())
      }
      ArchiveOutcome::Failed(failure) => write!(f, "✘ {name}: {failure}"),
    }
  }
}

/// Resumen de una ejecución completa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
  pub reports: Vec<ArchiveReport>,
  /// Presente si el listado remoto falló y no se procesó nada.
  pub listing_error: Option<String>,
}

impl BatchSummary {
  pub fn listing_failed(reason: impl Into<String>) -> Self {
    Self { reports: Vec::new(), listing_error: Some(reason.into()) }
  }

  pub fn completed(&self) -> usize {
    self.reports.iter().filter(|r| r.is_completed()).count()
  }

  pub fn failed(&self) -> usize {
    self.reports.len() - self.completed()
  }

  pub fn is_empty(&self) -> bool {
    self.reports.is_empty() && self.listing_error.is_none()
  }
}

impl fmt::Display for BatchSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(reason) = &self.listing_error {
      return write!(f, "library not updated, listing failed: {reason}");
    }
    if self.reports.is_empty() {
      return f.write_str("no new files, library up to date");
    }
    match self.failed() {
      0 => write!(f, "library up to date: {} archive(s) absorbed", self.completed()),
      failed => write!(f, "library partially updated: {} absorbed, {failed} failed", self.completed()),
    }
  }
}
