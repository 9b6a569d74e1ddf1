use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::domain::{
  Archive, ArchiveFailure, ArchiveOutcome, ArchiveReport, ArchiveState, BatchSummary, CleanupIssue, IntakePaths,
  RemoteEntry, Track,
};
use crate::errors::CoreError;
use crate::ports::{
  ArchiveExpander, CoverLookup, ExpandError, MediaProbe, MediaTranscoder, ProgressNotifier, RemoteStore,
};
use crate::services::run_lock::{RunGuard, RunLock};
use crate::services::track_processor::TrackProcessor;

/// Orquestador de la ingesta.
///
/// Procesa los archivos remotos de uno en uno y las pistas de cada archivo
/// también de una en una. Un archivo fallido nunca detiene a los siguientes,
/// y su copia remota solo se borra cuando todas sus pistas están colocadas.
pub struct IntakePipeline<R, X, P, T, L, N> {
  remote: R,
  expander: X,
  tracks: TrackProcessor<P, T, L>,
  notifier: N,
  paths: IntakePaths,
  lock: RunLock,
}

impl<R, X, P, T, L, N> IntakePipeline<R, X, P, T, L, N>
where
  R: RemoteStore,
  X: ArchiveExpander,
  P: MediaProbe,
  T: MediaTranscoder,
  L: CoverLookup,
  N: ProgressNotifier,
{
  pub fn new(remote: R, expander: X, tracks: TrackProcessor<P, T, L>, notifier: N, paths: IntakePaths) -> Self {
    Self { remote, expander, tracks, notifier, paths, lock: RunLock::new() }
  }

  pub fn paths(&self) -> &IntakePaths {
    &self.paths
  }

  pub fn is_running(&self) -> bool {
    self.lock.is_running()
  }

  /// Reserva el turno de ejecución sin arrancarla todavía.
  ///
  /// Útil para el front: rechaza el disparo en el acto y luego lanza
  /// [`run_locked`](Self::run_locked) en segundo plano.
  pub fn try_start(&self) -> Result<RunGuard, CoreError> {
    self.lock.try_acquire()
  }

  pub async fn run(&self) -> Result<BatchSummary, CoreError> {
    let guard = self.try_start()?;
    self.run_locked(guard).await
  }

  pub async fn run_locked(&self, guard: RunGuard) -> Result<BatchSummary, CoreError> {
    let span = info_span!("intake_run", run_id = %Uuid::new_v4());
    let result = self.run_batch().instrument(span).await;
    drop(guard);
    result
  }

  async fn run_batch(&self) -> Result<BatchSummary, CoreError> {
    info!("starting to process new files");

    fs::create_dir_all(&self.paths.receive_dir).await?;
    fs::create_dir_all(&self.paths.staging_dir).await?;
    self.tracks.begin_run().await;

    let entries = match self.remote.list().await {
      Ok(entries) => entries,
      Err(e) => {
        error!(error = %e, "remote listing failed, aborting run");
        let summary = BatchSummary::listing_failed(e.to_string());
        self.notifier.finish(&summary).await;
        return Err(CoreError::RemoteList(e.to_string()));
      }
    };

    info!(count = entries.len(), "remote entries listed");
    self.notifier.start(entries.len()).await;

    let mut summary = BatchSummary::default();

    for entry in entries {
      let report = self.process_archive(entry).await;
      self.notifier.on_archive(&report).await;
      summary.reports.push(report);
    }

    info!(completed = summary.completed(), failed = summary.failed(), "new files processed");
    self.notifier.finish(&summary).await;

    Ok(summary)
  }

  async fn process_archive(&self, entry: RemoteEntry) -> ArchiveReport {
    transition(&entry, ArchiveState::Pending);

    let outcome = match self.absorb(&entry).await {
      Ok(archive) => {
        let cleanup = self.clean_up(&archive).await;
        transition(&entry, ArchiveState::Completed);
        ArchiveOutcome::Completed { tracks_placed: archive.tracks.len(), cleanup }
      }
      Err(failure) => {
        transition(&entry, ArchiveState::Failed);
        warn!(archive = %entry.path, %failure, "archive failed, remote and local copies kept");
        ArchiveOutcome::Failed(failure)
      }
    };

    ArchiveReport { entry, outcome }
  }

  /// Descarga, expande y coloca todas las pistas. Corta en la primera pista
  /// que falle: las anteriores quedan colocadas, el resto sigue en staging.
  async fn absorb(&self, entry: &RemoteEntry) -> Result<Archive, ArchiveFailure> {
    info!(archive = %entry.path, "fetching");
    let local_path =
      self.remote.fetch(entry, &self.paths.receive_dir).await.map_err(|e| ArchiveFailure::Fetch(e.to_string()))?;
    transition(entry, ArchiveState::Fetched);

    info!(archive = %local_path.display(), "expanding");
    let relative = self.expander.expand(&local_path, &self.paths.staging_dir).await.map_err(|e| match e {
      ExpandError::BadArchive(reason) => ArchiveFailure::BadArchive(reason),
      other => ArchiveFailure::Expand(other.to_string()),
    })?;
    transition(entry, ArchiveState::Expanded);

    let tracks: Vec<Track> = relative.into_iter().map(Track::new).collect();

    transition(entry, ArchiveState::TracksProcessing);
    for (placed, track) in tracks.iter().enumerate() {
      self.tracks.process(track, &self.paths).await.map_err(|e| ArchiveFailure::Track {
        track: track.relative().to_path_buf(),
        placed,
        reason: e.to_string(),
      })?;
    }

    Ok(Archive { entry: entry.clone(), local_path, tracks })
  }

  async fn clean_up(&self, archive: &Archive) -> Vec<CleanupIssue> {
    let mut issues = Vec::new();

    if let Err(e) = self.remote.delete(&archive.entry).await {
      warn!(archive = %archive.entry.path, error = %e, "remote copy could not be deleted");
      issues.push(CleanupIssue::RemoteDelete(e.to_string()));
    }

    if let Err(e) = fs::remove_file(&archive.local_path).await {
      warn!(archive = %archive.local_path.display(), error = %e, "local copy could not be deleted");
      issues.push(CleanupIssue::LocalDelete(e.to_string()));
    }

    prune_staging(&self.paths.staging_dir, &archive.tracks).await;
    issues
  }
}

fn transition(entry: &RemoteEntry, state: ArchiveState) {
  debug!(archive = %entry.path, %state, "archive state");
}

/// Borra los directorios del staging que hayan quedado vacíos.
///
/// `remove_dir` solo borra directorios vacíos, así que los restos de otros
/// archivos fallidos no se tocan.
async fn prune_staging(staging_root: &Path, tracks: &[Track]) {
  let mut dirs: BTreeSet<PathBuf> = BTreeSet::new();
  for track in tracks {
    let mut current = track.relative().parent();
    while let Some(dir) = current.filter(|d| !d.as_os_str().is_empty()) {
      dirs.insert(dir.to_path_buf());
      current = dir.parent();
    }
  }

  let mut ordered: Vec<PathBuf> = dirs.into_iter().collect();
  ordered.sort_by_key(|d| std::cmp::Reverse(d.components().count()));

  for dir in ordered {
    let _ = fs::remove_dir(staging_root.join(dir)).await;
  }
}
