//! Adapters en memoria para probar los servicios sin procesos externos.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{ArchiveReport, AudioStream, BatchSummary, IntakePaths, ProbeReport, RemoteEntry, TargetFormat};
use crate::ports::{
  ArchiveExpander, CoverError, CoverLookup, ExpandError, MediaProbe, MediaTranscoder, ProbeError, ProgressNotifier,
  RemoteError, RemoteStore, TranscodeError,
};

pub fn intake_paths(root: &Path) -> IntakePaths {
  IntakePaths {
    receive_dir: root.join("received"),
    staging_dir: root.join("staging"),
    dest_dir: root.join("library"),
  }
}

fn file_name(path: &Path) -> String {
  path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

// --- RemoteStore ---

#[derive(Default)]
struct RemoteState {
  entries: Vec<RemoteEntry>,
  deleted: Vec<String>,
  fetches: usize,
  list_calls: usize,
}

#[derive(Clone, Default)]
pub struct FakeRemote {
  state: Arc<Mutex<RemoteState>>,
  fail_list: bool,
  fail_delete: bool,
}

impl FakeRemote {
  pub fn with_entries(paths: &[&str]) -> Self {
    let remote = Self::default();
    remote.state.lock().unwrap().entries = paths.iter().map(|p| RemoteEntry::new(*p)).collect();
    remote
  }

  pub fn failing_list() -> Self {
    Self { fail_list: true, ..Self::default() }
  }

  pub fn with_failing_delete(mut self) -> Self {
    self.fail_delete = true;
    self
  }

  pub fn listed(&self) -> Vec<String> {
    self.state.lock().unwrap().entries.iter().map(|e| e.path.clone()).collect()
  }

  pub fn deleted(&self) -> Vec<String> {
    self.state.lock().unwrap().deleted.clone()
  }

  pub fn fetches(&self) -> usize {
    self.state.lock().unwrap().fetches
  }

  pub fn list_calls(&self) -> usize {
    self.state.lock().unwrap().list_calls
  }
}

#[async_trait]
impl RemoteStore for FakeRemote {
  async fn list(&self) -> Result<Vec<RemoteEntry>, RemoteError> {
    let mut state = self.state.lock().unwrap();
    state.list_calls += 1;
    if self.fail_list {
      return Err(RemoteError::List("auth expired".into()));
    }
    Ok(state.entries.clone())
  }

  async fn fetch(&self, entry: &RemoteEntry, dest_dir: &Path) -> Result<PathBuf, RemoteError> {
    self.state.lock().unwrap().fetches += 1;
    let local = dest_dir.join(entry.file_name());
    std::fs::write(&local, entry.path.as_bytes())?;
    Ok(local)
  }

  async fn delete(&self, entry: &RemoteEntry) -> Result<(), RemoteError> {
    if self.fail_delete {
      return Err(RemoteError::Delete { path: entry.path.clone(), reason: "permission denied".into() });
    }
    let mut state = self.state.lock().unwrap();
    state.entries.retain(|e| e != entry);
    state.deleted.push(entry.path.clone());
    Ok(())
  }
}

// --- ArchiveExpander ---

#[derive(Default)]
struct ExpanderState {
  // None = contenedor corrupto
  archives: HashMap<String, Option<Vec<(String, Vec<u8>)>>>,
  expansions: usize,
}

#[derive(Clone, Default)]
pub struct FakeExpander {
  state: Arc<Mutex<ExpanderState>>,
}

impl FakeExpander {
  pub fn with_archive(self, name: &str, files: Vec<(String, Vec<u8>)>) -> Self {
    self.state.lock().unwrap().archives.insert(name.to_string(), Some(files));
    self
  }

  pub fn with_corrupt(self, name: &str) -> Self {
    self.state.lock().unwrap().archives.insert(name.to_string(), None);
    self
  }

  pub fn expansions(&self) -> usize {
    self.state.lock().unwrap().expansions
  }
}

#[async_trait]
impl ArchiveExpander for FakeExpander {
  async fn expand(&self, archive: &Path, staging_dir: &Path) -> Result<Vec<PathBuf>, ExpandError> {
    let mut state = self.state.lock().unwrap();
    state.expansions += 1;

    let files = match state.archives.get(&file_name(archive)) {
      Some(Some(files)) => files.clone(),
      _ => return Err(ExpandError::BadArchive("invalid central directory".into())),
    };

    let mut relative = Vec::new();
    for (rel, bytes) in files {
      let target = staging_dir.join(&rel);
      std::fs::create_dir_all(target.parent().unwrap())?;
      std::fs::write(&target, bytes)?;
      relative.push(PathBuf::from(rel));
    }
    Ok(relative)
  }
}

// --- MediaProbe ---

#[derive(Clone, Default)]
pub struct FakeProbe {
  reports: HashMap<String, ProbeReport>,
  failing: HashSet<String>,
}

impl FakeProbe {
  pub fn with_stream(mut self, name: &str, sample_format: &str, sample_rate: u32) -> Self {
    self.reports.entry(name.to_string()).or_default().audio =
      Some(AudioStream { sample_format: sample_format.to_string(), sample_rate });
    self
  }

  pub fn with_tags(mut self, name: &str, artist: &str, album: &str) -> Self {
    let report = self.reports.entry(name.to_string()).or_default();
    report.tags.insert("artist".into(), artist.into());
    report.tags.insert("album".into(), album.into());
    self
  }

  pub fn failing(mut self, name: &str) -> Self {
    self.failing.insert(name.to_string());
    self
  }
}

#[async_trait]
impl MediaProbe for FakeProbe {
  async fn probe(&self, path: &Path) -> Result<ProbeReport, ProbeError> {
    let name = file_name(path);
    if self.failing.contains(&name) {
      return Err(ProbeError::InvalidOutput(format!("cannot parse {name}")));
    }
    Ok(self.reports.get(&name).cloned().unwrap_or_default())
  }
}

// --- MediaTranscoder ---

#[derive(Default)]
struct TranscoderState {
  transcoded: Vec<(PathBuf, TargetFormat)>,
  extractions: usize,
}

#[derive(Clone, Default)]
pub struct FakeTranscoder {
  state: Arc<Mutex<TranscoderState>>,
  embedded_art: HashSet<String>,
  partial_extraction: bool,
}

impl FakeTranscoder {
  pub fn with_embedded_art(mut self, name: &str) -> Self {
    self.embedded_art.insert(name.to_string());
    self
  }

  /// La extracción "termina bien" pero deja un archivo vacío.
  pub fn with_partial_extraction(mut self) -> Self {
    self.partial_extraction = true;
    self
  }

  pub fn transcoded(&self) -> Vec<(PathBuf, TargetFormat)> {
    self.state.lock().unwrap().transcoded.clone()
  }

  pub fn extractions(&self) -> usize {
    self.state.lock().unwrap().extractions
  }
}

#[async_trait]
impl MediaTranscoder for FakeTranscoder {
  async fn transcode(&self, _src: &Path, dest: &Path, target: &TargetFormat) -> Result<(), TranscodeError> {
    std::fs::write(dest, b"transcoded")?;
    self.state.lock().unwrap().transcoded.push((dest.to_path_buf(), target.clone()));
    Ok(())
  }

  async fn extract_picture(&self, src: &Path, dest: &Path) -> Result<(), TranscodeError> {
    self.state.lock().unwrap().extractions += 1;
    if self.embedded_art.contains(&file_name(src)) {
      std::fs::write(dest, b"embedded jpeg")?;
      return Ok(());
    }
    if self.partial_extraction {
      std::fs::write(dest, b"")?;
      return Ok(());
    }
    Err(TranscodeError::Failed { tool: "ffmpeg".into(), stderr: "Output file does not contain any stream".into() })
  }

  async fn encode_jpeg(&self, image: &[u8], dest: &Path) -> Result<(), TranscodeError> {
    std::fs::write(dest, image)?;
    Ok(())
  }
}

// --- CoverLookup ---

#[derive(Clone, Default)]
pub struct FakeLookup {
  cover: Option<Vec<u8>>,
  queries: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeLookup {
  pub fn with_cover(bytes: &[u8]) -> Self {
    Self { cover: Some(bytes.to_vec()), ..Self::default() }
  }

  pub fn not_found() -> Self {
    Self::default()
  }

  pub fn calls(&self) -> usize {
    self.queries.lock().unwrap().len()
  }

  pub fn queries(&self) -> Vec<(String, String)> {
    self.queries.lock().unwrap().clone()
  }
}

#[async_trait]
impl CoverLookup for FakeLookup {
  async fn fetch_front_cover(&self, artist: &str, album: &str) -> Result<Vec<u8>, CoverError> {
    self.queries.lock().unwrap().push((artist.to_string(), album.to_string()));
    self.cover.clone().ok_or_else(|| CoverError::NotFound { artist: artist.into(), album: album.into() })
  }
}

// --- ProgressNotifier ---

#[derive(Clone, Default)]
pub struct RecordingNotifier {
  messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
  pub fn messages(&self) -> Vec<String> {
    self.messages.lock().unwrap().clone()
  }
}

#[async_trait]
impl ProgressNotifier for RecordingNotifier {
  async fn start(&self, total_archives: usize) {
    self.messages.lock().unwrap().push(format!("{total_archives} new archive(s)"));
  }

  async fn on_archive(&self, report: &ArchiveReport) {
    self.messages.lock().unwrap().push(report.to_string());
  }

  async fn finish(&self, summary: &BatchSummary) {
    self.messages.lock().unwrap().push(summary.to_string());
  }
}
