//! Tracing setup: stderr plus an append-only log file rotated by size at startup.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Installs the global subscriber. `RUST_LOG` overrides `[log].filter`.
pub fn init(cfg: &LogConfig) -> Result<()> {
  if let Some(parent) = cfg.file.parent() {
    fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
  }

  let rotation = rotate(&cfg.file, cfg.max_bytes, cfg.backups);

  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&cfg.file)
    .with_context(|| format!("opening log file {}", cfg.file.display()))?;

  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&cfg.filter))
    .with_context(|| format!("invalid log filter {:?}", cfg.filter))?;

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(io::stderr))
    .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    .try_init()
    .context("installing tracing subscriber")?;

  match rotation {
    Ok(true) => tracing::info!(file = %cfg.file.display(), "log file rotated"),
    Ok(false) => {}
    Err(e) => tracing::warn!(file = %cfg.file.display(), error = %e, "log rotation failed"),
  }

  Ok(())
}

fn backup_path(file: &Path, n: u32) -> PathBuf {
  let mut name: OsString = file.as_os_str().to_owned();
  name.push(format!(".{n}"));
  PathBuf::from(name)
}

/// Rotates `file` when it exceeds `max_bytes`: `cantus.log` → `cantus.log.1`
/// → ... → `cantus.log.<backups>`, dropping the oldest. Returns whether it rotated.
pub fn rotate(file: &Path, max_bytes: u64, backups: u32) -> io::Result<bool> {
  let size = match fs::metadata(file) {
    Ok(meta) => meta.len(),
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
    Err(e) => return Err(e),
  };

  if size <= max_bytes {
    return Ok(false);
  }

  if backups == 0 {
    fs::remove_file(file)?;
    return Ok(true);
  }

  let oldest = backup_path(file, backups);
  if oldest.exists() {
    fs::remove_file(&oldest)?;
  }

  for n in (1..backups).rev() {
    let from = backup_path(file, n);
    if from.exists() {
      fs::rename(&from, backup_path(file, n + 1))?;
    }
  }

  fs::rename(file, backup_path(file, 1))?;
  Ok(true)
}

/// Last `lines` lines of the log; empty when there is no file yet.
pub fn tail(file: &Path, lines: usize) -> io::Result<String> {
  let content = match fs::read_to_string(file) {
    Ok(content) => content,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
    Err(e) => return Err(e),
  };

  let all: Vec<&str> = content.lines().collect();
  let start = all.len().saturating_sub(lines);
  Ok(all[start..].join("\n"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tail_returns_last_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("cantus.log");
    fs::write(&file, "one\ntwo\nthree\nfour\n").unwrap();

    assert_eq!(tail(&file, 2).unwrap(), "three\nfour");
    assert_eq!(tail(&file, 10).unwrap(), "one\ntwo\nthree\nfour");
    assert_eq!(tail(&tmp.path().join("missing.log"), 5).unwrap(), "");
  }

  #[test]
  fn small_file_is_not_rotated() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("cantus.log");
    fs::write(&file, "short").unwrap();

    assert!(!rotate(&file, 1024, 3).unwrap());
    assert!(file.exists());
    assert!(!backup_path(&file, 1).exists());
  }

  #[test]
  fn rotation_shifts_backups_and_drops_oldest() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("cantus.log");
    fs::write(&file, "current log").unwrap();
    fs::write(backup_path(&file, 1), "older").unwrap();
    fs::write(backup_path(&file, 2), "oldest").unwrap();

    assert!(rotate(&file, 4, 2).unwrap());

    assert!(!file.exists());
    assert_eq!(fs::read_to_string(backup_path(&file, 1)).unwrap(), "current log");
    assert_eq!(fs::read_to_string(backup_path(&file, 2)).unwrap(), "older");
    assert!(!backup_path(&file, 3).exists());
  }
}
