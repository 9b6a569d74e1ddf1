//! `RemoteStore` over the `rclone` CLI.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use cantus_core::domain::RemoteEntry;
use cantus_core::ports::{RemoteError, RemoteStore};
use cantus_fs::{run_tool, stderr_text};

#[derive(Debug, Clone)]
pub struct RcloneStore {
  bin: PathBuf,
  /// `remote:path` as rclone understands it.
  remote_dir: String,
}

impl RcloneStore {
  pub fn new(bin: impl Into<PathBuf>, remote_dir: impl Into<String>) -> Self {
    Self { bin: bin.into(), remote_dir: remote_dir.into() }
  }

  /// Full rclone path of an entry under the remote root.
  fn remote_path(&self, entry: &RemoteEntry) -> String {
    let root = self.remote_dir.trim_end_matches('/');
    let path = entry.path.trim_start_matches('/');
    if root.ends_with(':') { format!("{root}{path}") } else { format!("{root}/{path}") }
  }

  async fn rclone<I, S>(&self, args: I) -> std::io::Result<Output>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    run_tool(&self.bin, args).await
  }
}

#[async_trait]
impl RemoteStore for RcloneStore {
  async fn list(&self) -> Result<Vec<RemoteEntry>, RemoteError> {
    debug!(remote = %self.remote_dir, "rclone lsjson");

    let output = self.rclone(["lsjson", self.remote_dir.as_str()]).await.map_err(|e| RemoteError::List(e.to_string()))?;

    if !output.status.success() {
      return Err(RemoteError::List(stderr_text(&output)));
    }

    parse_lsjson(&String::from_utf8_lossy(&output.stdout))
  }

  async fn fetch(&self, entry: &RemoteEntry, dest_dir: &Path) -> Result<PathBuf, RemoteError> {
    let source = self.remote_path(entry);
    debug!(%source, dest = %dest_dir.display(), "rclone copy");

    let output = self
      .rclone([OsStr::new("copy"), OsStr::new(&source), dest_dir.as_os_str()])
      .await
      .map_err(|e| RemoteError::Fetch { path: entry.path.clone(), reason: e.to_string() })?;

    if !output.status.success() {
      return Err(RemoteError::Fetch { path: entry.path.clone(), reason: stderr_text(&output) });
    }

    let local = dest_dir.join(entry.file_name());
    if !tokio::fs::try_exists(&local).await? {
      return Err(RemoteError::Fetch {
        path: entry.path.clone(),
        reason: format!("rclone reported success but {} is missing", local.display()),
      });
    }

    Ok(local)
  }

  async fn delete(&self, entry: &RemoteEntry) -> Result<(), RemoteError> {
    let target = self.remote_path(entry);
    debug!(%target, "rclone deletefile");

    let output = self
      .rclone(["deletefile", target.as_str()])
      .await
      .map_err(|e| RemoteError::Delete { path: entry.path.clone(), reason: e.to_string() })?;

    if !output.status.success() {
      return Err(RemoteError::Delete { path: entry.path.clone(), reason: stderr_text(&output) });
    }

    Ok(())
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsJsonItem {
  path: String,
  #[serde(default)]
  size: i64,
  #[serde(default)]
  is_dir: bool,
}

/// Entries from `rclone lsjson`, directories dropped, sorted by path.
pub fn parse_lsjson(json: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
  let items: Vec<LsJsonItem> =
    serde_json::from_str(json).map_err(|e| RemoteError::List(format!("unreadable lsjson output: {e}")))?;

  let mut entries: Vec<RemoteEntry> = items
    .into_iter()
    .filter(|item| !item.is_dir)
    .map(|item| RemoteEntry { path: item.path, size: u64::try_from(item.size).ok() })
    .collect();

  entries.sort_by(|a, b| a.path.cmp(&b.path));
  Ok(entries)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lsjson_drops_directories() {
    let json = r#"[
      {"Path":"b.zip","Name":"b.zip","Size":2048,"MimeType":"application/zip","ModTime":"2024-05-01T10:00:00Z","IsDir":false},
      {"Path":"old","Name":"old","Size":-1,"MimeType":"inode/directory","ModTime":"2024-05-01T10:00:00Z","IsDir":true},
      {"Path":"a.zip","Name":"a.zip","Size":1024,"MimeType":"application/zip","ModTime":"2024-05-01T10:00:00Z","IsDir":false}
    ]"#;

    let entries = parse_lsjson(json).unwrap();

    assert_eq!(entries, vec![
      RemoteEntry { path: "a.zip".into(), size: Some(1024) },
      RemoteEntry { path: "b.zip".into(), size: Some(2048) },
    ]);
  }

  #[test]
  fn empty_remote_lists_nothing() {
    assert!(parse_lsjson("[]").unwrap().is_empty());
    assert!(matches!(parse_lsjson("Failed to lsjson"), Err(RemoteError::List(_))));
  }

  #[test]
  fn remote_path_joins_root_and_entry() {
    let with_dir = RcloneStore::new("rclone", "gdrive:uploads/");
    assert_eq!(with_dir.remote_path(&RemoteEntry::new("album.zip")), "gdrive:uploads/album.zip");

    let bare_remote = RcloneStore::new("rclone", "gdrive:");
    assert_eq!(bare_remote.remote_path(&RemoteEntry::new("album.zip")), "gdrive:album.zip");
  }

  #[tokio::test]
  async fn missing_binary_is_a_list_error() {
    let store = RcloneStore::new("/nonexistent/rclone-binary", "gdrive:");
    assert!(matches!(store.list().await, Err(RemoteError::List(_))));
  }
}
