//! `RemoteStore` over a plain local directory (setups without rclone, tests).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use cantus_core::domain::RemoteEntry;
use cantus_core::ports::{RemoteError, RemoteStore};

#[derive(Debug, Clone)]
pub struct LocalDirStore {
  root: PathBuf,
}

impl LocalDirStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn source(&self, entry: &RemoteEntry) -> PathBuf {
    self.root.join(entry.path.trim_start_matches('/'))
  }
}

#[async_trait]
impl RemoteStore for LocalDirStore {
  async fn list(&self) -> Result<Vec<RemoteEntry>, RemoteError> {
    let mut dir = fs::read_dir(&self.root).await.map_err(|e| RemoteError::List(format!("{}: {e}", self.root.display())))?;

    let mut entries = Vec::new();
    while let Some(item) = dir.next_entry().await.map_err(|e| RemoteError::List(e.to_string()))? {
      let meta = item.metadata().await.map_err(|e| RemoteError::List(e.to_string()))?;
      if !meta.is_file() {
        continue;
      }
      entries.push(RemoteEntry { path: item.file_name().to_string_lossy().into_owned(), size: Some(meta.len()) });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
  }

  async fn fetch(&self, entry: &RemoteEntry, dest_dir: &Path) -> Result<PathBuf, RemoteError> {
    let source = self.source(entry);
    let local = dest_dir.join(entry.file_name());
    debug!(source = %source.display(), dest = %local.display(), "copy from local remote");

    fs::create_dir_all(dest_dir).await?;
    fs::copy(&source, &local)
      .await
      .map_err(|e| RemoteError::Fetch { path: entry.path.clone(), reason: e.to_string() })?;

    Ok(local)
  }

  async fn delete(&self, entry: &RemoteEntry) -> Result<(), RemoteError> {
    fs::remove_file(self.source(entry))
      .await
      .map_err(|e| RemoteError::Delete { path: entry.path.clone(), reason: e.to_string() })
  }
}
