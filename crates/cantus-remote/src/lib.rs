pub mod config;
pub mod local;
pub mod rclone;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cantus_core::domain::RemoteEntry;
use cantus_core::ports::{RemoteError, RemoteStore};

pub use config::{RemoteConfig, RemoteKind};
pub use local::LocalDirStore;
pub use rclone::RcloneStore;

/// Adapter selected by `[remote].backend`.
pub enum RemoteBackend {
  Rclone(RcloneStore),
  Local(LocalDirStore),
}

impl RemoteBackend {
  pub fn from_config(cfg: &RemoteConfig) -> Self {
    match cfg.backend {
      RemoteKind::Rclone => RemoteBackend::Rclone(RcloneStore::new(&cfg.rclone_bin, &cfg.remote_dir)),
      RemoteKind::Local => RemoteBackend::Local(LocalDirStore::new(&cfg.remote_dir)),
    }
  }
}

#[async_trait]
impl RemoteStore for RemoteBackend {
  async fn list(&self) -> Result<Vec<RemoteEntry>, RemoteError> {
    match self {
      RemoteBackend::Rclone(s) => s.list().await,
      RemoteBackend::Local(s) => s.list().await,
    }
  }

  async fn fetch(&self, entry: &RemoteEntry, dest_dir: &Path) -> Result<PathBuf, RemoteError> {
    match self {
      RemoteBackend::Rclone(s) => s.fetch(entry, dest_dir).await,
      RemoteBackend::Local(s) => s.fetch(entry, dest_dir).await,
    }
  }

  async fn delete(&self, entry: &RemoteEntry) -> Result<(), RemoteError> {
    match self {
      RemoteBackend::Rclone(s) => s.delete(entry).await,
      RemoteBackend::Local(s) => s.delete(entry).await,
    }
  }
}
