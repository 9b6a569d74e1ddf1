use async_trait::async_trait;

use crate::domain::{ArchiveReport, BatchSummary};

// El front (chat, consola) implementa esto para avisar al usuario.
#[async_trait]
pub trait ProgressNotifier: Send + Sync {
  async fn start(&self, total_archives: usize);
  async fn on_archive(&self, report: &ArchiveReport);
  async fn finish(&self, summary: &BatchSummary);
}
