use async_trait::async_trait;
use cantus_core::domain::{ArchiveReport, BatchSummary};
use cantus_core::ports::ProgressNotifier;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A `ProgressNotifier` that turns pipeline events into chat messages.
///
/// Messages go to an outbox channel; the front end decides where they end up
/// (stdout for `run`, the command loop for `listen`).
#[derive(Clone)]
pub struct ChatNotifier {
  outbox: UnboundedSender<String>,
}

impl ChatNotifier {
  pub fn channel() -> (Self, UnboundedReceiver<String>) {
    let (outbox, inbox) = mpsc::unbounded_channel();
    (Self { outbox }, inbox)
  }

  fn say(&self, message: String) {
    // Fire-and-forget: nobody listening is not an error for the pipeline.
    let _ = self.outbox.send(message);
  }
}

#[async_trait]
impl ProgressNotifier for ChatNotifier {
  async fn start(&self, total_archives: usize) {
    if total_archives > 0 {
      self.say(format!("{total_archives} new archive(s) found, processing"));
    }
  }

  async fn on_archive(&self, report: &ArchiveReport) {
    self.say(report.to_string());
  }

  async fn finish(&self, summary: &BatchSummary) {
    self.say(summary.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn empty_batch_only_reports_summary() {
    let (notifier, mut inbox) = ChatNotifier::channel();

    notifier.start(0).await;
    notifier.finish(&BatchSummary::default()).await;
    drop(notifier);

    assert_eq!(inbox.recv().await.as_deref(), Some("no new files, library up to date"));
    assert_eq!(inbox.recv().await, None);
  }
}
