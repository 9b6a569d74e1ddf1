//! Chat commands accepted by `cantus listen`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cantus_core::CoreError;

use crate::ConcretePipeline;
use crate::infrastructure::logging;

pub const DEFAULT_LOG_LINES: usize = 20;

const HELP: &str = "/newfiles - absorb what was uploaded to the remote\n/log - show the latest log lines\n/help - this list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  NewFiles,
  Log { lines: usize },
  Help,
  Unknown(String),
}

impl Command {
  /// `None` for blank lines.
  pub fn parse(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?;

    let command = match head.to_lowercase().as_str() {
      "/newfiles" => Command::NewFiles,
      "/log" => Command::Log { lines: words.next().and_then(|n| n.parse().ok()).unwrap_or(DEFAULT_LOG_LINES) },
      "/help" | "/start" => Command::Help,
      _ => Command::Unknown(head.to_string()),
    };
    Some(command)
  }
}

pub struct Dispatcher {
  pipeline: Arc<ConcretePipeline>,
  log_file: PathBuf,
}

impl Dispatcher {
  pub fn new(pipeline: Arc<ConcretePipeline>, log_file: PathBuf) -> Self {
    Self { pipeline, log_file }
  }

  /// Immediate reply to a command line. Run progress arrives later through the notifier.
  pub fn handle(&self, line: &str) -> Option<String> {
    let reply = match Command::parse(line)? {
      Command::NewFiles => self.trigger_run(),
      Command::Log { lines } => match logging::tail(&self.log_file, lines) {
        Ok(text) if text.is_empty() => "log is empty".to_string(),
        Ok(text) => text,
        Err(e) => format!("could not read log: {e}"),
      },
      Command::Help => HELP.to_string(),
      Command::Unknown(cmd) => format!("unknown command {cmd}, try /help"),
    };
    Some(reply)
  }

  /// Waits for an in-flight run, then releases the pipeline. Once every run
  /// task is gone the notifier outbox closes.
  pub async fn shutdown(self) {
    while self.pipeline.is_running() {
      tokio::time::sleep(Duration::from_millis(50)).await;
    }
  }

  fn trigger_run(&self) -> String {
    match self.pipeline.try_start() {
      Ok(guard) => {
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
          if let Err(e) = pipeline.run_locked(guard).await {
            tracing::error!(error = %e, "run aborted");
          }
        });
        "roger that".to_string()
      }
      Err(CoreError::RunInFlight) => "already processing new files, try again when it finishes".to_string(),
      Err(e) => format!("could not start: {e}"),
    }
  }
}
