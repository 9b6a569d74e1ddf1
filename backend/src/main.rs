use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use cantus_config::{CantusPaths, TomlConfigBackend};
use cantus_lib::config::LogConfig;
use cantus_lib::dispatcher::{DEFAULT_LOG_LINES, Dispatcher};
use cantus_lib::infrastructure::logging;
use cantus_lib::infrastructure::reporter::ChatNotifier;

/// Command-line arguments for cantus
#[derive(Parser, Debug)]
#[command(name = "cantus")]
#[command(about = "Absorbs uploaded albums into the music library")]
#[command(version)]
struct Cli {
  /// Portable root (config/, data/, cache/); defaults to $CANTUS_BASE_DIR or the user directories
  #[arg(long)]
  base_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Process new remote uploads once and exit
  Run,
  /// Read chat commands (/newfiles, /log, /help) from stdin
  Listen,
  /// Print the end of the log file
  Log {
    #[arg(short = 'n', long, default_value_t = DEFAULT_LOG_LINES)]
    lines: usize,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let paths = match cli.base_dir {
    Some(base) => CantusPaths::under(base)?,
    None => CantusPaths::detect()?,
  };
  let backend = TomlConfigBackend::new(&paths);
  let log = LogConfig::load_from(&backend, &paths).context("loading [log] config")?;

  if let Commands::Log { lines } = cli.command {
    println!("{}", logging::tail(&log.file, lines)?);
    return Ok(());
  }

  logging::init(&log)?;

  let (notifier, mut inbox) = ChatNotifier::channel();
  let pipeline = cantus_lib::build_pipeline(&backend, &paths, notifier)?;

  let printer = tokio::spawn(async move {
    while let Some(message) = inbox.recv().await {
      println!("{message}");
    }
  });

  match cli.command {
    Commands::Run => {
      let outcome = pipeline.run().await;
      drop(pipeline);
      printer.await?;
      outcome?;
    }
    Commands::Listen => {
      let dispatcher = Dispatcher::new(pipeline, log.file.clone());
      let mut lines = BufReader::new(tokio::io::stdin()).lines();

      while let Some(line) = lines.next_line().await? {
        if let Some(reply) = dispatcher.handle(&line) {
          println!("{reply}");
        }
      }

      // stdin closed: finish the in-flight run, then let the printer drain.
      dispatcher.shutdown().await;
      printer.await?;
    }
    Commands::Log { .. } => {}
  }

  Ok(())
}
