pub mod config;
pub mod dispatcher;
pub mod infrastructure;

use std::sync::Arc;

use cantus_config::{CantusPaths, ConfigBackend};
use cantus_core::domain::IntakePaths;
use cantus_core::services::{IntakePipeline, TrackProcessor};
use cantus_fs::ZipExpander;
use cantus_media::{FfmpegTranscoder, MediaConfig, MusicBrainzCoverLookup};
use cantus_remote::{RemoteBackend, RemoteConfig};

use crate::config::IntakeConfig;
use infrastructure::reporter::ChatNotifier;

#[cfg(feature = "libav")]
type ConcreteProbe = cantus_media::LibavProbe;
#[cfg(not(feature = "libav"))]
type ConcreteProbe = cantus_media::FfprobeProbe;

/// Type alias to simplify the generic signature of the pipeline.
pub type ConcretePipeline =
  IntakePipeline<RemoteBackend, ZipExpander, ConcreteProbe, FfmpegTranscoder, MusicBrainzCoverLookup, ChatNotifier>;

#[cfg(feature = "libav")]
fn build_probe(_media: &MediaConfig) -> ConcreteProbe {
  cantus_media::LibavProbe::new()
}

#[cfg(not(feature = "libav"))]
fn build_probe(media: &MediaConfig) -> ConcreteProbe {
  cantus_media::FfprobeProbe::new(&media.ffprobe_bin)
}

/// Reads every section and injects the concrete adapters into the core pipeline.
pub fn build_pipeline<B: ConfigBackend>(
  backend: &B,
  paths: &CantusPaths,
  notifier: ChatNotifier,
) -> anyhow::Result<Arc<ConcretePipeline>> {
  let intake: IntakePaths = IntakeConfig::load_from(backend, paths)?.into();
  let remote_cfg = RemoteConfig::load_from(backend)?;
  let media = MediaConfig::load_from(backend)?;

  // 1. Remote adapter (rclone or a plain directory)
  let remote = RemoteBackend::from_config(&remote_cfg);

  // 2. Archive adapter
  let expander = ZipExpander::new();

  // 3. Media adapters
  let probe = build_probe(&media);
  let transcoder = FfmpegTranscoder::new(&media.ffmpeg_bin, media.jpeg_quality);

  // 4. Cover lookup; without it only embedded art is used.
  let lookup = if media.cover_lookup {
    match MusicBrainzCoverLookup::new(&media.user_agent) {
      Ok(lookup) => Some(lookup),
      Err(e) => {
        tracing::warn!(error = %e, "cover lookup disabled, HTTP client could not be built");
        None
      }
    }
  } else {
    None
  };

  tracing::info!(
    remote = %remote_cfg.remote_dir,
    library = %intake.dest_dir.display(),
    cover_lookup = lookup.is_some(),
    "pipeline ready"
  );

  let tracks = TrackProcessor::new(probe, transcoder, lookup);
  Ok(Arc::new(IntakePipeline::new(remote, expander, tracks, notifier, intake)))
}
