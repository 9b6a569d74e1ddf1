//! In-process `MediaProbe` backed by libav (feature `libav`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;

use cantus_core::domain::{AudioStream, ProbeReport};
use cantus_core::ports::{MediaProbe, ProbeError};

#[derive(Clone)]
pub struct LibavProbe;

impl LibavProbe {
  pub fn new() -> Self {
    if let Err(e) = ffmpeg::init() {
      tracing::warn!("FFmpeg init failed: {}", e);
    }
    Self
  }
}

impl Default for LibavProbe {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl MediaProbe for LibavProbe {
  async fn probe(&self, path: &Path) -> Result<ProbeReport, ProbeError> {
    let path_buf = PathBuf::from(path);

    tokio::task::spawn_blocking(move || probe_sync(&path_buf))
      .await
      .map_err(|e| ProbeError::InvalidOutput(format!("Tokio Task Join Error: {}", e)))?
  }
}

fn probe_sync(path: &Path) -> Result<ProbeReport, ProbeError> {
  // As with ffprobe: a file libav cannot open has no audio.
  let context = match ffmpeg::format::input(&path) {
    Ok(ctx) => ctx,
    Err(e) => {
      tracing::debug!(path = %path.display(), "libav did not recognize file: {}", e);
      return Ok(ProbeReport::default());
    }
  };

  let tags: HashMap<String, String> =
    context.metadata().iter().map(|(k, v)| (k.to_lowercase(), v.to_string())).collect();

  let audio = context.streams().best(ffmpeg::media::Type::Audio).and_then(|stream| {
    let ctx = ffmpeg::codec::context::Context::from_parameters(stream.parameters()).ok()?;
    let decoder = ctx.decoder().audio().ok()?;
    Some(AudioStream { sample_format: decoder.format().name().to_string(), sample_rate: decoder.rate() })
  });

  Ok(ProbeReport { audio, tags })
}
