//! `MediaTranscoder` over the `ffmpeg` CLI.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use cantus_core::domain::TargetFormat;
use cantus_core::ports::{MediaTranscoder, TranscodeError};

use crate::jpeg::encode_baseline_jpeg;
use cantus_fs::{run_tool, stderr_text};

const COMMON_ARGS: &[&str] = &["-nostdin", "-hide_banner", "-loglevel", "error", "-y"];

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
  bin: PathBuf,
  jpeg_quality: u8,
}

impl FfmpegTranscoder {
  pub fn new(bin: impl Into<PathBuf>, jpeg_quality: u8) -> Self {
    Self { bin: bin.into(), jpeg_quality }
  }

  async fn run(&self, args: Vec<OsString>, dest: &Path) -> Result<(), TranscodeError> {
    let output = run_tool(&self.bin, &args).await?;

    if !output.status.success() {
      // Never leave a half-written destination behind.
      if let Err(e) = fs::remove_file(dest).await {
        debug!(dest = %dest.display(), error = %e, "no partial output to remove");
      }
      return Err(TranscodeError::Failed { tool: self.bin.display().to_string(), stderr: stderr_text(&output) });
    }

    Ok(())
  }
}

impl Default for FfmpegTranscoder {
  fn default() -> Self {
    Self::new("ffmpeg", 90)
  }
}

/// Arguments to re-encode into `target`, keeping only the first audio stream
/// (no video, no attached pictures).
pub fn transcode_args(src: &Path, dest: &Path, target: &TargetFormat) -> Vec<OsString> {
  let mut args: Vec<OsString> = COMMON_ARGS.iter().map(OsString::from).collect();
  args.push("-i".into());
  args.push(src.into());
  args.extend(
    ["-map", "0:a:0", "-map_metadata", "0", "-c:a", target.codec, "-sample_fmt", target.sample_format, "-ar"]
      .iter()
      .map(OsString::from),
  );
  args.push(target.sample_rate.to_string().into());
  args.push(dest.into());
  args
}

/// Arguments to dump the first embedded picture as JPEG.
pub fn extract_picture_args(src: &Path, dest: &Path) -> Vec<OsString> {
  let mut args: Vec<OsString> = COMMON_ARGS.iter().map(OsString::from).collect();
  args.push("-i".into());
  args.push(src.into());
  args.extend(["-an", "-map", "0:v:0", "-frames:v", "1", "-c:v", "mjpeg"].iter().map(OsString::from));
  args.push(dest.into());
  args
}

#[async_trait]
impl MediaTranscoder for FfmpegTranscoder {
  async fn transcode(&self, src: &Path, dest: &Path, target: &TargetFormat) -> Result<(), TranscodeError> {
    self.run(transcode_args(src, dest, target), dest).await
  }

  async fn extract_picture(&self, src: &Path, dest: &Path) -> Result<(), TranscodeError> {
    self.run(extract_picture_args(src, dest), dest).await
  }

  async fn encode_jpeg(&self, image: &[u8], dest: &Path) -> Result<(), TranscodeError> {
    let bytes = image.to_vec();
    let quality = self.jpeg_quality;

    let jpeg = tokio::task::spawn_blocking(move || encode_baseline_jpeg(&bytes, quality))
      .await
      .map_err(|e| TranscodeError::Image(format!("encode task join error: {e}")))?
      .map_err(|e| TranscodeError::Image(e.to_string()))?;

    fs::write(dest, jpeg).await?;
    Ok(())
  }
}
