//! `MediaProbe` over the `ffprobe` CLI.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use cantus_core::domain::{AudioStream, ProbeReport};
use cantus_core::ports::{MediaProbe, ProbeError};

use cantus_fs::{run_tool, stderr_text};

const PROBE_ARGS: &[&str] =
  &["-v", "error", "-show_entries", "stream=codec_type,sample_fmt,sample_rate:stream_tags:format_tags", "-of", "json"];

#[derive(Debug, Clone)]
pub struct FfprobeProbe {
  bin: PathBuf,
}

impl FfprobeProbe {
  pub fn new(bin: impl Into<PathBuf>) -> Self {
    Self { bin: bin.into() }
  }
}

impl Default for FfprobeProbe {
  fn default() -> Self {
    Self::new("ffprobe")
  }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
  async fn probe(&self, path: &Path) -> Result<ProbeReport, ProbeError> {
    let mut args: Vec<&OsStr> = PROBE_ARGS.iter().map(OsStr::new).collect();
    args.push(path.as_os_str());

    let output = run_tool(&self.bin, args).await?;

    // ffprobe exits with an error on data it does not recognize (pdf, txt...).
    // That just means there is no audio.
    if !output.status.success() {
      debug!(path = %path.display(), stderr = %stderr_text(&output), "ffprobe did not recognize file");
      return Ok(ProbeReport::default());
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
  }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
  #[serde(default)]
  streams: Vec<FfprobeStream>,
  format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
  sample_fmt: Option<String>,
  sample_rate: Option<String>,
  #[serde(default)]
  tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
  #[serde(default)]
  tags: HashMap<String, String>,
}

/// Maps ffprobe JSON output to a `ProbeReport`.
///
/// The audio stream is the first one carrying `sample_fmt` and `sample_rate`.
/// Container tags win over stream tags (Ogg keeps its Vorbis comments on the
/// stream).
pub fn parse_probe_output(json: &str) -> Result<ProbeReport, ProbeError> {
  let probe: FfprobeOutput =
    serde_json::from_str(json).map_err(|e| ProbeError::InvalidOutput(format!("JSON parse error: {e}")))?;

  let mut report = ProbeReport::default();

  let audio = probe.streams.into_iter().find_map(|s| match (s.sample_fmt, s.sample_rate) {
    (Some(sample_format), Some(rate)) => Some((sample_format, rate, s.tags)),
    _ => None,
  });

  if let Some((sample_format, rate, stream_tags)) = audio {
    let sample_rate =
      rate.trim().parse::<u32>().map_err(|e| ProbeError::InvalidOutput(format!("sample_rate {rate:?}: {e}")))?;

    report.audio = Some(AudioStream { sample_format, sample_rate });
    extend_lowercase(&mut report.tags, stream_tags);
  }

  if let Some(format) = probe.format {
    extend_lowercase(&mut report.tags, format.tags);
  }

  Ok(report)
}

fn extend_lowercase(into: &mut HashMap<String, String>, tags: HashMap<String, String>) {
  into.extend(tags.into_iter().map(|(k, v)| (k.to_lowercase(), v)));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn picks_first_stream_with_sample_info() {
    let json = r#"{
      "programs": [],
      "streams": [
        { "codec_type": "video" },
        { "codec_type": "audio", "sample_fmt": "s32", "sample_rate": "96000" }
      ],
      "format": { "tags": { "ARTIST": "Gregorian", "ALBUM": "The Dark Side" } }
    }"#;

    let report = parse_probe_output(json).unwrap();

    assert_eq!(report.audio, Some(AudioStream { sample_format: "s32".into(), sample_rate: 96_000 }));
    assert_eq!(report.artist(), Some("Gregorian"));
    assert_eq!(report.album(), Some("The Dark Side"));
  }

  #[test]
  fn image_only_file_has_no_audio() {
    let json = r#"{ "streams": [ { "codec_type": "video" } ], "format": {} }"#;
    let report = parse_probe_output(json).unwrap();
    assert!(report.audio.is_none());
    assert!(report.tags.is_empty());
  }

  #[test]
  fn stream_tags_are_used_when_container_has_none() {
    let json = r#"{
      "streams": [ { "sample_fmt": "fltp", "sample_rate": "44100", "tags": { "ARTIST": "A", "ALBUM": "B" } } ]
    }"#;
    let report = parse_probe_output(json).unwrap();
    assert_eq!(report.artist(), Some("A"));
  }

  #[test]
  fn garbage_is_an_error() {
    assert!(matches!(parse_probe_output("not json"), Err(ProbeError::InvalidOutput(_))));
    let bad_rate = r#"{ "streams": [ { "sample_fmt": "s16", "sample_rate": "fast" } ] }"#;
    assert!(matches!(parse_probe_output(bad_rate), Err(ProbeError::InvalidOutput(_))));
  }
}
