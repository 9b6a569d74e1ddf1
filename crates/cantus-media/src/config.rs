use cantus_config::{ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[media]` section of cantus.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MediaConfig {
  pub ffprobe_bin: PathBuf,
  pub ffmpeg_bin: PathBuf,

  /// Look covers up on MusicBrainz when a track has no embedded picture.
  pub cover_lookup: bool,

  /// MusicBrainz requires an identifying User-Agent.
  pub user_agent: String,

  /// Quality (1-100) of downloaded folder.jpg files.
  pub jpeg_quality: u8,
}

impl Default for MediaConfig {
  fn default() -> Self {
    MediaConfig {
      ffprobe_bin: PathBuf::from("ffprobe"),
      ffmpeg_bin: PathBuf::from("ffmpeg"),
      cover_lookup: true,
      user_agent: format!("cantus/{} ( library intake )", env!("CARGO_PKG_VERSION")),
      jpeg_quality: 90,
    }
  }
}

impl MediaConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_or_default("media")?;
    backend.save_section("media", &cfg)?;
    Ok(cfg)
  }
}
