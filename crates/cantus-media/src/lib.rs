pub mod config;
pub mod ffmpeg;
pub mod ffprobe;
pub mod jpeg;
#[cfg(feature = "libav")]
pub mod libav;
pub mod musicbrainz;

pub use config::MediaConfig;
pub use ffmpeg::FfmpegTranscoder;
pub use ffprobe::FfprobeProbe;
#[cfg(feature = "libav")]
pub use libav::LibavProbe;
pub use musicbrainz::MusicBrainzCoverLookup;
