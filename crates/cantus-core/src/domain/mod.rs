pub mod archive;
pub mod media;
pub mod paths;
pub mod remote_entry;
pub mod tag_keys;
pub mod track;

pub use archive::{Archive, ArchiveFailure, ArchiveOutcome, ArchiveReport, ArchiveState, BatchSummary, CleanupIssue};
pub use media::{AudioStream, ProbeReport, TargetFormat, TrackAction};
pub use paths::IntakePaths;
pub use remote_entry::RemoteEntry;
pub use track::Track;
