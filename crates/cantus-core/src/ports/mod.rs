pub mod archive;
pub mod cover;
pub mod media;
pub mod progress;
pub mod remote;

pub use archive::{ArchiveExpander, ExpandError};
pub use cover::{CoverError, CoverLookup};
pub use media::{MediaProbe, MediaTranscoder, ProbeError, TranscodeError};
pub use progress::ProgressNotifier;
pub use remote::{RemoteError, RemoteStore};
