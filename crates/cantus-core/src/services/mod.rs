pub mod cover_art;
pub mod pipeline;
pub mod run_lock;
pub mod track_processor;

pub use cover_art::{COVER_FILE_NAME, CoverArtResolver, CoverOutcome};
pub use pipeline::IntakePipeline;
pub use run_lock::{RunGuard, RunLock};
pub use track_processor::{TrackError, TrackProcessor};
