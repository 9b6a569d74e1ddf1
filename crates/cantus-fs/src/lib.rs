pub mod archive;
pub mod io;
pub mod process;

pub use archive::ZipExpander;
pub use io::atomic_write_str;
pub use process::{run_tool, stderr_text};
