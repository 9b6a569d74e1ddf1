use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Output, Stdio};

use tokio::process::Command;

/// Ejecuta una herramienta externa (ffmpeg, rclone...) y espera a que termine.
///
/// Sin stdin; stdout y stderr quedan capturados en el `Output`.
pub async fn run_tool<I, S>(program: &Path, args: I) -> io::Result<Output>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  Command::new(program)
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .output()
    .await
}

pub fn stderr_text(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_program_is_an_io_error() {
    let err = run_tool(Path::new("/nonexistent/cantus-tool"), ["--version"]).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
  }
}
