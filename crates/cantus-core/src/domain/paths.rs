use std::path::PathBuf;

/// Directorios locales que usa una ejecución.
///
/// - `receive_dir`: archivos recién descargados del remoto.
/// - `staging_dir`: pistas expandidas que aún no se han colocado.
/// - `dest_dir`: árbol final de la biblioteca.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakePaths {
  pub receive_dir: PathBuf,
  pub staging_dir: PathBuf,
  pub dest_dir: PathBuf,
}
