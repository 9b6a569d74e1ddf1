use std::path::{Path, PathBuf};

/// Una pista dentro del árbol de staging.
///
/// Solo guarda la ruta relativa: el destino es un espejo exacto del staging
/// sin el componente raíz, así que ambas rutas se derivan de la misma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
  relative: PathBuf,
}

impl Track {
  pub fn new(relative: impl Into<PathBuf>) -> Self {
    Self { relative: relative.into() }
  }

  /// Construye la pista a partir de una ruta absoluta dentro de `staging_root`.
  ///
  /// Devuelve `None` si la ruta no cuelga de esa raíz.
  pub fn from_staged(staging_root: &Path, staged: &Path) -> Option<Self> {
    staged.strip_prefix(staging_root).ok().map(Self::new)
  }

  pub fn relative(&self) -> &Path {
    &self.relative
  }

  pub fn source_path(&self, staging_root: &Path) -> PathBuf {
    staging_root.join(&self.relative)
  }

  pub fn destination_path(&self, dest_root: &Path) -> PathBuf {
    dest_root.join(&self.relative)
  }

  /// Directorio del álbum en destino (donde vive `folder.jpg`).
  pub fn album_dir(&self, dest_root: &Path) -> PathBuf {
    match self.relative.parent() {
      Some(parent) => dest_root.join(parent),
      None => dest_root.to_path_buf(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn destination_mirrors_staging_layout() {
    let track = Track::new("Artist/Album/01-song.flac");

    assert_eq!(track.source_path(Path::new("/staging")), PathBuf::from("/staging/Artist/Album/01-song.flac"));
    assert_eq!(track.destination_path(Path::new("/library")), PathBuf::from("/library/Artist/Album/01-song.flac"));
    assert_eq!(track.album_dir(Path::new("/library")), PathBuf::from("/library/Artist/Album"));
  }

  #[test]
  fn from_staged_strips_only_the_root() {
    let track = Track::from_staged(Path::new("/staging"), Path::new("/staging/Artist/Album/01-song.flac")).unwrap();
    assert_eq!(track.relative(), Path::new("Artist/Album/01-song.flac"));

    assert!(Track::from_staged(Path::new("/staging"), Path::new("/elsewhere/x.flac")).is_none());
  }

  #[test]
  fn loose_file_uses_destination_root_as_album_dir() {
    let track = Track::new("single.flac");
    assert_eq!(track.album_dir(Path::new("/library")), PathBuf::from("/library"));
  }
}
