use std::collections::HashMap;

/// Claves normalizadas en minúsculas. Deben matchear lo que reporta ffprobe.
pub const KEYS_ALBUM: &[&str] = &["album", "talb", "iprd", "\u{a9}alb"];
pub const KEYS_ARTIST_TRACK: &[&str] = &["artist", "tpe1", "iart", "\u{a9}art", "auth"];
// FFmpeg a veces normaliza esto a "album_artist"
pub const KEYS_ARTIST_ALBUM: &[&str] = &["album_artist", "album artist", "albumartist", "tpe2", "aart"];

/// Busca el primer valor no vacío asociado a una de las claves proporcionadas.
///
/// Se asume que las claves de `tags` están en minúsculas.
pub fn find_tag_value<'a>(tags: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
  keys.iter().filter_map(|key| tags.get(*key).map(|v| v.trim())).find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skips_blank_values() {
    let tags = HashMap::from([("artist".to_string(), "  ".to_string()), ("tpe1".to_string(), "Gregorian".to_string())]);
    assert_eq!(find_tag_value(&tags, KEYS_ARTIST_TRACK), Some("Gregorian"));
    assert_eq!(find_tag_value(&tags, KEYS_ALBUM), None);
  }
}
