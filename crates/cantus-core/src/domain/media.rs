use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::tag_keys::{KEYS_ALBUM, KEYS_ARTIST_ALBUM, KEYS_ARTIST_TRACK, find_tag_value};

/// Frecuencia máxima que aceptan los reproductores sin transcodificar.
pub const MAX_PLAIN_SAMPLE_RATE: u32 = 44_100;
/// Formato de muestra que obliga a transcodificar (24 bits se reporta como s32).
pub const WIDE_SAMPLE_FORMAT: &str = "s32";

/// Stream de audio tal y como lo describe el probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStream {
  /// Ej. "s16", "s32", "fltp".
  pub sample_format: String,
  /// Hz.
  pub sample_rate: u32,
}

impl AudioStream {
  /// Regla única de normalización.
  pub fn needs_transcode(&self) -> bool {
    self.sample_format == WIDE_SAMPLE_FORMAT || self.sample_rate > MAX_PLAIN_SAMPLE_RATE
  }
}

/// Resultado de inspeccionar un archivo.
///
/// `audio == None` significa que no hay stream de audio reconocible
/// (libretos, imágenes, etc.).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
  pub audio: Option<AudioStream>,
  /// Tags del contenedor con claves en minúsculas.
  pub tags: HashMap<String, String>,
}

impl ProbeReport {
  pub fn artist(&self) -> Option<&str> {
    find_tag_value(&self.tags, KEYS_ARTIST_ALBUM).or_else(|| find_tag_value(&self.tags, KEYS_ARTIST_TRACK))
  }

  pub fn album(&self) -> Option<&str> {
    find_tag_value(&self.tags, KEYS_ALBUM)
  }
}

/// Formato de salida cuando se transcodifica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFormat {
  pub codec: &'static str,
  pub sample_format: &'static str,
  pub sample_rate: u32,
}

impl TargetFormat {
  /// FLAC, 16 bits con signo, 44.1 kHz.
  pub const CD_QUALITY: TargetFormat = TargetFormat { codec: "flac", sample_format: "s16", sample_rate: 44_100 };
}

/// Qué hacer con una pista concreta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
  Transcode,
  Copy,
}

impl TrackAction {
  pub fn for_report(report: &ProbeReport) -> Self {
    match &report.audio {
      Some(stream) if stream.needs_transcode() => TrackAction::Transcode,
      _ => TrackAction::Copy,
    }
  }
}
