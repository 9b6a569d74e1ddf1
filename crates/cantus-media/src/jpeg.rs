use std::io::Cursor;

use image::ImageError;
use image::codecs::jpeg::JpegEncoder;

/// Re-encodes any supported image (png, progressive jpeg, webp...) as a
/// baseline RGB JPEG, the only kind some players can show.
pub fn encode_baseline_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
  let decoded = image::load_from_memory(bytes)?;
  let rgb = decoded.to_rgb8();

  let mut out = Cursor::new(Vec::new());
  let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
  encoder.encode_image(&rgb)?;

  Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{ImageFormat, Rgba, RgbaImage};

  #[test]
  fn png_with_alpha_becomes_rgb_jpeg() {
    let png = {
      let img = RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 128]));
      let mut buf = Cursor::new(Vec::new());
      img.write_to(&mut buf, ImageFormat::Png).unwrap();
      buf.into_inner()
    };

    let jpeg = encode_baseline_jpeg(&png, 90).unwrap();

    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 8));
  }

  #[test]
  fn undecodable_bytes_are_rejected() {
    assert!(encode_baseline_jpeg(b"<html>404</html>", 90).is_err());
  }
}
