use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;

/// Re-encodes a report image (EagleView serves JPEG) as PNG and returns it base64 encoded,
/// ready for a `data:image/png;base64,` URI.
pub fn png_base64(bytes: &[u8]) -> Result<String, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;

    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, ImageFormat::Png)?;

    Ok(general_purpose::STANDARD.encode(png.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn sample_jpeg() -> Vec<u8> {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_jpeg_becomes_png() {
        let encoded = png_base64(&sample_jpeg()).unwrap();
        let png = general_purpose::STANDARD.decode(encoded).unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));

        let round = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((round.width(), round.height()), (8, 8));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(png_base64(b"<html>expired link</html>").is_err());
        assert!(png_base64(&[]).is_err());
    }
}
