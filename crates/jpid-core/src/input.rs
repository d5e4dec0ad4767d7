//! Inbound base64 image payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use tracing::debug;

use crate::error::InputError;

/// Marker separating a data URL header from its payload.
const DATA_URL_MARKER: &str = "base64,";

/// Decode a base64 image, optionally carrying a `data:…;base64,` prefix.
///
/// Checks run in order: presence, base64 validity, size limit, then
/// PNG/JPEG magic bytes.
pub fn decode_image_payload(payload: &str, max_bytes: usize) -> Result<Vec<u8>, InputError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(InputError::MissingImage);
    }

    let encoded = match payload.find(DATA_URL_MARKER) {
        Some(idx) => &payload[idx + DATA_URL_MARKER.len()..],
        None => payload,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| InputError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(InputError::EmptyImage);
    }

    if bytes.len() > max_bytes {
        return Err(InputError::TooLarge { limit: max_bytes });
    }

    let format = sniff_format(&bytes)?;
    debug!("Decoded {} byte {:?} image", bytes.len(), format);
    Ok(bytes)
}

/// PNG or JPEG, judged by magic bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, InputError> {
    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(format),
        _ => Err(InputError::UnsupportedFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_decode_png_and_jpeg() {
        let png = STANDARD.encode(PNG_MAGIC);
        assert_eq!(decode_image_payload(&png, 1024).unwrap(), PNG_MAGIC);

        let jpeg = format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_MAGIC));
        assert_eq!(decode_image_payload(&jpeg, 1024).unwrap(), JPEG_MAGIC);
    }

    #[test]
    fn test_missing_and_invalid() {
        assert_eq!(decode_image_payload("  ", 1024), Err(InputError::MissingImage));
        assert_eq!(decode_image_payload("not base64!!", 1024), Err(InputError::InvalidBase64));
    }

    #[test]
    fn test_size_checked_before_format() {
        let gif = STANDARD.encode(b"GIF89a-image-data");
        assert_eq!(
            decode_image_payload(&gif, 4),
            Err(InputError::TooLarge { limit: 4 })
        );
        assert_eq!(decode_image_payload(&gif, 1024), Err(InputError::UnsupportedFormat));
    }
}
