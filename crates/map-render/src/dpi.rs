//! Print-resolution detection from image file bytes.
//!
//! Label font sizes are specified in typographic points, so the pipeline
//! needs the base image's DPI. PNG carries it in the `pHYs` chunk (pixels
//! per metre), JPEG in the JFIF APP0 density fields. Both readers are pure
//! over the raw bytes; callers fall back to [`DEFAULT_DPI`].

/// Assumed DPI when the base image carries no resolution metadata.
pub const DEFAULT_DPI: f64 = 96.0;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const INCHES_PER_METRE: f64 = 0.0254;

/// Detect embedded print resolution, if any.
pub fn detect_dpi(bytes: &[u8]) -> Option<f64> {
    png_phys_dpi(bytes).or_else(|| jfif_dpi(bytes))
}

/// Read DPI from a PNG `pHYs` chunk (unit must be the metre).
fn png_phys_dpi(bytes: &[u8]) -> Option<f64> {
    if bytes.len() < 8 || bytes[..8] != PNG_SIGNATURE {
        return None;
    }

    let mut offset = 8;
    while offset + 8 <= bytes.len() {
        let length = u32::from_be_bytes(bytes[offset..offset + 4].try_into().ok()?) as usize;
        let chunk_type = &bytes[offset + 4..offset + 8];

        if chunk_type == b"pHYs" {
            // 4 bytes x pixels/unit, 4 bytes y pixels/unit, 1 byte unit
            let data_start = offset + 8;
            if length < 9 || data_start + 9 > bytes.len() {
                return None;
            }
            let ppu_x =
                u32::from_be_bytes(bytes[data_start..data_start + 4].try_into().ok()?);
            let unit = bytes[data_start + 8];
            if unit == 1 && ppu_x > 0 {
                return Some(ppu_x as f64 * INCHES_PER_METRE);
            }
            return None;
        }
        if chunk_type == b"IDAT" || chunk_type == b"IEND" {
            // pHYs must precede the image data
            return None;
        }

        // length + type + data + crc
        offset += 12 + length;
    }
    None
}

/// Read DPI from the JFIF APP0 density fields.
fn jfif_dpi(bytes: &[u8]) -> Option<f64> {
    if bytes.len() < 4 || bytes[0..2] != [0xFF, 0xD8] {
        return None;
    }

    let mut offset = 2;
    while offset + 4 <= bytes.len() {
        if bytes[offset] != 0xFF {
            return None;
        }
        let marker = bytes[offset + 1];

        // RST/SOI/EOI markers are standalone, no length field
        if (0xD0..=0xD9).contains(&marker) {
            offset += 2;
            continue;
        }

        let length = u16::from_be_bytes([bytes[offset + 2], bytes[offset + 3]]) as usize;
        if length < 2 || offset + 2 + length > bytes.len() {
            return None;
        }

        if marker == 0xE0 {
            let segment = &bytes[offset + 4..offset + 2 + length];
            // identifier(5) version(2) units(1) Xdensity(2) Ydensity(2)
            if segment.len() >= 12 && &segment[0..5] == b"JFIF\0" {
                let unit = segment[7];
                let x_density = u16::from_be_bytes([segment[8], segment[9]]) as f64;
                return match unit {
                    1 if x_density > 0.0 => Some(x_density),
                    2 if x_density > 0.0 => Some(x_density * 2.54),
                    _ => None,
                };
            }
        }
        if marker == 0xDA {
            // start of scan; no metadata past this point
            return None;
        }

        offset += 2 + length;
    }
    None
}
