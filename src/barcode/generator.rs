//! Code 128 symbol rendering.

use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};

use super::BarcodeError;

/// Longest payload we agree to encode.
///
/// A lock payload is 38 characters; anything much longer would no longer
/// fit at two pixels per module in the default width.
pub const MAX_PAYLOAD_LEN: usize = 80;

/// barcoders selects the starting character set with a marker character.
const CHARSET_B: char = 'Ɓ';

/// Blank modules kept on each side of the symbol.
const QUIET_ZONE_MODULES: u32 = 10;

/// Size of a rendered symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeConfig {
    /// Target width in pixels (default: 1200)
    pub width: u32,
    /// Bar height in pixels (default: 140)
    pub height: u32,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 140,
        }
    }
}

/// Renders `payload` as a Code 128 symbol.
///
/// Each module is drawn as an integer number of pixels, as wide as fits in
/// `config.width` after the quiet zones. The symbol is centred on a white
/// canvas of exactly `config.width` x `config.height`, unless the payload
/// needs more than that at one pixel per module, in which case the canvas
/// grows to fit.
pub fn generate_code128(payload: &str, config: &BarcodeConfig) -> Result<GrayImage, BarcodeError> {
    validate_payload(payload)?;

    let modules = Code128::new(format!("{}{}", CHARSET_B, payload))
        .map_err(|e| BarcodeError::Encoding(e.to_string()))?
        .encode();

    let symbol_modules = modules.len() as u32;
    let module_width = (config.width / (symbol_modules + 2 * QUIET_ZONE_MODULES)).max(1);
    let width = config
        .width
        .max((symbol_modules + 2 * QUIET_ZONE_MODULES) * module_width);
    let height = config.height.max(1);
    let offset = (width - symbol_modules * module_width) / 2;

    let mut image = GrayImage::from_pixel(width, height, Luma([255]));

    for (i, module) in modules.iter().enumerate() {
        if *module == 0 {
            continue;
        }
        let left = offset + i as u32 * module_width;
        for x in left..left + module_width {
            for y in 0..height {
                image.put_pixel(x, y, Luma([0]));
            }
        }
    }

    Ok(image)
}

/// Code 128 set B covers printable ASCII; we don't switch sets mid-symbol.
fn validate_payload(payload: &str) -> Result<(), BarcodeError> {
    if let Some(c) = payload.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(BarcodeError::Unsupported(c));
    }

    let len = payload.chars().count();
    if len == 0 {
        return Err(BarcodeError::Encoding("empty payload".to_string()));
    }
    if len > MAX_PAYLOAD_LEN {
        return Err(BarcodeError::TooLong {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }

    Ok(())
}
