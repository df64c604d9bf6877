//! Code 128 reading.

use std::collections::HashMap;

use image::DynamicImage;
use rxing::BarcodeFormat;

use super::BarcodeError;

/// Reads a Code 128 symbol from an image and returns its text.
///
/// The whole picture is scanned, so captions or other content around the
/// symbol are fine as long as one clean run of bars is present.
pub fn read_code128(image: &DynamicImage) -> Result<String, BarcodeError> {
    // Convert to grayscale for detection
    let luma = image.to_luma8();
    let (width, height) = luma.dimensions();

    // `detect_in_luma` hands width and height on in the wrong order, so go
    // straight to the hinted variant.
    let result = rxing::helpers::detect_in_luma_with_hints(
        luma.into_raw(),
        width,
        height,
        Some(BarcodeFormat::CODE_128),
        &mut HashMap::new(),
    )
    .map_err(|e| BarcodeError::Decoding(e.to_string()))?;

    Ok(result.getText().to_string())
}
