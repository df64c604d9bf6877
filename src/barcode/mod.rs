//! Code 128 barcode generation and reading for lock payloads.
//!
//! The workflows only talk to the [`BarcodeCodec`] trait, so the symbology
//! can be swapped without touching them. [`Code128Codec`] is the codec used
//! by the CLI.

mod generator;
mod reader;

use image::DynamicImage;
use thiserror::Error;

pub use generator::{generate_code128, BarcodeConfig, MAX_PAYLOAD_LEN};
pub use reader::read_code128;

/// Errors that can occur during barcode operations.
#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("Unsupported character {0:?} in barcode payload")]
    Unsupported(char),

    #[error("Payload too long for barcode: {len} chars, max {max}")]
    TooLong { len: usize, max: usize },

    #[error("Barcode generation failed: {0}")]
    Encoding(String),

    #[error("No readable barcode found in image: {0}")]
    Decoding(String),
}

/// Turns a payload string into a barcode picture and back.
pub trait BarcodeCodec {
    /// Renders `payload` as a barcode symbol.
    fn encode(&self, payload: &str) -> Result<DynamicImage, BarcodeError>;

    /// Finds a barcode somewhere in `image` and returns its text.
    ///
    /// Content outside the symbol (captions, borders) must not prevent
    /// reading.
    fn decode(&self, image: &DynamicImage) -> Result<String, BarcodeError>;
}

/// Code 128 codec with a fixed symbol size.
#[derive(Debug, Clone, Default)]
pub struct Code128Codec {
    config: BarcodeConfig,
}

impl Code128Codec {
    pub fn new(config: BarcodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BarcodeConfig {
        &self.config
    }
}

impl BarcodeCodec for Code128Codec {
    fn encode(&self, payload: &str) -> Result<DynamicImage, BarcodeError> {
        generate_code128(payload, &self.config).map(DynamicImage::ImageLuma8)
    }

    fn decode(&self, image: &DynamicImage) -> Result<String, BarcodeError> {
        read_code128(image)
    }
}
