//! Lock image composition and storage.
//!
//! A lock image is the barcode symbol on top with a few caption lines
//! underneath, on a white canvas twice the symbol height.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{imageops, DynamicImage, ImageFormat, Rgb, RgbImage};
use thiserror::Error;

/// Errors that can occur while writing a lock image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("We could not create the image file {}: it already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("We could not create the image file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("We could not write the image file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Caption text and colour drawn under the barcode.
#[derive(Debug, Clone)]
pub struct LockImageLayout {
    /// Caption lines, top to bottom; the last one sits just above the bottom edge
    pub captions: Vec<String>,
    /// Caption colour (default: red)
    pub caption_color: Rgb<u8>,
}

impl Default for LockImageLayout {
    fn default() -> Self {
        Self {
            captions: vec![
                "This barcode holds a combination that has been loaded into".to_string(),
                "a network controlled safe. Scanning it with picture-lock".to_string(),
                "(unlock or test) is the only way to open that safe again.".to_string(),
                "Keep it somewhere safe, or give it to someone you trust.".to_string(),
            ],
            caption_color: Rgb([255, 0, 0]),
        }
    }
}

/// Distance between caption baselines.
const LINE_SPACING: u32 = 20;
/// Distance from the bottom edge to the last baseline.
const BOTTOM_MARGIN: u32 = 10;
const LEFT_MARGIN: u32 = 5;
const GLYPH_SIZE: u32 = 8;

/// Builds the lock picture: symbol in the top half, captions in the bottom.
pub fn compose_lock_image(symbol: &DynamicImage, layout: &LockImageLayout) -> RgbImage {
    let symbol = symbol.to_rgb8();
    let (width, height) = (symbol.width(), symbol.height() * 2);

    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    imageops::replace(&mut canvas, &symbol, 0, 0);

    let lines = layout.captions.len() as u32;
    for (i, line) in layout.captions.iter().enumerate() {
        let from_bottom = BOTTOM_MARGIN + (lines - 1 - i as u32) * LINE_SPACING;
        if let Some(baseline) = height.checked_sub(from_bottom) {
            draw_text(&mut canvas, LEFT_MARGIN, baseline, line, layout.caption_color);
        }
    }

    canvas
}

/// Draws `text` with its baseline at `y`, clipping at the canvas edges.
fn draw_text(canvas: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let top = y.saturating_sub(GLYPH_SIZE);

    for (n, c) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(c) else {
            continue;
        };
        let left = x + n as u32 * GLYPH_SIZE;

        for (row, &bits) in glyph.iter().enumerate() {
            // Bit 0 is the leftmost pixel
            for col in 0..GLYPH_SIZE {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                let (px, py) = (left + col, top + row as u32);
                if px < canvas.width() && py < canvas.height() {
                    canvas.put_pixel(px, py, color);
                }
            }
        }
    }
}

/// Picks the output format from the file extension, JPEG if unknown.
pub fn output_format(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Jpeg)
}

/// Writes `image` to `path`, refusing to touch an existing file.
///
/// The file is created with `create_new`, so two invocations racing on the
/// same name cannot clobber each other. If encoding fails the half written
/// file is removed again.
pub fn save_exclusive(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => RenderError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => RenderError::Create {
                path: path.to_path_buf(),
                source,
            },
        })?;

    let format = output_format(path);
    log::debug!("Encoding {}x{} lock image as {:?}", image.width(), image.height(), format);

    if let Err(source) = write_image(image, file, format) {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Could not remove partial image {}: {}", path.display(), e);
        }
        return Err(RenderError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

fn write_image(image: &RgbImage, file: File, format: ImageFormat) -> Result<(), image::ImageError> {
    let mut writer = BufWriter::new(file);
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut writer, format)?;
    writer.flush()?;
    Ok(())
}
