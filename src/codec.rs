//! Conversion of image files into planes and back.
use std::fs;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ColorType, ImageFormat, ImageReader};
use log::debug;

use crate::{CodecError, GrayPlane, OutputPlane, RgbPlane};

/// Width of planes produced by [decode_canonical].
pub const CANONICAL_WIDTH: u32 = 320;
/// Height of planes produced by [decode_canonical].
pub const CANONICAL_HEIGHT: u32 = 240;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Returns `true` if extension of the file name is one of
/// supported image formats (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Decodes image file into RGB plane of the canonical size.
///
/// Images of other sizes are resized with nearest-neighbour resampling.
pub fn decode_canonical(path: &Path) -> Result<RgbPlane, CodecError> {
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(CodecError::Decode)?;
    debug!(
        "Image {:?} is decoded ({}x{}, {:?})",
        path,
        image.width(),
        image.height(),
        image.color()
    );

    let mut rgb = image.to_rgb8();
    if rgb.dimensions() != (CANONICAL_WIDTH, CANONICAL_HEIGHT) {
        debug!(
            "Resize from {}x{} into {}x{}",
            rgb.width(),
            rgb.height(),
            CANONICAL_WIDTH,
            CANONICAL_HEIGHT
        );
        rgb = imageops::resize(&rgb, CANONICAL_WIDTH, CANONICAL_HEIGHT, FilterType::Nearest);
    }
    let pixels: Vec<[u8; 3]> = rgb.pixels().map(|pixel| pixel.0).collect();
    Ok(RgbPlane::from_vec(CANONICAL_WIDTH, CANONICAL_HEIGHT, pixels)?)
}

/// Converts RGB plane into grayscale with `0.299 R + 0.587 G + 0.114 B`.
pub fn rgb_to_gray(src: &RgbPlane) -> GrayPlane {
    let mut dst = GrayPlane::new(src.width(), src.height());
    for (d, &[r, g, b]) in dst.buffer_mut().iter_mut().zip(src.buffer()) {
        *d = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) as u8;
    }
    dst
}

/// Loads image file as grayscale plane of the canonical size.
pub fn load_grayscale(path: &Path) -> Result<GrayPlane, CodecError> {
    decode_canonical(path).map(|rgb| rgb_to_gray(&rgb))
}

/// Saves plane as single-channel PNG file.
/// Parent directory is created if it doesn't exist.
pub fn save_png(path: &Path, plane: &OutputPlane) -> Result<(), CodecError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    image::save_buffer_with_format(
        path,
        plane.buffer(),
        plane.width(),
        plane.height(),
        ColorType::L8,
        ImageFormat::Png,
    )
    .map_err(CodecError::Encode)
}
