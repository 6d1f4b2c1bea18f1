use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::meter::error::MeterError;

/// Smallest dimensions `>=` the input that are exact multiples of `grid_size`.
pub fn normalized_size(width: u32, height: u32, grid_size: u32) -> (u32, u32) {
    (width.div_ceil(grid_size) * grid_size, height.div_ceil(grid_size) * grid_size)
}

/// Fails with `InvalidImage` when the source has no pixels.
pub fn ensure_area(source: &DynamicImage) -> Result<(), MeterError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(MeterError::InvalidImage { width, height });
    }
    Ok(())
}

/// Scales an owned RGBA copy of `source` up so both sides divide by `grid_size`.
///
/// The returned buffer never aliases the caller's image and always starts at
/// origin `(0, 0)`. Inputs that already fit are copied without resampling.
pub fn normalize(source: &DynamicImage, grid_size: u32) -> Result<RgbaImage, MeterError> {
    ensure_area(source)?;
    let (width, height) = source.dimensions();
    let (target_w, target_h) = normalized_size(width, height, grid_size);

    let rgba = source.to_rgba8();
    if (target_w, target_h) == (width, height) {
        return Ok(rgba);
    }

    tracing::trace!(width, height, target_w, target_h, "rescaling dial image");
    Ok(imageops::resize(&rgba, target_w, target_h, FilterType::Triangle))
}
