use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use crate::meter::MeterError;

/// Colours used when rendering a synthetic dial.
#[derive(Debug, Clone, Copy)]
pub struct DialStyle {
    pub background: Rgba<u8>,
    pub face: Rgba<u8>,
    pub marks: Rgba<u8>,
    pub needle: Rgba<u8>,
}

impl Default for DialStyle {
    fn default() -> Self {
        Self {
            background: Rgba([200, 200, 200, 255]),
            face: Rgba([245, 245, 245, 255]),
            marks: Rgba([25, 25, 25, 255]),
            needle: Rgba([220, 30, 30, 255]),
        }
    }
}

// Needle tip distance from the centre, as a fraction of the image size.
const TIP_RADIUS: f32 = 0.4;
const TIP_DISC: f32 = 0.035;
const HUB_DISC: f32 = 0.05;

/// Angle of a digit's sector centre in degrees, clockwise from twelve o'clock.
///
/// The dial is split into ten 36° sectors with 0 starting at twelve o'clock.
pub fn digit_angle(digit: u8) -> f32 {
    18.0 + 36.0 * (digit % 10) as f32
}

/// Renders a dial whose needle points at `digit`.
///
/// The face, ticks and hub are neutral greys so only the needle carries colour.
pub fn render_dial(digit: u8, width: u32, height: u32, style: &DialStyle) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, style.background);
    let (w, h) = (width as f32, height as f32);
    let (cx, cy) = (w * 0.5, h * 0.5);
    let short = w.min(h);
    let center = (cx.round() as i32, cy.round() as i32);

    draw_filled_circle_mut(&mut img, center, (short * 0.48) as i32, style.face);
    draw_hollow_circle_mut(&mut img, center, (short * 0.48) as i32, style.marks);

    // Sector boundary ticks.
    for i in 0..10 {
        let theta = (36.0 * i as f32).to_radians();
        let (s, c) = theta.sin_cos();
        let inner = (cx + s * w * 0.44, cy - c * h * 0.44);
        let outer = (cx + s * w * 0.47, cy - c * h * 0.47);
        draw_line_segment_mut(&mut img, inner, outer, style.marks);
    }

    let (s, c) = digit_angle(digit).to_radians().sin_cos();
    let tip = (cx + s * w * TIP_RADIUS, cy - c * h * TIP_RADIUS);
    draw_line_segment_mut(&mut img, (cx, cy), tip, style.needle);
    draw_filled_circle_mut(
        &mut img,
        (tip.0.round() as i32, tip.1.round() as i32),
        ((short * TIP_DISC) as i32).max(2),
        style.needle,
    );
    draw_filled_circle_mut(&mut img, center, ((short * HUB_DISC) as i32).max(1), style.marks);

    img
}

/// Writes a labeled corpus `out/<digit>/dial_<n>.png`, one image per digit and size.
pub fn write_corpus(
    out: &Path,
    sizes: &[(u32, u32)],
    style: &DialStyle,
) -> Result<Vec<PathBuf>, MeterError> {
    let mut written = Vec::new();
    for digit in 0..10u8 {
        let dir = out.join(digit.to_string());
        fs::create_dir_all(&dir)?;
        for (n, &(w, h)) in sizes.iter().enumerate() {
            let path = dir.join(format!("dial_{n}.png"));
            render_dial(digit, w, h, style).save(&path)?;
            written.push(path);
        }
    }
    tracing::info!(count = written.len(), dir = %out.display(), "wrote dial corpus");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sectors_are_evenly_spaced() {
        assert_eq!(digit_angle(0), 18.0);
        assert_eq!(digit_angle(5), 198.0);
        assert_eq!(digit_angle(9), 342.0);
    }

    #[test]
    fn needle_tip_uses_needle_colour() {
        let style = DialStyle::default();
        let img = render_dial(2, 200, 200, &style);
        // digit 2 sits at three o'clock
        assert_eq!(img.get_pixel(180, 100), &style.needle);
        assert_eq!(img.get_pixel(20, 100), &style.face);
    }
}
