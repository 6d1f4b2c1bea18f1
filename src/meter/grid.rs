//! Splits a normalized dial image into the cells that take part in scoring.

use crate::meter::mapping::GridMapping;

/// Pixel geometry of a `grid_size x grid_size` partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub grid_size: u32,
    pub step_width: u32,
    pub step_height: u32,
}

/// One mapped cell of the grid, with its pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub x_step: u32,
    pub y_step: u32,
    pub digit: u8,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GridLayout {
    /// Layout for an image whose sides are already multiples of `grid_size`.
    pub fn new(width: u32, height: u32, grid_size: u32) -> Self {
        Self {
            grid_size,
            step_width: width / grid_size,
            step_height: height / grid_size,
        }
    }

    /// Mapped cells in scan order: `y_step` outer, `x_step` inner.
    pub fn cells<'a>(&self, mapping: &'a GridMapping) -> impl Iterator<Item = GridCell> + 'a {
        let layout = *self;
        (1..=layout.grid_size).flat_map(move |y_step| {
            (1..=layout.grid_size).filter_map(move |x_step| {
                let digit = mapping.digit_at(x_step, y_step)?;
                Some(GridCell {
                    x_step,
                    y_step,
                    digit,
                    x: (x_step - 1) * layout.step_width,
                    y: (y_step - 1) * layout.step_height,
                    width: layout.step_width,
                    height: layout.step_height,
                })
            })
        })
    }

    /// Distinct vertical and horizontal cell boundaries, including both outer edges.
    pub fn boundaries(&self) -> (Vec<u32>, Vec<u32>) {
        let xs = (0..=self.grid_size).map(|i| i * self.step_width).collect();
        let ys = (0..=self.grid_size).map(|i| i * self.step_height).collect();
        (xs, ys)
    }
}
