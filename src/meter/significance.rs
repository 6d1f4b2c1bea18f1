use image::{GenericImageView, RgbaImage};

use crate::meter::channel::NeedleChannel;
use crate::meter::grid::GridCell;

/// Summed channel intensities over a block of pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSums {
    pub red: u64,
    pub green: u64,
    pub blue: u64,
}

impl ChannelSums {
    /// Sums every pixel inside `cell`. Alpha is ignored.
    pub fn over_cell(image: &RgbaImage, cell: &GridCell) -> Self {
        let view = image.view(cell.x, cell.y, cell.width, cell.height);
        let mut sums = Self::default();
        for (_, _, pixel) in view.pixels() {
            sums.red += pixel[0] as u64;
            sums.green += pixel[1] as u64;
            sums.blue += pixel[2] as u64;
        }
        sums
    }

    pub fn total(&self) -> u64 {
        self.red + self.green + self.blue
    }
}

/// Share of `channel` in the cell's total intensity, in `[0, 1]`.
///
/// An all-black cell scores `0.0`.
pub fn significance(sums: ChannelSums, channel: NeedleChannel) -> f64 {
    let total = sums.total();
    if total == 0 {
        return 0.0;
    }
    channel.select((sums.red, sums.green, sums.blue)) as f64 / total as f64
}
