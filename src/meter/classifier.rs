//! Digit classification for a single dial image.
//!
//! The scan normalizes the image to a multiple of the grid size, walks the
//! mapped cells in row-major order, scores each by how strongly the needle
//! channel dominates, and reports the digit of the best cell.

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::meter::channel::NeedleChannel;
use crate::meter::debug::{DebugRecord, DebugRecorder};
use crate::meter::error::MeterError;
use crate::meter::grid::GridLayout;
use crate::meter::mapping::GridMapping;
use crate::meter::normalize::{ensure_area, normalize};
use crate::meter::selector::{Selector, Winner};
use crate::meter::significance::{significance, ChannelSums};

const STROKE_COLOR: [u8; 3] = [255, 255, 255];
const STROKE_OPACITY: f32 = 0.7;

/// Tunables for dial classification.
#[derive(Debug, Clone)]
pub struct MeterConfig {
    pub needle_channel: NeedleChannel,
    pub mapping: GridMapping,
    /// Colour of the grid lines in the debug overlay.
    pub stroke_color: [u8; 3],
    pub stroke_opacity: f32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            needle_channel: NeedleChannel::default(),
            mapping: GridMapping::reference(),
            stroke_color: STROKE_COLOR,
            stroke_opacity: STROKE_OPACITY,
        }
    }
}

/// Outcome of one classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub digit: u8,
    pub x_step: u32,
    pub y_step: u32,
    pub significance: f64,
}

impl From<Winner> for Reading {
    fn from(w: Winner) -> Self {
        Self {
            digit: w.digit,
            x_step: w.x_step,
            y_step: w.y_step,
            significance: w.significance,
        }
    }
}

/// Classifies dial images against a fixed grid mapping.
#[derive(Debug, Clone, Default)]
pub struct DigitClassifier {
    config: MeterConfig,
}

impl DigitClassifier {
    pub fn new(config: MeterConfig) -> Self {
        Self { config }
    }

    /// Reference mapping with the given needle channel.
    pub fn with_channel(channel: NeedleChannel) -> Self {
        Self::new(MeterConfig {
            needle_channel: channel,
            ..MeterConfig::default()
        })
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    pub fn classify(&self, image: &DynamicImage) -> Result<u8, MeterError> {
        Ok(self.read(image)?.digit)
    }

    /// Like `classify`, but also reports the winning cell and its score.
    pub fn read(&self, image: &DynamicImage) -> Result<Reading, MeterError> {
        let normalized = self.prepare(image)?;
        self.scan(&normalized, None).map(Reading::from)
    }

    /// Classifies and returns the per-cell scores and grid overlay from the same scan.
    pub fn classify_with_debug(
        &self,
        image: &DynamicImage,
    ) -> Result<(u8, DebugRecord), MeterError> {
        let (reading, record) = self.read_with_debug(image)?;
        Ok((reading.digit, record))
    }

    pub fn read_with_debug(
        &self,
        image: &DynamicImage,
    ) -> Result<(Reading, DebugRecord), MeterError> {
        let normalized = self.prepare(image)?;
        let mut recorder = DebugRecorder::new(
            &normalized,
            self.config.needle_channel,
            self.config.stroke_color,
            self.config.stroke_opacity,
        );
        let winner = self.scan(&normalized, Some(&mut recorder))?;
        Ok((winner.into(), recorder.finish()))
    }

    /// Decodes `path` and classifies it.
    pub fn classify_path(&self, path: &Path) -> Result<u8, MeterError> {
        let image = image::open(path).map_err(|source| MeterError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        self.classify(&image)
    }

    fn prepare(&self, image: &DynamicImage) -> Result<RgbaImage, MeterError> {
        ensure_area(image)?;
        let grid_size = self.config.mapping.grid_size();
        if grid_size == 0 {
            return Err(MeterError::NoScoredCells);
        }
        normalize(image, grid_size)
    }

    fn scan(
        &self,
        normalized: &RgbaImage,
        mut recorder: Option<&mut DebugRecorder>,
    ) -> Result<Winner, MeterError> {
        let mapping = &self.config.mapping;
        let channel = self.config.needle_channel;
        let layout = GridLayout::new(normalized.width(), normalized.height(), mapping.grid_size());

        if let Some(rec) = recorder.as_deref_mut() {
            rec.draw_grid(&layout);
        }

        let mut selector = Selector::new();
        for cell in layout.cells(mapping) {
            let score = significance(ChannelSums::over_cell(normalized, &cell), channel);
            tracing::trace!(x_step = cell.x_step, y_step = cell.y_step, score, "scored cell");
            if let Some(rec) = recorder.as_deref_mut() {
                rec.record(&cell, score);
            }
            selector.observe(&cell, score);
        }

        let winner = selector.finish()?;
        tracing::debug!(
            digit = winner.digit,
            x_step = winner.x_step,
            y_step = winner.y_step,
            significance = winner.significance,
            %channel,
            "classified dial"
        );
        Ok(winner)
    }
}

/// Classifies `image` with the reference mapping.
pub fn classify(image: &DynamicImage, channel: NeedleChannel) -> Result<u8, MeterError> {
    DigitClassifier::with_channel(channel).classify(image)
}

/// Classifies `image` with the reference mapping, keeping diagnostics.
pub fn classify_with_debug(
    image: &DynamicImage,
    channel: NeedleChannel,
) -> Result<(u8, DebugRecord), MeterError> {
    DigitClassifier::with_channel(channel).classify_with_debug(image)
}
