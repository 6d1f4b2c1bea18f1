//! Diagnostics collected while scanning: per-cell scores and a grid overlay.

use std::collections::HashSet;
use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, Blend};
use serde::Serialize;

use crate::meter::channel::NeedleChannel;
use crate::meter::error::MeterError;
use crate::meter::grid::{GridCell, GridLayout};

/// Score of one mapped cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellScore {
    pub significance: f64,
    pub x_step: u32,
    pub y_step: u32,
    pub digit: u8,
}

/// Scores sorted by descending significance plus the annotated image.
#[derive(Debug, Clone)]
pub struct DebugRecord {
    pub channel: NeedleChannel,
    pub scores: Vec<CellScore>,
    pub overlay: RgbaImage,
}

#[derive(Serialize)]
struct ScoresDump<'a> {
    channel: NeedleChannel,
    scores: &'a [CellScore],
}

impl DebugRecord {
    /// Pretty JSON `{"channel": ..., "scores": [...]}`.
    pub fn scores_json(&self) -> Result<String, MeterError> {
        let dump = ScoresDump {
            channel: self.channel,
            scores: &self.scores,
        };
        Ok(serde_json::to_string_pretty(&dump)?)
    }

    pub fn save_overlay(&self, path: &Path) -> Result<(), MeterError> {
        self.overlay.save(path)?;
        Ok(())
    }
}

/// Collects scores and draws grid lines while a scan is in progress.
pub(crate) struct DebugRecorder {
    channel: NeedleChannel,
    scores: Vec<CellScore>,
    canvas: Blend<RgbaImage>,
    stroke: Rgba<u8>,
    drawn_x: HashSet<u32>,
    drawn_y: HashSet<u32>,
}

impl DebugRecorder {
    pub(crate) fn new(
        normalized: &RgbaImage,
        channel: NeedleChannel,
        stroke_color: [u8; 3],
        stroke_opacity: f32,
    ) -> Self {
        let alpha = (stroke_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let [r, g, b] = stroke_color;
        Self {
            channel,
            scores: Vec::new(),
            canvas: Blend(normalized.clone()),
            stroke: Rgba([r, g, b, alpha]),
            drawn_x: HashSet::new(),
            drawn_y: HashSet::new(),
        }
    }

    /// Draws every boundary of the layout once, left-to-right and top-to-bottom.
    pub(crate) fn draw_grid(&mut self, layout: &GridLayout) {
        let (xs, ys) = layout.boundaries();
        for y in ys {
            self.horizontal(y);
        }
        for x in xs {
            self.vertical(x);
        }
    }

    pub(crate) fn record(&mut self, cell: &GridCell, significance: f64) {
        self.scores.push(CellScore {
            significance,
            x_step: cell.x_step,
            y_step: cell.y_step,
            digit: cell.digit,
        });
    }

    pub(crate) fn finish(mut self) -> DebugRecord {
        // sort_by is stable: equal scores keep scan order.
        self.scores.sort_by(|a, b| b.significance.total_cmp(&a.significance));
        DebugRecord {
            channel: self.channel,
            scores: self.scores,
            overlay: self.canvas.0,
        }
    }

    fn horizontal(&mut self, y: u32) {
        let (width, height) = self.canvas.0.dimensions();
        let y = y.min(height.saturating_sub(1));
        if !self.drawn_y.insert(y) {
            return;
        }
        let end = width.saturating_sub(1) as f32;
        draw_line_segment_mut(&mut self.canvas, (0.0, y as f32), (end, y as f32), self.stroke);
    }

    fn vertical(&mut self, x: u32) {
        let (width, height) = self.canvas.0.dimensions();
        let x = x.min(width.saturating_sub(1));
        if !self.drawn_x.insert(x) {
            return;
        }
        let end = height.saturating_sub(1) as f32;
        draw_line_segment_mut(&mut self.canvas, (x as f32, 0.0), (x as f32, end), self.stroke);
    }
}
