use crate::meter::error::MeterError;
use crate::meter::grid::GridCell;

/// The cell that won a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Winner {
    pub x_step: u32,
    pub y_step: u32,
    pub digit: u8,
    pub significance: f64,
}

/// Running maximum over scored cells.
///
/// Equal scores replace the current best, so the later cell in scan order wins
/// ties. `finish` consumes the selector and yields the decided cell.
#[derive(Debug, Default)]
pub struct Selector {
    best: Option<Winner>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, cell: &GridCell, significance: f64) {
        let current = self.best.map_or(0.0, |w| w.significance);
        if significance >= current {
            self.best = Some(Winner {
                x_step: cell.x_step,
                y_step: cell.y_step,
                digit: cell.digit,
                significance,
            });
        }
    }

    pub fn finish(self) -> Result<Winner, MeterError> {
        self.best.ok_or(MeterError::NoScoredCells)
    }
}
