//! Sparse lookup from grid coordinates to dial digits.
//!
//! Coordinates are 1-based `(x_step, y_step)` pairs. The grid is square and its
//! size is the number of distinct `x_step` columns present in the table, so a
//! 10-column table partitions the dial into a 10x10 grid.

use std::collections::{BTreeMap, BTreeSet};

use crate::meter::error::MeterError;

/// Reference 10x10 layout for a dial numbered clockwise with 0 just right of
/// twelve o'clock. Entries are `(x_step, y_step, digit)`.
#[rustfmt::skip]
const REFERENCE_CELLS: &[(u32, u32, u8)] = &[
    (1, 4, 8), (1, 5, 7), (1, 6, 7), (1, 7, 6),
    (2, 2, 8), (2, 3, 8), (2, 4, 8), (2, 5, 7), (2, 6, 7), (2, 7, 6), (2, 8, 6), (2, 9, 6),
    (3, 1, 9), (3, 2, 8), (3, 3, 8), (3, 4, 8), (3, 8, 6), (3, 9, 6), (3, 10, 5),
    (4, 1, 9), (4, 2, 9), (4, 9, 5), (4, 10, 5),
    (5, 1, 9), (5, 2, 9), (5, 9, 5), (5, 10, 5),
    (6, 1, 0), (6, 2, 0), (6, 9, 4), (6, 10, 4),
    (7, 1, 0), (7, 2, 0), (7, 9, 4), (7, 10, 4),
    (8, 2, 1), (8, 3, 1), (8, 8, 3), (8, 9, 3),
    (9, 2, 1), (9, 3, 1), (9, 4, 1), (9, 5, 2), (9, 6, 2), (9, 7, 3), (9, 8, 3), (9, 9, 3),
    (10, 4, 2), (10, 5, 2), (10, 6, 2), (10, 7, 3),
];

const REFERENCE_GRID_SIZE: u32 = 10;
const MAX_DIGIT: u8 = 9;
// Keeps the dense slot table bounded for hand-written mapping files.
const MAX_GRID_SIZE: u32 = 4096;

/// Immutable grid-coordinate to digit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMapping {
    grid_size: u32,
    // Row-major by y_step, `grid_size * grid_size` slots.
    slots: Vec<Option<u8>>,
}

impl GridMapping {
    /// The 10x10 reference table.
    pub fn reference() -> Self {
        let grid_size = REFERENCE_GRID_SIZE;
        let side = grid_size as usize;
        let mut slots = vec![None; side * side];
        for &(x, y, digit) in REFERENCE_CELLS {
            slots[slot_index(grid_size, x, y)] = Some(digit);
        }
        Self { grid_size, slots }
    }

    /// A mapping with no cells. Classifying with it fails with `NoScoredCells`.
    pub fn empty() -> Self {
        Self {
            grid_size: 0,
            slots: Vec::new(),
        }
    }

    /// Builds a mapping from `((x_step, y_step), digit)` entries.
    ///
    /// The grid size is the number of distinct `x_step` values. Every coordinate
    /// must lie in `1..=grid_size` and every digit in `0..=9`. When a coordinate
    /// repeats, the last entry wins.
    pub fn from_entries<I>(entries: I) -> Result<Self, MeterError>
    where
        I: IntoIterator<Item = ((u32, u32), u8)>,
    {
        let entries: Vec<((u32, u32), u8)> = entries.into_iter().collect();
        let columns: BTreeSet<u32> = entries.iter().map(|((x, _), _)| *x).collect();
        let grid_size = columns.len() as u32;
        if grid_size == 0 {
            return Ok(Self::empty());
        }

        let slot_count = (grid_size as usize)
            .checked_mul(grid_size as usize)
            .filter(|_| grid_size <= MAX_GRID_SIZE)
            .ok_or_else(|| {
                MeterError::InvalidMapping(format!(
                    "{grid_size} columns exceeds the {MAX_GRID_SIZE}x{MAX_GRID_SIZE} grid limit"
                ))
            })?;

        let mut slots = vec![None; slot_count];
        for ((x, y), digit) in entries {
            if digit > MAX_DIGIT {
                return Err(MeterError::InvalidMapping(format!(
                    "digit {digit} at ({x}, {y}) is not in 0..=9"
                )));
            }
            if !(1..=grid_size).contains(&x) || !(1..=grid_size).contains(&y) {
                return Err(MeterError::InvalidMapping(format!(
                    "coordinate ({x}, {y}) is outside the {grid_size}x{grid_size} grid"
                )));
            }
            slots[slot_index(grid_size, x, y)] = Some(digit);
        }

        Ok(Self { grid_size, slots })
    }

    /// Parses a nested JSON table keyed by `x_step`, then `y_step`:
    /// `{"1": {"4": 8, "5": 7}, "2": {...}}`.
    pub fn from_json_str(json: &str) -> Result<Self, MeterError> {
        let table: BTreeMap<String, BTreeMap<String, u8>> = serde_json::from_str(json)?;
        let mut entries = Vec::new();
        for (x_key, column) in &table {
            let x = parse_step(x_key)?;
            for (y_key, &digit) in column {
                entries.push(((x, parse_step(y_key)?), digit));
            }
        }
        Self::from_entries(entries)
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Number of mapped cells.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_size == 0
    }

    /// Digit for a 1-based coordinate, `None` when the cell does not take part.
    pub fn digit_at(&self, x_step: u32, y_step: u32) -> Option<u8> {
        if x_step == 0 || y_step == 0 || x_step > self.grid_size || y_step > self.grid_size {
            return None;
        }
        self.slots[slot_index(self.grid_size, x_step, y_step)]
    }

    /// Coordinates mapped to `digit`, in row-major scan order.
    pub fn cells_for(&self, digit: u8) -> impl Iterator<Item = (u32, u32)> + '_ {
        let size = (self.grid_size as usize).max(1);
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, slot)| **slot == Some(digit))
            .map(move |(i, _)| ((i % size) as u32 + 1, (i / size) as u32 + 1))
    }

    /// Distinct digits present in the table.
    pub fn digits(&self) -> BTreeSet<u8> {
        self.slots.iter().flatten().copied().collect()
    }
}

impl Default for GridMapping {
    fn default() -> Self {
        Self::reference()
    }
}

// Row-major by y_step; caller guarantees both steps are in `1..=grid_size`.
fn slot_index(grid_size: u32, x_step: u32, y_step: u32) -> usize {
    (y_step as usize - 1) * grid_size as usize + (x_step as usize - 1)
}

fn parse_step(key: &str) -> Result<u32, MeterError> {
    key.trim().parse::<u32>().map_err(|_| {
        MeterError::InvalidMapping(format!("grid step {key:?} is not a positive integer"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_table_shape() {
        let m = GridMapping::reference();
        assert_eq!(m.grid_size(), 10);
        assert_eq!(m.len(), REFERENCE_CELLS.len());
        assert_eq!(m.digits(), (0..=9).collect::<BTreeSet<u8>>());
        assert_eq!(m.digit_at(1, 4), Some(8));
        assert_eq!(m.digit_at(10, 7), Some(3));
        assert_eq!(m.digit_at(5, 5), None);
        assert_eq!(m.digit_at(0, 1), None);
        assert_eq!(m.digit_at(11, 1), None);

        let entries = REFERENCE_CELLS.iter().map(|&(x, y, d)| ((x, y), d));
        let rebuilt = GridMapping::from_entries(entries).unwrap();
        assert_eq!(rebuilt, m);
    }

    #[test]
    fn cells_for_follows_scan_order() {
        let m = GridMapping::reference();
        let zero: Vec<_> = m.cells_for(0).collect();
        assert_eq!(zero, vec![(6, 1), (7, 1), (6, 2), (7, 2)]);
    }

    #[test]
    fn json_table_matches_entries() {
        let m = GridMapping::from_json_str(r#"{"1": {"1": 3, "2": 4}, "2": {"2": 5}}"#).unwrap();
        assert_eq!(m.grid_size(), 2);
        assert_eq!(m.digit_at(1, 1), Some(3));
        assert_eq!(m.digit_at(1, 2), Some(4));
        assert_eq!(m.digit_at(2, 1), None);
        assert_eq!(m.digit_at(2, 2), Some(5));
    }

    #[test]
    fn rejects_out_of_range_entries() {
        let err = GridMapping::from_entries([((1, 3), 1), ((2, 1), 2)]).unwrap_err();
        assert!(matches!(err, MeterError::InvalidMapping(_)));

        let err = GridMapping::from_entries([((1, 1), 10)]).unwrap_err();
        assert!(matches!(err, MeterError::InvalidMapping(_)));

        let err = GridMapping::from_json_str(r#"{"a": {"1": 1}}"#).unwrap_err();
        assert!(matches!(err, MeterError::InvalidMapping(_)));

        let err = GridMapping::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, MeterError::Json(_)));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let columns = (1..=65_536u32).map(|x| ((x, 1), 0));
        let err = GridMapping::from_entries(columns).unwrap_err();
        assert!(matches!(err, MeterError::InvalidMapping(ref msg) if msg.contains("65536")));

        let at_limit = (1..=MAX_GRID_SIZE).map(|x| ((x, 1), 0));
        let m = GridMapping::from_entries(at_limit).unwrap();
        assert_eq!(m.grid_size(), MAX_GRID_SIZE);
        assert_eq!(m.digit_at(MAX_GRID_SIZE, 1), Some(0));
        assert_eq!(m.digit_at(MAX_GRID_SIZE, MAX_GRID_SIZE), None);
    }

    #[test]
    fn empty_mapping_has_no_grid() {
        let m = GridMapping::from_entries(std::iter::empty()).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.grid_size(), 0);
        assert_eq!(m.len(), 0);
        assert_eq!(m.digit_at(1, 1), None);
    }
}
