//! Reads analog dial meters by finding which grid cell the needle colour dominates.

pub mod dial_gen;
pub mod logging;
pub mod meter;

pub use meter::{
    classify, classify_with_debug, CellScore, DebugRecord, DigitClassifier, GridMapping,
    MeterConfig, MeterError, NeedleChannel, Reading,
};
