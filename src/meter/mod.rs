pub mod channel;
pub mod classifier;
pub mod debug;
pub mod error;
pub mod grid;
pub mod mapping;
pub mod normalize;
pub mod selector;
pub mod significance;

pub use channel::NeedleChannel;
pub use classifier::{classify, classify_with_debug, DigitClassifier, MeterConfig, Reading};
pub use debug::{CellScore, DebugRecord};
pub use error::MeterError;
pub use mapping::GridMapping;
