use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::meter::error::MeterError;

/// Colour channel used as the needle signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedleChannel {
    #[default]
    Red,
    Green,
    Blue,
}

impl NeedleChannel {
    pub const ALL: [NeedleChannel; 3] = [
        NeedleChannel::Red,
        NeedleChannel::Green,
        NeedleChannel::Blue,
    ];

    /// Picks this channel's component out of an `(r, g, b)` triple.
    pub fn select<T: Copy>(self, rgb: (T, T, T)) -> T {
        match self {
            NeedleChannel::Red => rgb.0,
            NeedleChannel::Green => rgb.1,
            NeedleChannel::Blue => rgb.2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NeedleChannel::Red => "red",
            NeedleChannel::Green => "green",
            NeedleChannel::Blue => "blue",
        }
    }
}

impl fmt::Display for NeedleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NeedleChannel {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(NeedleChannel::Red),
            "g" | "green" => Ok(NeedleChannel::Green),
            "b" | "blue" => Ok(NeedleChannel::Blue),
            _ => Err(MeterError::InvalidChannel(s.to_string())),
        }
    }
}
