//! Unit conversion utilities
//!
//! Gerber files are written either in millimeters or in inches. Geometry is
//! always held in millimeters internally and converted back to the file unit
//! on output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement unit of a Gerber file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Millimeters (`%MOMM*%`)
    #[default]
    #[serde(alias = "mm")]
    Millimeters,
    /// Inches (`%MOIN*%`)
    #[serde(alias = "in", alias = "inch")]
    Inches,
}

impl Unit {
    /// Convert a value written in this unit to millimeters
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Millimeters => value,
            Self::Inches => value * MM_PER_INCH,
        }
    }

    /// Convert a value in millimeters to this unit
    pub fn from_mm(self, value_mm: f64) -> f64 {
        match self {
            Self::Millimeters => value_mm,
            Self::Inches => value_mm / MM_PER_INCH,
        }
    }

    /// The `%MO` directive that declares this unit
    pub fn mode_directive(self) -> &'static str {
        match self {
            Self::Millimeters => "%MOMM*%",
            Self::Inches => "%MOIN*%",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeters => write!(f, "Millimeters"),
            Self::Inches => write!(f, "Inches"),
        }
    }
}
