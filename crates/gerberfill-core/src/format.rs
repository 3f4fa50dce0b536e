//! Coordinate format specification (`%FS`)
//!
//! A Gerber file declares once how its fixed-point coordinates are written:
//! which zeros are omitted, whether values are absolute or incremental, and
//! how many integer and decimal digits each axis carries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which zeros are omitted from coordinate tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSuppression {
    /// Leading zeros omitted; tokens are right-aligned
    #[default]
    Leading,
    /// Trailing zeros omitted; tokens are left-aligned
    Trailing,
}

/// Absolute or incremental coordinate notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateNotation {
    /// Coordinates are positions
    #[default]
    Absolute,
    /// Coordinates are offsets from the current point
    Incremental,
}

/// Digit layout of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisFormat {
    /// Number of integer digits
    pub integer: u8,
    /// Number of decimal digits
    pub decimal: u8,
}

impl AxisFormat {
    /// Create an axis layout
    pub const fn new(integer: u8, decimal: u8) -> Self {
        Self { integer, decimal }
    }

    /// Total number of digits in an unsuppressed token
    pub fn total(&self) -> usize {
        self.integer as usize + self.decimal as usize
    }

    /// Number of least-significant-digit units per file unit
    pub fn scale(&self) -> f64 {
        10f64.powi(self.decimal as i32)
    }
}

/// Which coordinate axis a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X and I
    X,
    /// Y and J
    Y,
}

/// Parsed `%FS` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Absolute or incremental
    pub notation: CoordinateNotation,
    /// Zero suppression mode
    pub zero_suppression: ZeroSuppression,
    /// X (and I) digit layout
    pub x: AxisFormat,
    /// Y (and J) digit layout
    pub y: AxisFormat,
}

impl Default for FormatSpec {
    /// `%FSLAX35Y35*%`, the layout the converter writes when it has to
    /// synthesize a header.
    fn default() -> Self {
        Self {
            notation: CoordinateNotation::Absolute,
            zero_suppression: ZeroSuppression::Leading,
            x: AxisFormat::new(3, 5),
            y: AxisFormat::new(3, 5),
        }
    }
}

impl FormatSpec {
    /// Digit layout for an axis
    pub fn axis(&self, axis: Axis) -> AxisFormat {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Parse the body of a format directive
    ///
    /// Accepts the text after `FS`, e.g. `LAX25Y25`. Letters other than the
    /// suppression, notation and axis fields (old `N`/`G`/`D`/`M` counts)
    /// are ignored. Both axes must be present with positive digit counts.
    pub fn parse_body(body: &str) -> Result<Self, String> {
        let chars: Vec<char> = body.chars().collect();
        let mut zero_suppression = ZeroSuppression::Leading;
        let mut notation = CoordinateNotation::Absolute;
        let mut x = None;
        let mut y = None;

        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                'L' => zero_suppression = ZeroSuppression::Leading,
                'T' => zero_suppression = ZeroSuppression::Trailing,
                'A' => notation = CoordinateNotation::Absolute,
                'I' => notation = CoordinateNotation::Incremental,
                c @ ('X' | 'Y') => {
                    let layout = Self::parse_axis(&chars[i + 1..])
                        .ok_or_else(|| format!("missing {} digit counts", c))?;
                    if c == 'X' {
                        x = Some(layout);
                    } else {
                        y = Some(layout);
                    }
                    i += 2;
                }
                _ => {}
            }
            i += 1;
        }

        let x = x.ok_or_else(|| "missing X digit counts".to_string())?;
        let y = y.ok_or_else(|| "missing Y digit counts".to_string())?;
        for (name, layout) in [("X", x), ("Y", y)] {
            if layout.integer == 0 || layout.decimal == 0 {
                return Err(format!(
                    "{} digit counts must be positive, got {}{}",
                    name, layout.integer, layout.decimal
                ));
            }
        }

        Ok(Self {
            notation,
            zero_suppression,
            x,
            y,
        })
    }

    fn parse_axis(rest: &[char]) -> Option<AxisFormat> {
        let integer = rest.first()?.to_digit(10)?;
        let decimal = rest.get(1)?.to_digit(10)?;
        Some(AxisFormat::new(integer as u8, decimal as u8))
    }

    /// The `%FS` directive for this format
    pub fn directive(&self) -> String {
        format!("%{}*%", self)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zeros = match self.zero_suppression {
            ZeroSuppression::Leading => 'L',
            ZeroSuppression::Trailing => 'T',
        };
        let notation = match self.notation {
            CoordinateNotation::Absolute => 'A',
            CoordinateNotation::Incremental => 'I',
        };
        write!(
            f,
            "FS{}{}X{}{}Y{}{}",
            zeros, notation, self.x.integer, self.x.decimal, self.y.integer, self.y.decimal
        )
    }
}
