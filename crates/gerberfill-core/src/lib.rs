//! # GerberFill Core
//!
//! Core types and utilities for GerberFill.
//! Provides the measurement unit, the coordinate format specification and
//! the error hierarchy shared by the other crates.

pub mod error;
pub mod format;
pub mod units;

pub use error::{Error, GerberError, Result};
pub use format::{Axis, AxisFormat, CoordinateNotation, FormatSpec, ZeroSuppression};
pub use units::{Unit, MM_PER_INCH};
