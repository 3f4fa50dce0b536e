//! # GerberFill
//!
//! Converts RS-274X outline, edge-cut and glue layers that are drawn as
//! line and arc strokes into filled region (`G36`/`G37`) layers.
//!
//! ## Architecture
//!
//! GerberFill is organized as a workspace with multiple crates:
//!
//! 1. **gerberfill-core** - Units, format specification, error types
//! 2. **gerberfill-settings** - Conversion parameters and their persistence
//! 3. **gerberfill-region** - Coordinate codec, photoplotter interpreter,
//!    arc flattening, path stitching, winding normalization, region emission
//! 4. **gerberfill** - Facade crate that re-exports the above and sets up logging
//!
//! ## Example
//!
//! ```no_run
//! use gerberfill::{ConversionConfig, RegionConverter};
//!
//! let config = ConversionConfig {
//!     snap_tol_mm: 0.05,
//!     ..ConversionConfig::default()
//! };
//! let summary = RegionConverter::new(config)
//!     .convert_file("glue_top.gbr", "out/edit_glue_top.gbr")?;
//! println!("{}", summary.to_json()?);
//! # Ok::<(), gerberfill::Error>(())
//! ```

pub use gerberfill_core::{
    AxisFormat, CoordinateNotation, Error, FormatSpec, GerberError, Result, Unit, ZeroSuppression,
};

pub use gerberfill_settings::{ConversionConfig, ParseMode, RegionLayout};

pub use gerberfill_region::{
    codec, ArcFlattener, ClosedPolygon, ConversionSummary, GerberCommand, GerberParser,
    ParseOutcome, ParseWarning, Path, PathStitcher, PlotterState, Point, RegionConverter,
    RegionEmitter,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so converted output on stdout stays clean
/// - RUST_LOG environment variable support (defaults to `info`)
///
/// Calling this more than once is harmless; later calls keep the first
/// subscriber.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed, keeping it");
    }

    Ok(())
}
