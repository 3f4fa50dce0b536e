//! # GerberFill Region
//!
//! Turns stroked RS-274X outlines into filled region layers.
//!
//! ## Pipeline
//!
//! - **Codec**: fixed-point coordinate tokens to millimeters and back
//! - **Command**: tokenizer and statement classifier
//! - **Parser**: photoplotter state machine producing raw strokes
//! - **Arc**: G02/G03 flattening under chord and angle limits
//! - **Stitch**: endpoint snapping and nearest-pair merging into polygons
//! - **Winding**: signed area and clockwise normalization
//! - **Emitter**: G36/G37 region output in the source format and unit
//! - **Converter**: the whole pipeline for one file

pub mod arc;
pub mod codec;
pub mod command;
pub mod converter;
pub mod emitter;
pub mod parser;
pub mod path;
pub mod stitch;
pub mod winding;

// Re-export commonly used items
pub use arc::{ArcDirection, ArcFlattener};
pub use command::{GerberCommand, InterpolationMode, OperationCode, QuadrantMode, Statement};
pub use converter::{ConversionOutput, ConversionSummary, RegionConverter};
pub use emitter::RegionEmitter;
pub use parser::{GerberParser, HeaderCapture, ParseOutcome, ParseWarning, PlotterState};
pub use path::{ClosedPolygon, Path, Point};
pub use stitch::PathStitcher;
