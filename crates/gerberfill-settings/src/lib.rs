//! GerberFill Settings Crate
//!
//! Holds the per-call conversion parameters, their validation, and their
//! persistence as JSON or TOML files.

pub mod config;

pub use config::{ConversionConfig, ParseMode, RegionLayout};
