//! Outline-to-region conversion
//!
//! Runs the whole pipeline for one file: parse, stitch, normalize winding,
//! emit. Each call owns its own parser state.

use crate::emitter::RegionEmitter;
use crate::parser::{GerberParser, ParseWarning};
use crate::stitch::PathStitcher;
use crate::winding;
use gerberfill_core::{FormatSpec, Result, Unit};
use gerberfill_settings::ConversionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of a conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Input file, when converting from disk
    pub input: Option<PathBuf>,
    /// Output file, when converting to disk
    pub output: Option<PathBuf>,
    /// Raw strokes found in the input. A stroke starts at the first draw after
    /// a pen-up, so pen-ups that are never followed by a draw are not counted
    /// and the total can be lower than the number of `D02`/`D03` commands.
    pub num_input_paths: usize,
    /// Closed polygons written
    pub num_closed_polygons: usize,
    /// Coordinate format of input and output
    pub format: FormatSpec,
    /// File unit of input and output
    pub unit: Unit,
    /// Parameters the conversion ran with
    pub params: ConversionConfig,
    /// Skipped lines (strict mode only)
    pub warnings: Vec<ParseWarning>,
}

impl ConversionSummary {
    /// Serialize the summary as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Converted text plus its summary
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub gerber: String,
    pub summary: ConversionSummary,
}

/// Converts outline drawings into filled regions
#[derive(Debug, Clone, Default)]
pub struct RegionConverter {
    config: ConversionConfig,
}

impl RegionConverter {
    /// Create a converter with the given parameters
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Conversion parameters
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert Gerber text in memory.
    pub fn convert_str(&self, input: &str) -> Result<ConversionOutput> {
        self.config.validate()?;

        let outcome = GerberParser::new(&self.config).parse(input)?;
        let num_input_paths = outcome.paths.len();

        let stitcher = PathStitcher::new(self.config.snap_tol_mm);
        let mut polygons = stitcher.stitch(outcome.paths);
        winding::normalize_all(&mut polygons);

        let emitter = RegionEmitter::new(outcome.format, outcome.state.unit, &self.config);
        let gerber = emitter.emit(&outcome.header, outcome.state.aperture, &polygons);
        debug!(
            "Converted {} paths into {} polygons",
            num_input_paths,
            polygons.len()
        );

        Ok(ConversionOutput {
            gerber,
            summary: ConversionSummary {
                input: None,
                output: None,
                num_input_paths,
                num_closed_polygons: polygons.len(),
                format: outcome.format,
                unit: outcome.state.unit,
                params: self.config.clone(),
                warnings: outcome.warnings,
            },
        })
    }

    /// Convert a file on disk.
    ///
    /// Invalid UTF-8 in the input is replaced rather than rejected. The
    /// output directory is created if missing and the output is written
    /// once, after all geometry is final.
    pub fn convert_file(
        &self,
        input: impl AsRef<std::path::Path>,
        output: impl AsRef<std::path::Path>,
    ) -> Result<ConversionSummary> {
        let input = input.as_ref();
        let output = output.as_ref();

        let bytes = fs::read(input)?;
        let text = String::from_utf8_lossy(&bytes);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&*text);

        let ConversionOutput { gerber, mut summary } = self.convert_str(text)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, gerber)?;

        info!(
            "Converted {} -> {}: {} paths, {} polygons ({}, {})",
            input.display(),
            output.display(),
            summary.num_input_paths,
            summary.num_closed_polygons,
            summary.format,
            summary.unit
        );

        summary.input = Some(input.to_path_buf());
        summary.output = Some(output.to_path_buf());
        Ok(summary)
    }
}
