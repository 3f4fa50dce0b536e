//! Conversion configuration
//!
//! Parameters are passed per call; nothing here is global. A configuration
//! can be stored next to a project as JSON or TOML and reloaded later.
//!
//! Configuration is organized into:
//! - Geometry tolerances (endpoint snapping, arc flattening)
//! - Parsing policy (lenient or strict)
//! - Output layout and defaults used when the input header is incomplete

use gerberfill_core::{Error, FormatSpec, GerberError, Result, Unit};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How unrecognized input lines are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip silently
    #[default]
    Lenient,
    /// Skip, but record every skipped line as a warning
    Strict,
}

impl std::fmt::Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// How polygons are grouped into region blocks on output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionLayout {
    /// One `G36`/`G37` block per polygon
    #[default]
    PerPolygon,
    /// A single `G36`/`G37` block holding every contour
    Single,
}

/// Parameters for one outline-to-region conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Endpoint snapping tolerance in millimeters
    pub snap_tol_mm: f64,
    /// Maximum chord length when flattening arcs, in millimeters
    pub max_chord_mm: f64,
    /// Maximum angular step when flattening arcs, in degrees
    pub max_angle_deg: f64,
    /// Lenient or strict handling of unrecognized lines
    pub parse_mode: ParseMode,
    /// Region block grouping on output
    pub region_layout: RegionLayout,
    /// Unit assumed when the file has no `%MO` directive
    pub default_unit: Unit,
    /// Diameter of the round aperture synthesized when the file defines none
    pub default_aperture_diameter_mm: f64,
    /// Format assumed when the file has no `%FS` directive. `None` makes a
    /// missing directive an error.
    pub default_format: Option<FormatSpec>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            snap_tol_mm: 0.02,
            max_chord_mm: 0.2,
            max_angle_deg: 5.0,
            parse_mode: ParseMode::Lenient,
            region_layout: RegionLayout::PerPolygon,
            default_unit: Unit::Millimeters,
            default_aperture_diameter_mm: 0.1,
            default_format: None,
        }
    }
}

impl ConversionConfig {
    /// Create a configuration with the three geometry tolerances set
    pub fn with_tolerances(snap_tol_mm: f64, max_chord_mm: f64, max_angle_deg: f64) -> Self {
        Self {
            snap_tol_mm,
            max_chord_mm,
            max_angle_deg,
            ..Self::default()
        }
    }

    /// Maximum angular step in radians
    pub fn max_angle_rad(&self) -> f64 {
        self.max_angle_deg.to_radians()
    }

    /// Load configuration from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        config.validate()?;
        tracing::debug!("Loaded conversion config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        Self::require_positive("snap_tol_mm", self.snap_tol_mm)?;
        Self::require_positive("max_chord_mm", self.max_chord_mm)?;
        Self::require_positive("max_angle_deg", self.max_angle_deg)?;
        Self::require_positive(
            "default_aperture_diameter_mm",
            self.default_aperture_diameter_mm,
        )?;

        if let Some(format) = &self.default_format {
            for (axis, layout) in [("x", format.x), ("y", format.y)] {
                if layout.integer == 0 || layout.decimal == 0 {
                    return Err(GerberError::InvalidParameter {
                        name: format!("default_format.{}", axis),
                        reason: "digit counts must be positive".to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    fn require_positive(name: &str, value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(GerberError::InvalidParameter {
                name: name.to_string(),
                reason: format!("must be a positive number, got {}", value),
            }
            .into());
        }
        Ok(())
    }
}
