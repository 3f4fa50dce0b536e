//! Region emitter
//!
//! Writes closed polygons back out as G36/G37 region blocks, reusing the
//! header, coordinate format and unit of the source file.

use crate::codec;
use crate::parser::HeaderCapture;
use crate::path::{ClosedPolygon, Point};
use gerberfill_core::{Axis, CoordinateNotation, FormatSpec, Unit};
use gerberfill_settings::{ConversionConfig, RegionLayout};

/// Aperture code used when the source file defines none
pub const DEFAULT_APERTURE_CODE: u32 = 10;

/// Serializes closed polygons as filled regions
#[derive(Debug, Clone)]
pub struct RegionEmitter {
    format: FormatSpec,
    unit: Unit,
    layout: RegionLayout,
    aperture_diameter_mm: f64,
}

/// Pen position in least-significant-digit counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Counts {
    x: i64,
    y: i64,
}

impl RegionEmitter {
    /// Create an emitter for the given coordinate format and unit
    pub fn new(format: FormatSpec, unit: Unit, config: &ConversionConfig) -> Self {
        Self {
            format,
            unit,
            layout: config.region_layout,
            aperture_diameter_mm: config.default_aperture_diameter_mm,
        }
    }

    /// Emit a complete file.
    ///
    /// `active_aperture` is the aperture selected while the outline was
    /// drawn. It is reused when the header defines it.
    pub fn emit(
        &self,
        header: &HeaderCapture,
        active_aperture: Option<u32>,
        polygons: &[ClosedPolygon],
    ) -> String {
        let mut out = String::new();
        self.write_header(&mut out, header);

        let (synthesized, code) = self.select_aperture(header, active_aperture);
        if let Some(line) = synthesized {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!("D{}*\n", code));
        out.push_str("G01*\n");

        let mut pen = Counts::default();
        match self.layout {
            RegionLayout::PerPolygon => {
                for polygon in polygons {
                    out.push_str("G36*\n");
                    self.write_contour(&mut out, polygon, &mut pen);
                    out.push_str("G37*\n");
                }
            }
            RegionLayout::Single => {
                if !polygons.is_empty() {
                    out.push_str("G36*\n");
                    for polygon in polygons {
                        self.write_contour(&mut out, polygon, &mut pen);
                    }
                    out.push_str("G37*\n");
                }
            }
        }

        out.push_str("M02*\n");
        tracing::debug!(
            "Emitted {} polygons as {:?} regions",
            polygons.len(),
            self.layout
        );
        out
    }

    fn write_header(&self, out: &mut String, header: &HeaderCapture) {
        let format_line = header
            .format_line
            .clone()
            .unwrap_or_else(|| self.format.directive());
        out.push_str(&format_line);
        out.push('\n');

        match &header.unit_line {
            // `%FSLAX25Y25*MOIN*%` carries both in one block
            Some(line) if *line == format_line => {}
            Some(line) => {
                out.push_str(line);
                out.push('\n');
            }
            None => {
                out.push_str(self.unit.mode_directive());
                out.push('\n');
            }
        }

        for line in &header.aperture_lines {
            if *line != format_line {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    /// Pick the aperture to select, synthesizing a round one if needed.
    fn select_aperture(
        &self,
        header: &HeaderCapture,
        active: Option<u32>,
    ) -> (Option<String>, u32) {
        if let Some(code) = active.filter(|code| header.aperture_codes.contains(code)) {
            return (None, code);
        }
        if let Some(&code) = header.aperture_codes.first() {
            return (None, code);
        }

        let diameter = self.unit.from_mm(self.aperture_diameter_mm);
        let line = match self.unit {
            Unit::Millimeters => format!("%ADD{}C,{:.3}*%", DEFAULT_APERTURE_CODE, diameter),
            Unit::Inches => format!("%ADD{}C,{:.4}*%", DEFAULT_APERTURE_CODE, diameter),
        };
        tracing::debug!("No apertures defined, synthesizing {}", line);
        (Some(line), DEFAULT_APERTURE_CODE)
    }

    /// Pen-up to the first vertex, then pen-down through the rest.
    ///
    /// Draws that quantize to the current pen position are skipped.
    fn write_contour(&self, out: &mut String, polygon: &ClosedPolygon, pen: &mut Counts) {
        let mut vertices = polygon.points().iter().map(|p| self.quantize(*p));
        let Some(first) = vertices.next() else {
            return;
        };
        out.push_str(&self.operation(first, *pen, 2));
        *pen = first;

        for vertex in vertices {
            if vertex == *pen {
                continue;
            }
            out.push_str(&self.operation(vertex, *pen, 1));
            *pen = vertex;
        }
    }

    fn quantize(&self, point: Point) -> Counts {
        Counts {
            x: codec::to_counts(point.x, self.format.axis(Axis::X), self.unit),
            y: codec::to_counts(point.y, self.format.axis(Axis::Y), self.unit),
        }
    }

    fn operation(&self, target: Counts, pen: Counts, d_code: u8) -> String {
        let (x, y) = match self.format.notation {
            CoordinateNotation::Absolute => (target.x, target.y),
            CoordinateNotation::Incremental => (target.x - pen.x, target.y - pen.y),
        };
        let zeros = self.format.zero_suppression;
        format!(
            "X{}Y{}D0{}*\n",
            codec::format_counts(x, self.format.axis(Axis::X), zeros),
            codec::format_counts(y, self.format.axis(Axis::Y), zeros),
            d_code
        )
    }
}
