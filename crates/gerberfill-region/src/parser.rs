//! Photoplotter state machine
//!
//! Interprets classified statements in order, tracking the modal state of a
//! photoplotter, and records every pen-down stroke as a [`Path`] in
//! millimeters. Header directives are captured for passthrough.

use crate::arc::{ArcDirection, ArcFlattener};
use crate::codec;
use crate::command::{
    tokenize, CoordinateTokens, GerberCommand, InterpolationMode, OperationCode, QuadrantMode,
    Statement,
};
use crate::path::{Path, Point};
use gerberfill_core::{Axis, CoordinateNotation, FormatSpec, GerberError, Result, Unit};
use gerberfill_settings::{ConversionConfig, ParseMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// A line that was skipped or only partly honored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line number
    pub line_number: u32,
    /// Statement text
    pub text: String,
    /// Why it was skipped
    pub reason: String,
}

/// Modal photoplotter state
///
/// Positions are in millimeters. Each axis of the current point stays
/// undefined until a statement first sets it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotterState {
    /// Current X in millimeters
    pub current_x: Option<f64>,
    /// Current Y in millimeters
    pub current_y: Option<f64>,
    /// Interpolation mode (G01, G02, G03)
    pub interpolation: InterpolationMode,
    /// Quadrant mode (G74, G75)
    pub quadrant: QuadrantMode,
    /// Operation code of the last coordinate statement. Statements without
    /// a D code always draw.
    pub operation: OperationCode,
    /// Selected aperture
    pub aperture: Option<u32>,
    /// File unit
    pub unit: Unit,
    /// Whether the unit came from the file rather than the default
    pub unit_declared: bool,
    /// Coordinate format, once known
    pub format: Option<FormatSpec>,
}

impl PlotterState {
    /// Create a state with the given default unit
    pub fn new(unit: Unit) -> Self {
        Self {
            current_x: None,
            current_y: None,
            interpolation: InterpolationMode::Linear,
            quadrant: QuadrantMode::Multi,
            operation: OperationCode::Draw,
            aperture: None,
            unit,
            unit_declared: false,
            format: None,
        }
    }

    /// Current point when both axes are known
    pub fn position(&self) -> Option<Point> {
        Some(Point::new(self.current_x?, self.current_y?))
    }

    fn set_position(&mut self, x: Option<f64>, y: Option<f64>) {
        self.current_x = x;
        self.current_y = y;
    }
}

impl Default for PlotterState {
    fn default() -> Self {
        Self::new(Unit::Millimeters)
    }
}

/// Header lines captured for passthrough
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCapture {
    /// The `%FS` block as written
    pub format_line: Option<String>,
    /// The `%MO` block as written
    pub unit_line: Option<String>,
    /// `%AD` and `%AM` blocks as written, in order
    pub aperture_lines: Vec<String>,
    /// Defined aperture codes, in order
    pub aperture_codes: Vec<u32>,
}

impl HeaderCapture {
    fn push_aperture_line(&mut self, text: &str) {
        if self.aperture_lines.last().map(String::as_str) != Some(text) {
            self.aperture_lines.push(text.to_string());
        }
    }
}

/// Everything the parser extracted from a file
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Raw strokes, one per pen-up command
    pub paths: Vec<Path>,
    /// Captured header lines
    pub header: HeaderCapture,
    /// Final modal state
    pub state: PlotterState,
    /// Effective coordinate format
    pub format: FormatSpec,
    /// Skipped lines (strict mode only)
    pub warnings: Vec<ParseWarning>,
}

enum Flow {
    Continue,
    Halt,
}

/// Gerber parser with modal state tracking
pub struct GerberParser {
    state: PlotterState,
    header: HeaderCapture,
    paths: Vec<Path>,
    current: Option<usize>,
    warnings: Vec<ParseWarning>,
    parse_mode: ParseMode,
    default_format: Option<FormatSpec>,
    flattener: ArcFlattener,
}

impl GerberParser {
    /// Create a parser for one file
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            state: PlotterState::new(config.default_unit),
            header: HeaderCapture::default(),
            paths: Vec::new(),
            current: None,
            warnings: Vec::new(),
            parse_mode: config.parse_mode,
            default_format: config.default_format,
            flattener: ArcFlattener::from_config(config),
        }
    }

    /// Parse a whole file
    ///
    /// Fails only when the coordinate format is missing or invalid.
    pub fn parse(mut self, input: &str) -> Result<ParseOutcome> {
        let statements = tokenize(input);
        let last_line = input.lines().count() as u32;

        for statement in &statements {
            if let Flow::Halt = self.apply(statement)? {
                debug!("Program end at line {}", statement.line_number);
                break;
            }
        }

        let format = self.resolve_format(last_line.max(1))?;
        debug!(
            "Parsed {} statements into {} paths",
            statements.len(),
            self.paths.len()
        );

        Ok(ParseOutcome {
            paths: self.paths,
            header: self.header,
            state: self.state,
            format,
            warnings: self.warnings,
        })
    }

    /// Apply one statement to the state
    fn apply(&mut self, statement: &Statement) -> Result<Flow> {
        match &statement.command {
            GerberCommand::FormatSpec(body) => self.set_format(statement, body)?,
            GerberCommand::Unit(unit) => self.set_unit(statement, *unit, true),
            GerberCommand::LegacyUnit(unit) => self.set_unit(statement, *unit, false),
            GerberCommand::ApertureDefinition(code) => {
                self.header.push_aperture_line(&statement.text);
                if !self.header.aperture_codes.contains(code) {
                    self.header.aperture_codes.push(*code);
                }
            }
            GerberCommand::ApertureMacro => self.header.push_aperture_line(&statement.text),
            GerberCommand::Interpolation(mode) => self.state.interpolation = *mode,
            GerberCommand::Quadrant(mode) => {
                self.state.quadrant = *mode;
                if *mode == QuadrantMode::Single {
                    self.skip(statement, "single-quadrant arcs are flattened as multi-quadrant");
                }
            }
            GerberCommand::SelectAperture(code) => self.state.aperture = Some(*code),
            GerberCommand::Operation { mode, coords, op } => {
                if let Some(mode) = mode {
                    self.state.interpolation = *mode;
                }
                let op = match op {
                    Some(op) => *op,
                    None => {
                        if self.state.operation != OperationCode::Draw {
                            self.skip(statement, "coordinates without a D code are drawn");
                        }
                        OperationCode::Draw
                    }
                };
                self.state.operation = op;
                self.operate(statement, coords, op)?;
            }
            GerberCommand::Comment => {}
            GerberCommand::EndOfFile => return Ok(Flow::Halt),
            GerberCommand::Unknown => self.skip(statement, "unrecognized command"),
        }
        Ok(Flow::Continue)
    }

    fn set_format(&mut self, statement: &Statement, body: &str) -> Result<()> {
        let format =
            FormatSpec::parse_body(body).map_err(|reason| GerberError::InvalidFormatSpec {
                line_number: statement.line_number,
                line: statement.text.clone(),
                reason,
            })?;

        match self.state.format {
            None => {
                debug!("Format specification: {}", format);
                self.state.format = Some(format);
                self.header.format_line = Some(statement.text.clone());
            }
            Some(existing) if existing != format => {
                warn!(
                    "Ignoring redefined format {} at line {}, keeping {}",
                    format, statement.line_number, existing
                );
                self.skip(statement, "format specification redefined");
            }
            Some(_) => {}
        }
        Ok(())
    }

    fn set_unit(&mut self, statement: &Statement, unit: Unit, directive: bool) {
        if self.state.unit_declared {
            if self.state.unit != unit {
                warn!(
                    "Ignoring unit change to {} at line {}",
                    unit, statement.line_number
                );
                self.skip(statement, "unit redefined");
            }
            return;
        }
        debug!("Units: {}", unit);
        self.state.unit = unit;
        self.state.unit_declared = true;
        if directive {
            self.header.unit_line = Some(statement.text.clone());
        }
    }

    /// The format to decode with, falling back to the configured default
    fn resolve_format(&self, line_number: u32) -> Result<FormatSpec> {
        self.state
            .format
            .or(self.default_format)
            .ok_or_else(|| GerberError::MissingFormatSpec { line_number }.into())
    }

    /// Execute a D01/D02/D03 with its coordinates
    fn operate(
        &mut self,
        statement: &Statement,
        coords: &CoordinateTokens,
        op: OperationCode,
    ) -> Result<()> {
        let format = self.resolve_format(statement.line_number)?;
        let (x, y) = match self.resolve_target(&format, coords) {
            Ok(target) => target,
            Err(err) => {
                self.skip(statement, &err.to_string());
                return Ok(());
            }
        };

        match op {
            OperationCode::Move | OperationCode::Flash => {
                self.state.set_position(x, y);
                self.current = None;
            }
            OperationCode::Draw => self.draw(statement, &format, coords, x, y),
        }
        Ok(())
    }

    fn draw(
        &mut self,
        statement: &Statement,
        format: &FormatSpec,
        coords: &CoordinateTokens,
        x: Option<f64>,
        y: Option<f64>,
    ) {
        let start = self.state.position();
        let end = match (x, y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        };

        let index = match self.current {
            Some(index) => index,
            None => {
                let Some(seed) = start.or(end) else {
                    self.state.set_position(x, y);
                    self.skip(statement, "draw before the current point is known");
                    return;
                };
                self.paths.push(Path::starting_at(seed));
                self.paths.len() - 1
            }
        };
        self.current = Some(index);
        self.state.set_position(x, y);

        let Some(end) = end else {
            return;
        };

        let direction = match self.state.interpolation {
            InterpolationMode::Linear => None,
            InterpolationMode::ClockwiseArc => Some(ArcDirection::Clockwise),
            InterpolationMode::CounterclockwiseArc => Some(ArcDirection::CounterClockwise),
        };

        match (direction, start) {
            (Some(direction), Some(start)) if coords.has_offset() => {
                match self.arc_center(format, coords, start) {
                    Ok(center) => {
                        let points = self.flattener.flatten(start, end, center, direction);
                        self.paths[index].extend(points);
                    }
                    Err(err) => {
                        self.skip(statement, &err.to_string());
                        self.paths[index].push(end);
                    }
                }
            }
            (Some(_), _) => {
                self.skip(statement, "arc without center offset drawn as a straight line");
                self.paths[index].push(end);
            }
            (None, _) => self.paths[index].push(end),
        }
    }

    /// Arc center from the I/J offsets; a missing offset counts as zero
    fn arc_center(
        &self,
        format: &FormatSpec,
        coords: &CoordinateTokens,
        start: Point,
    ) -> std::result::Result<Point, GerberError> {
        let unit = self.state.unit;
        let i = codec::decode(coords.i.as_deref(), format, Axis::X, Some(0.0), unit)?;
        let j = codec::decode(coords.j.as_deref(), format, Axis::Y, Some(0.0), unit)?;
        Ok(Point::new(
            start.x + i.unwrap_or(0.0),
            start.y + j.unwrap_or(0.0),
        ))
    }

    /// Resolve the X/Y target of a statement in millimeters.
    ///
    /// Omitted axes keep their current value. In incremental notation the
    /// decoded values are offsets from the current point.
    fn resolve_target(
        &self,
        format: &FormatSpec,
        coords: &CoordinateTokens,
    ) -> std::result::Result<(Option<f64>, Option<f64>), GerberError> {
        let unit = self.state.unit;
        let (cx, cy) = (self.state.current_x, self.state.current_y);

        match format.notation {
            CoordinateNotation::Absolute => Ok((
                codec::decode(coords.x.as_deref(), format, Axis::X, cx, unit)?,
                codec::decode(coords.y.as_deref(), format, Axis::Y, cy, unit)?,
            )),
            CoordinateNotation::Incremental => {
                let dx = codec::decode(coords.x.as_deref(), format, Axis::X, Some(0.0), unit)?;
                let dy = codec::decode(coords.y.as_deref(), format, Axis::Y, Some(0.0), unit)?;
                Ok((
                    Some(cx.unwrap_or(0.0) + dx.unwrap_or(0.0)),
                    Some(cy.unwrap_or(0.0) + dy.unwrap_or(0.0)),
                ))
            }
        }
    }

    /// Record a skipped or degraded statement
    fn skip(&mut self, statement: &Statement, reason: &str) {
        match self.parse_mode {
            ParseMode::Lenient => {
                trace!(
                    "Skipping line {} ({}): {}",
                    statement.line_number,
                    statement.text,
                    reason
                );
            }
            ParseMode::Strict => self.warnings.push(ParseWarning {
                line_number: statement.line_number,
                text: statement.text.clone(),
                reason: reason.to_string(),
            }),
        }
    }
}
