//! Gerber command tokenizer
//!
//! Splits RS-274X text into statements and classifies each one as a
//! [`GerberCommand`]. Word statements end with `*`; extended statements are
//! wrapped in `%...%` and may span several lines (aperture macros do).

use gerberfill_core::Unit;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Interpolation mode (G01, G02, G03)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// G01
    #[default]
    Linear,
    /// G02
    ClockwiseArc,
    /// G03
    CounterclockwiseArc,
}

/// Arc quadrant mode (G74, G75)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuadrantMode {
    /// G74
    Single,
    /// G75
    #[default]
    Multi,
}

/// Operation code (D01, D02, D03)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationCode {
    /// D01, pen down
    #[default]
    Draw,
    /// D02, pen up
    Move,
    /// D03, flash
    Flash,
}

/// Raw coordinate fields of an operation, undecoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateTokens {
    pub x: Option<String>,
    pub y: Option<String>,
    pub i: Option<String>,
    pub j: Option<String>,
}

impl CoordinateTokens {
    /// Whether an arc center offset is present
    pub fn has_offset(&self) -> bool {
        self.i.is_some() || self.j.is_some()
    }
}

/// One classified statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GerberCommand {
    /// `%FS...*%`; holds the text after `FS`
    FormatSpec(String),
    /// `%MOIN*%` or `%MOMM*%`
    Unit(Unit),
    /// `G70` or `G71`
    LegacyUnit(Unit),
    /// `%ADDnn...*%`
    ApertureDefinition(u32),
    /// `%AM...%`
    ApertureMacro,
    /// `G01`, `G02`, `G03` on their own
    Interpolation(InterpolationMode),
    /// `G74`, `G75`
    Quadrant(QuadrantMode),
    /// `Dnn` with nn >= 10, optionally prefixed by `G54`
    SelectAperture(u32),
    /// Coordinate data with an optional mode prefix and operation code
    Operation {
        mode: Option<InterpolationMode>,
        coords: CoordinateTokens,
        op: Option<OperationCode>,
    },
    /// `G04` comment
    Comment,
    /// `M02`
    EndOfFile,
    /// Anything else
    Unknown,
}

/// A statement with its location and source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based line where the statement starts
    pub line_number: u32,
    /// Source text; for extended statements the whole `%...%` block
    pub text: String,
    pub command: GerberCommand,
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?:G0*(\d+))?(?:X([+-]?\d+))?(?:Y([+-]?\d+))?(?:I([+-]?\d+))?(?:J([+-]?\d+))?(?:D0*(\d+))?$",
        )
        .expect("invalid regex pattern")
    })
}

/// Classify a word statement (without its `*` terminator).
pub fn classify_word(statement: &str) -> GerberCommand {
    let stmt: String = statement.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(rest) = stmt.strip_prefix("G0").or_else(|| stmt.strip_prefix('G')) {
        if rest.starts_with('4') && !rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
            return GerberCommand::Comment;
        }
    }
    if matches!(stmt.as_str(), "M02" | "M2") {
        return GerberCommand::EndOfFile;
    }

    let Some(caps) = word_regex().captures(&stmt) else {
        return GerberCommand::Unknown;
    };
    let field = |idx: usize| caps.get(idx).map(|m| m.as_str().to_string());
    let g: Option<u32> = caps.get(1).and_then(|m| m.as_str().parse().ok());
    let d: Option<u32> = caps.get(6).and_then(|m| m.as_str().parse().ok());
    let coords = CoordinateTokens {
        x: field(2),
        y: field(3),
        i: field(4),
        j: field(5),
    };
    let has_coords = coords != CoordinateTokens::default();

    let mode = match g {
        Some(1) => Some(InterpolationMode::Linear),
        Some(2) => Some(InterpolationMode::ClockwiseArc),
        Some(3) => Some(InterpolationMode::CounterclockwiseArc),
        _ => None,
    };

    match (g, d, has_coords) {
        (Some(74), None, false) => GerberCommand::Quadrant(QuadrantMode::Single),
        (Some(75), None, false) => GerberCommand::Quadrant(QuadrantMode::Multi),
        (Some(70), None, false) => GerberCommand::LegacyUnit(Unit::Inches),
        (Some(71), None, false) => GerberCommand::LegacyUnit(Unit::Millimeters),
        (None | Some(54) | Some(55), Some(code), false) if code >= 10 => {
            GerberCommand::SelectAperture(code)
        }
        (_, Some(code), _) if !(1..=3).contains(&code) => GerberCommand::Unknown,
        (Some(_), _, _) if mode.is_none() => GerberCommand::Unknown,
        (_, None, false) => match mode {
            Some(mode) => GerberCommand::Interpolation(mode),
            None => GerberCommand::Unknown,
        },
        (_, d, _) => GerberCommand::Operation {
            mode,
            coords,
            op: d.map(|code| match code {
                1 => OperationCode::Draw,
                2 => OperationCode::Move,
                _ => OperationCode::Flash,
            }),
        },
    }
}

/// Classify one parameter of an extended statement (without `%` and `*`).
pub fn classify_extended(param: &str) -> GerberCommand {
    let param = param.trim();
    if let Some(body) = param.strip_prefix("FS") {
        return GerberCommand::FormatSpec(body.to_string());
    }
    match param {
        "MOIN" => return GerberCommand::Unit(Unit::Inches),
        "MOMM" => return GerberCommand::Unit(Unit::Millimeters),
        _ => {}
    }
    if let Some(rest) = param.strip_prefix("ADD") {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(code) = digits.parse() {
            return GerberCommand::ApertureDefinition(code);
        }
    }
    if param.starts_with("AM") {
        return GerberCommand::ApertureMacro;
    }
    GerberCommand::Unknown
}

/// Split input text into classified statements.
pub fn tokenize(input: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut block: Option<(u32, String)> = None;

    for (index, raw) in input.lines().enumerate() {
        let line_number = index as u32 + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((start, mut text)) = block.take() {
            text.push('\n');
            text.push_str(line);
            if line.ends_with('%') {
                push_extended(&mut statements, start, text);
            } else {
                block = Some((start, text));
            }
            continue;
        }

        if line.starts_with('%') {
            if line.len() > 1 && line.ends_with('%') {
                push_extended(&mut statements, line_number, line.to_string());
            } else {
                block = Some((line_number, line.to_string()));
            }
            continue;
        }

        for part in line.split('*') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            statements.push(Statement {
                line_number,
                text: format!("{}*", part),
                command: classify_word(part),
            });
        }
    }

    if let Some((start, text)) = block {
        statements.push(Statement {
            line_number: start,
            text,
            command: GerberCommand::Unknown,
        });
    }

    statements
}

fn push_extended(statements: &mut Vec<Statement>, line_number: u32, text: String) {
    let inner = text.trim_matches('%');
    if inner.starts_with("AM") {
        statements.push(Statement {
            line_number,
            command: GerberCommand::ApertureMacro,
            text,
        });
        return;
    }

    let params: Vec<&str> = inner
        .split('*')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if params.is_empty() {
        statements.push(Statement {
            line_number,
            command: GerberCommand::Unknown,
            text,
        });
        return;
    }
    for param in params {
        statements.push(Statement {
            line_number,
            text: text.clone(),
            command: classify_extended(param),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(x: &str, y: &str) -> CoordinateTokens {
        CoordinateTokens {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_mode_only() {
        assert_eq!(
            classify_word("G01"),
            GerberCommand::Interpolation(InterpolationMode::Linear)
        );
        assert_eq!(
            classify_word("G2"),
            GerberCommand::Interpolation(InterpolationMode::ClockwiseArc)
        );
        assert_eq!(
            classify_word("G75"),
            GerberCommand::Quadrant(QuadrantMode::Multi)
        );
        assert_eq!(
            classify_word("G74"),
            GerberCommand::Quadrant(QuadrantMode::Single)
        );
    }

    #[test]
    fn test_operation_with_mode_prefix() {
        assert_eq!(
            classify_word("G01X100Y-200D01"),
            GerberCommand::Operation {
                mode: Some(InterpolationMode::Linear),
                coords: tokens("100", "-200"),
                op: Some(OperationCode::Draw),
            }
        );
    }

    #[test]
    fn test_arc_operation() {
        let GerberCommand::Operation { coords, op, mode } = classify_word("X0Y1000I-500J0D01")
        else {
            panic!("expected operation");
        };
        assert_eq!(mode, None);
        assert_eq!(op, Some(OperationCode::Draw));
        assert_eq!(coords.i.as_deref(), Some("-500"));
        assert_eq!(coords.j.as_deref(), Some("0"));
        assert!(coords.has_offset());
    }

    #[test]
    fn test_modal_operation_without_d_code() {
        assert_eq!(
            classify_word("X5Y5"),
            GerberCommand::Operation {
                mode: None,
                coords: tokens("5", "5"),
                op: None,
            }
        );
        assert_eq!(
            classify_word("D2"),
            GerberCommand::Operation {
                mode: None,
                coords: CoordinateTokens::default(),
                op: Some(OperationCode::Move),
            }
        );
    }

    #[test]
    fn test_aperture_selection() {
        assert_eq!(classify_word("D10"), GerberCommand::SelectAperture(10));
        assert_eq!(classify_word("G54D11"), GerberCommand::SelectAperture(11));
        assert_eq!(classify_word("X1D10"), GerberCommand::Unknown);
    }

    #[test]
    fn test_comments_and_end() {
        assert_eq!(classify_word("G04 board outline"), GerberCommand::Comment);
        assert_eq!(classify_word("M02"), GerberCommand::EndOfFile);
        assert_eq!(classify_word("G36"), GerberCommand::Unknown);
        assert_eq!(classify_word("hello"), GerberCommand::Unknown);
        assert_eq!(classify_word("G70"), GerberCommand::LegacyUnit(Unit::Inches));
    }

    #[test]
    fn test_extended_params() {
        assert_eq!(
            classify_extended("FSLAX25Y25"),
            GerberCommand::FormatSpec("LAX25Y25".to_string())
        );
        assert_eq!(classify_extended("MOIN"), GerberCommand::Unit(Unit::Inches));
        assert_eq!(
            classify_extended("ADD10C,0.100"),
            GerberCommand::ApertureDefinition(10)
        );
        assert_eq!(classify_extended("LPD"), GerberCommand::Unknown);
    }

    #[test]
    fn test_tokenize_lines() {
        let input = "%FSLAX25Y25*MOIN*%\n\nG01*X100Y100D01*\n%AMBOX*\n21,1,1,1,0,0,0*%\nM02*\n";
        let statements = tokenize(input);
        let commands: Vec<_> = statements.iter().map(|s| s.command.clone()).collect();

        assert_eq!(
            commands,
            vec![
                GerberCommand::FormatSpec("LAX25Y25".to_string()),
                GerberCommand::Unit(Unit::Inches),
                GerberCommand::Interpolation(InterpolationMode::Linear),
                GerberCommand::Operation {
                    mode: None,
                    coords: tokens("100", "100"),
                    op: Some(OperationCode::Draw),
                },
                GerberCommand::ApertureMacro,
                GerberCommand::EndOfFile,
            ]
        );
        assert_eq!(statements[0].text, "%FSLAX25Y25*MOIN*%");
        assert_eq!(statements[3].line_number, 3);
        assert_eq!(statements[4].text, "%AMBOX*\n21,1,1,1,0,0,0*%");
        assert_eq!(statements[5].line_number, 6);
    }

    #[test]
    fn test_unterminated_block_is_unknown() {
        let statements = tokenize("%AMBOX*\n21,1,1,1,0,0,0*\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].command, GerberCommand::Unknown);
    }
}
