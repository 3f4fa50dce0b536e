//! Fixed-point coordinate codec
//!
//! Gerber coordinates are integers with an implied decimal point, laid out
//! by the file's `%FS` directive. `X25` with leading zero suppression turns
//! `100000` into `01.00000`, i.e. 1.0 in the file unit. Values are converted
//! to millimeters on decode and back to the file unit on encode.

use gerberfill_core::{Axis, AxisFormat, FormatSpec, GerberError, Unit, ZeroSuppression};

/// Decode a coordinate token to millimeters.
///
/// An absent token is a modal coordinate and yields `previous` unchanged.
pub fn decode(
    token: Option<&str>,
    format: &FormatSpec,
    axis: Axis,
    previous: Option<f64>,
    unit: Unit,
) -> Result<Option<f64>, GerberError> {
    let Some(token) = token else {
        return Ok(previous);
    };
    let value = decode_value(token, format.axis(axis), format.zero_suppression)?;
    Ok(Some(unit.to_mm(value)))
}

/// Decode a token to a value in the file unit.
pub fn decode_value(
    token: &str,
    layout: AxisFormat,
    zeros: ZeroSuppression,
) -> Result<f64, GerberError> {
    let invalid = |reason: &str| GerberError::InvalidCoordinate {
        token: token.to_string(),
        reason: reason.to_string(),
    };

    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if digits.is_empty() {
        return Err(invalid("no digits"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a digit string"));
    }

    let total = layout.total();
    let (padded, decimals) = match zeros {
        ZeroSuppression::Leading => {
            (format!("{:0>width$}", digits, width = total), layout.decimal as usize)
        }
        ZeroSuppression::Trailing => {
            let padded = format!("{:0<width$}", digits, width = total);
            let decimals = padded.len() - layout.integer as usize;
            (padded, decimals)
        }
    };

    let counts: u64 = padded
        .parse()
        .map_err(|_| invalid("too many digits"))?;
    let magnitude = counts as f64 / 10f64.powi(decimals as i32);
    Ok(if negative { -magnitude } else { magnitude })
}

/// Encode a millimeter value as a coordinate token.
pub fn encode(value_mm: f64, format: &FormatSpec, axis: Axis, unit: Unit) -> String {
    let layout = format.axis(axis);
    format_counts(to_counts(value_mm, layout, unit), layout, format.zero_suppression)
}

/// Quantize a millimeter value to least-significant-digit units of the file.
pub fn to_counts(value_mm: f64, layout: AxisFormat, unit: Unit) -> i64 {
    (unit.from_mm(value_mm) * layout.scale()).round() as i64
}

/// Write quantized units as a zero-suppressed token.
pub fn format_counts(counts: i64, layout: AxisFormat, zeros: ZeroSuppression) -> String {
    let total = layout.total();
    let digits = format!("{:0width$}", counts.unsigned_abs(), width = total);
    if digits.len() > total {
        tracing::warn!(
            "Coordinate {} overflows the {}.{} digit layout",
            digits,
            layout.integer,
            layout.decimal
        );
    }

    let trimmed = match zeros {
        ZeroSuppression::Leading => digits.trim_start_matches('0'),
        ZeroSuppression::Trailing => digits.trim_end_matches('0'),
    };
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };

    if counts < 0 {
        format!("-{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gerberfill_core::CoordinateNotation;
    use proptest::prelude::*;

    fn fs(zeros: ZeroSuppression, integer: u8, decimal: u8) -> FormatSpec {
        FormatSpec {
            notation: CoordinateNotation::Absolute,
            zero_suppression: zeros,
            x: AxisFormat::new(integer, decimal),
            y: AxisFormat::new(integer, decimal),
        }
    }

    #[test]
    fn test_inch_token_decodes_to_millimeters() {
        let format = fs(ZeroSuppression::Leading, 2, 5);
        let value = decode(Some("100000"), &format, Axis::X, None, Unit::Inches).unwrap();
        assert!((value.unwrap() - 25.4).abs() < 1e-9);

        assert_eq!(encode(25.4, &format, Axis::X, Unit::Inches), "100000");
    }

    #[test]
    fn test_absent_token_is_modal() {
        let format = fs(ZeroSuppression::Leading, 2, 4);
        assert_eq!(
            decode(None, &format, Axis::Y, Some(3.5), Unit::Millimeters).unwrap(),
            Some(3.5)
        );
        assert_eq!(
            decode(None, &format, Axis::Y, None, Unit::Millimeters).unwrap(),
            None
        );
    }

    #[test]
    fn test_leading_suppression() {
        let layout = AxisFormat::new(3, 4);
        assert_eq!(decode_value("12345", layout, ZeroSuppression::Leading).unwrap(), 1.2345);
        assert_eq!(decode_value("-5", layout, ZeroSuppression::Leading).unwrap(), -0.0005);
        assert_eq!(decode_value("+0", layout, ZeroSuppression::Leading).unwrap(), 0.0);
    }

    #[test]
    fn test_trailing_suppression() {
        let layout = AxisFormat::new(2, 4);
        assert_eq!(decode_value("15", layout, ZeroSuppression::Trailing).unwrap(), 15.0);
        assert_eq!(decode_value("0125", layout, ZeroSuppression::Trailing).unwrap(), 1.25);
        assert_eq!(decode_value("-01", layout, ZeroSuppression::Trailing).unwrap(), -1.0);
    }

    #[test]
    fn test_rejects_garbage() {
        let layout = AxisFormat::new(2, 4);
        assert!(decode_value("", layout, ZeroSuppression::Leading).is_err());
        assert!(decode_value("-", layout, ZeroSuppression::Leading).is_err());
        assert!(decode_value("1.5", layout, ZeroSuppression::Leading).is_err());
        assert!(decode_value("99999999999999999999999", layout, ZeroSuppression::Leading).is_err());
    }

    #[test]
    fn test_encode_suppresses_zeros() {
        let leading = fs(ZeroSuppression::Leading, 3, 5);
        assert_eq!(encode(1.5, &leading, Axis::X, Unit::Millimeters), "150000");
        assert_eq!(encode(-0.001, &leading, Axis::X, Unit::Millimeters), "-100");
        assert_eq!(encode(0.0, &leading, Axis::X, Unit::Millimeters), "0");
        assert_eq!(encode(-0.000001, &leading, Axis::X, Unit::Millimeters), "0");

        let trailing = fs(ZeroSuppression::Trailing, 2, 4);
        assert_eq!(encode(1.25, &trailing, Axis::Y, Unit::Millimeters), "0125");
        assert_eq!(encode(10.0, &trailing, Axis::Y, Unit::Millimeters), "1");
        assert_eq!(encode(0.0, &trailing, Axis::Y, Unit::Millimeters), "0");
    }

    #[test]
    fn test_encode_rounds_to_nearest_unit() {
        let format = fs(ZeroSuppression::Leading, 2, 3);
        assert_eq!(encode(1.23449, &format, Axis::X, Unit::Millimeters), "1234");
        assert_eq!(encode(1.23451, &format, Axis::X, Unit::Millimeters), "1235");
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_one_unit(
            integer in 1u8..=4,
            decimal in 1u8..=6,
            fraction in -0.999f64..0.999,
            leading in any::<bool>(),
            inches in any::<bool>(),
        ) {
            let zeros = if leading { ZeroSuppression::Leading } else { ZeroSuppression::Trailing };
            let unit = if inches { Unit::Inches } else { Unit::Millimeters };
            let format = fs(zeros, integer, decimal);
            let value_mm = unit.to_mm(fraction * 10f64.powi(integer as i32));

            let token = encode(value_mm, &format, Axis::X, unit);
            let decoded = decode(Some(token.as_str()), &format, Axis::X, None, unit).unwrap().unwrap();

            let lsd_mm = unit.to_mm(1.0 / 10f64.powi(decimal as i32));
            prop_assert!((decoded - value_mm).abs() <= lsd_mm, "{} -> {} -> {}", value_mm, token, decoded);
        }
    }
}
