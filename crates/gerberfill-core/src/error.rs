//! Error handling for GerberFill
//!
//! Provides error types for all layers of the converter:
//! - Gerber errors (structural problems with the input file)
//! - I/O errors (reading input, writing output)
//! - Serialization errors (configuration and summaries)
//!
//! Only structural and I/O problems are errors. Unrecognized lines, arcs
//! without a center offset and degenerate polygons are handled where they
//! occur and never surface here.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Gerber error type
///
/// Represents structural problems that make a file impossible to decode
/// reliably, plus invalid conversion parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GerberError {
    /// No format specification was found before coordinates were needed
    #[error("Missing format specification (%FS) at line {line_number}")]
    MissingFormatSpec {
        /// The line where a coordinate first needed decoding, or the last
        /// line of the file.
        line_number: u32,
    },

    /// The format specification could not be parsed
    #[error("Invalid format specification at line {line_number} ({line}): {reason}")]
    InvalidFormatSpec {
        /// The line number of the offending directive.
        line_number: u32,
        /// The directive as written.
        line: String,
        /// The reason the directive was rejected.
        reason: String,
    },

    /// A coordinate token is not a signed digit string
    #[error("Invalid coordinate '{token}': {reason}")]
    InvalidCoordinate {
        /// The token as written.
        token: String,
        /// The reason the token was rejected.
        reason: String,
    },

    /// A conversion parameter is out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

/// Main error type for GerberFill
#[derive(Error, Debug)]
pub enum Error {
    /// Gerber error
    #[error(transparent)]
    Gerber(#[from] GerberError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error makes the input impossible to decode
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::Gerber(GerberError::MissingFormatSpec { .. })
                | Error::Gerber(GerberError::InvalidFormatSpec { .. })
        )
    }
}

/// Result type alias for GerberFill operations
pub type Result<T> = std::result::Result<T, Error>;
