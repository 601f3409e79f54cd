use std::fmt;

/// Problems found while parsing a record.
///
/// Diagnostics never abort the parse: the parser recovers and returns
/// them alongside whatever tree it managed to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDiagnostic {
    /// A byte that fits no grammar rule at this position; it was skipped.
    UnexpectedToken { found: char, pos: usize },
    /// A `[` value was opened but the input ended before its `]`.
    UnterminatedValue { pos: usize },
    /// The input ended before a subtree's closing `)` (or held no `(` at all).
    MissingDelimiter { pos: usize },
    /// The root carried no SZ property; the configured default was filled
    /// in so the board dimension is agreed before any replay.
    MissingSizeProperty,
    /// The root SZ value cannot be addressed by the two-letter coordinate
    /// alphabet (outside 1..=26); the configured default replaced it.
    UnsupportedSizeProperty { value: String },
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDiagnostic::UnexpectedToken { found, pos } => {
                write!(f, "unexpected character '{found}' at position {pos}")
            }
            ParseDiagnostic::UnterminatedValue { pos } => {
                write!(f, "property value opened at position {pos} is never closed")
            }
            ParseDiagnostic::MissingDelimiter { pos } => {
                write!(f, "input ended at position {pos} before the record was closed")
            }
            ParseDiagnostic::MissingSizeProperty => {
                write!(f, "record has no board size property; using the default")
            }
            ParseDiagnostic::UnsupportedSizeProperty { value } => {
                write!(f, "board size [{value}] is outside 1-26; using the default")
            }
        }
    }
}

impl std::error::Error for ParseDiagnostic {}
