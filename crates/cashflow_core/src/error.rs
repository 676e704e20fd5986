use std::fmt;

use crate::model::Diagnostic;

/// Errors from parsing an RRULE string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    Empty,
    /// A `;`-separated part without `=`
    MalformedPart(String),
    MissingFrequency,
    UnknownFrequency(String),
    /// A valid RFC 5545 frequency finer than a day
    UnsupportedFrequency(String),
    UnknownPart(String),
    /// A valid RFC 5545 part this engine does not expand
    UnsupportedPart(String),
    DuplicatePart(String),
    InvalidValue {
        part: &'static str,
        value: String,
    },
    CountWithUntil,
    /// `BYDAY` ordinals such as `-1FR` only make sense for monthly or yearly rules
    OrdinalNotAllowed {
        frequency: &'static str,
    },
    PartNotAllowed {
        part: &'static str,
        frequency: &'static str,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::Empty => write!(f, "rule is empty"),
            RuleError::MalformedPart(part) => write!(f, "malformed rule part {part:?}"),
            RuleError::MissingFrequency => write!(f, "FREQ is required"),
            RuleError::UnknownFrequency(freq) => write!(f, "unknown frequency {freq:?}"),
            RuleError::UnsupportedFrequency(freq) => {
                write!(f, "frequency {freq} is not supported")
            }
            RuleError::UnknownPart(name) => write!(f, "unknown rule part {name:?}"),
            RuleError::UnsupportedPart(name) => write!(f, "rule part {name} is not supported"),
            RuleError::DuplicatePart(name) => write!(f, "rule part {name} given more than once"),
            RuleError::InvalidValue { part, value } => {
                write!(f, "invalid {part} value {value:?}")
            }
            RuleError::CountWithUntil => write!(f, "COUNT and UNTIL cannot both be given"),
            RuleError::OrdinalNotAllowed { frequency } => {
                write!(f, "BYDAY ordinals are not allowed with FREQ={frequency}")
            }
            RuleError::PartNotAllowed { part, frequency } => {
                write!(f, "{part} is not allowed with FREQ={frequency}")
            }
        }
    }
}

impl std::error::Error for RuleError {}

/// A strict projection was requested but some events produced diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionError {
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projection produced {} diagnostic(s)", self.diagnostics.len())?;
        if let Some(first) = self.diagnostics.first() {
            write!(f, ", first: {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProjectionError {}
