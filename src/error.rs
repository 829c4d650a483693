//! Error types for setup and stepping.
//!
//! Every error is fatal: configuration problems are reported when the
//! geometry, table or schedule is built, numeric problems when the stepping
//! call that needs the value starts. Nothing here is retried.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Which end of a modulation table violated the ordering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOrder {
    /// The minimum time is not in the first row.
    MinimumNotFirst,
    /// The maximum time is not in the last row.
    MaximumNotLast,
}

/// Invalid configuration, detected at construction or first use.
#[derive(Debug)]
pub enum ConfigError {
    /// A 3-vector (orientation, origin) is zero-length or non-finite.
    InvalidVector {
        /// Which vector was rejected.
        name: &'static str,
        /// The offending components.
        value: [f64; 3],
    },
    /// A scalar geometry dimension is not finite and positive.
    InvalidDimension {
        /// Which dimension was rejected.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A scalar parameter is NaN or infinite.
    NonFinite {
        /// Which parameter was rejected.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The modulation table has no rows.
    EmptyTable,
    /// A table row could not be interpreted as `[time, value]`.
    MalformedTable {
        /// Zero-based row index.
        row: usize,
        /// Description of the problem.
        reason: String,
    },
    /// The table is not ascending by time.
    TableNotAscending {
        /// Row index where the extreme value was actually found.
        index: usize,
        /// Which end is wrong.
        order: TableOrder,
    },
    /// A modulation table file could not be read or parsed.
    TableFile {
        /// The file that failed.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
    /// Neither or both of an inline table and a table file were given.
    TableSource,
    /// The table cannot be used with the requested options.
    DegenerateTable {
        /// Description of the problem.
        reason: String,
    },
    /// A spatial profile was paired with a geometry it cannot handle.
    ProfileGeometryMismatch {
        /// Profile name.
        profile: &'static str,
        /// Geometry name.
        geometry: &'static str,
    },
    /// A boundary strategy name other than `clamp`, `cyclic` or `reverse`.
    UnknownBoundaryStrategy(String),
    /// A write count of zero.
    NonPositiveWriteCount,
    /// The two-level schedule cannot be interpreted.
    InconsistentSchedule {
        /// Description of the problem.
        reason: String,
    },
    /// A duration is negative or non-finite.
    NegativeDuration {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVector { name, value } => {
                write!(f, "{name} must be a finite non-zero 3-vector, got {value:?}")
            }
            Self::InvalidDimension { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::NonFinite { name, value } => write!(f, "{name} must be finite, got {value}"),
            Self::EmptyTable => write!(f, "modulation table cannot be empty"),
            Self::MalformedTable { row, reason } => {
                write!(f, "modulation table row {row}: {reason}")
            }
            Self::TableNotAscending { index, order } => match order {
                TableOrder::MinimumNotFirst => write!(
                    f,
                    "modulation table is not ascending: minimum time found at row {index}, expected row 0"
                ),
                TableOrder::MaximumNotLast => write!(
                    f,
                    "modulation table is not ascending: maximum time found at row {index}, expected the last row"
                ),
            },
            Self::TableFile { path, reason } => {
                write!(f, "modulation table file {}: {reason}", path.display())
            }
            Self::TableSource => {
                write!(f, "lookup table needs exactly one of `table` (a file) or `rows` (inline)")
            }
            Self::DegenerateTable { reason } => write!(f, "unusable modulation table: {reason}"),
            Self::ProfileGeometryMismatch { profile, geometry } => write!(
                f,
                "{profile} flow requires a cylindrical geometry, but was given a {geometry}"
            ),
            Self::UnknownBoundaryStrategy(name) => write!(
                f,
                "\"{name}\" is not a valid boundary strategy; valid strategies are \"clamp\", \"cyclic\", \"reverse\""
            ),
            Self::NonPositiveWriteCount => write!(f, "number of writes must be a positive integer"),
            Self::InconsistentSchedule { reason } => write!(f, "inconsistent schedule: {reason}"),
            Self::NegativeDuration { value } => {
                write!(f, "duration must be finite and non-negative, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Failure while advancing the particle set.
#[derive(Debug)]
pub enum StepError {
    /// `dt` is unusable for this call.
    InvalidStep {
        /// The offending step size.
        dt: f64,
        /// What the call requires of `dt`.
        expected: &'static str,
    },
    /// A call asked to advance by a negative amount of time.
    NegativeDuration {
        /// The offending duration.
        duration: f64,
    },
    /// A scheduling argument failed validation.
    Config(ConfigError),
    /// The snapshot writer failed.
    Write(io::Error),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep { dt, expected } => write!(f, "expected {expected} step size, got dt={dt}"),
            Self::NegativeDuration { duration } => {
                write!(f, "cannot evolve for a negative duration ({duration})")
            }
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Write(e) => write!(f, "snapshot write failed: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for StepError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for StepError {
    fn from(e: io::Error) -> Self {
        Self::Write(e)
    }
}

/// Failure reading a particle positions or modulation table file.
#[derive(Debug)]
pub enum FileError {
    /// The file could not be opened or read.
    Io(io::Error),
    /// A line could not be parsed.
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
    /// The declared particle count does not match the number of rows.
    CountMismatch {
        /// Count from the header line.
        declared: usize,
        /// Rows actually present.
        found: usize,
    },
    /// The parsed table was rejected.
    Table(ConfigError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::CountMismatch { declared, found } => {
                write!(f, "header declares {declared} particles but {found} were found")
            }
            Self::Table(e) => write!(f, "{e}"),
        }
    }
}

impl Error for FileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for FileError {
    fn from(e: ConfigError) -> Self {
        Self::Table(e)
    }
}
