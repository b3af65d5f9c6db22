//! Error types for the aggregation stages.
//!
//! Errors are stage-specific: opening the input, decoding one value,
//! framing one record, scanning one chunk, and the job as a whole. Public
//! enums are `#[non_exhaustive]`; consumers should include a fallback arm.
//!
//! # Failure policy
//! - Input errors surface before any chunk is scanned.
//! - Record errors only exist in [`ParseMode::Strict`](crate::ParseMode).
//!   Lenient scanning never produces them.
//! - Any chunk failure fails the whole job. A table missing one range is not
//!   a valid aggregate, so there is no partial result and no retry.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::api::ByteRange;

/// Errors from opening and mapping the input file.
#[derive(Debug)]
#[non_exhaustive]
pub enum InputError {
    /// File could not be opened (missing, permissions).
    Open { path: PathBuf, source: io::Error },
    /// File metadata could not be read.
    Metadata { path: PathBuf, source: io::Error },
    /// Memory mapping failed.
    Map { path: PathBuf, source: io::Error },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            }
            Self::Metadata { path, source } => {
                write!(f, "cannot stat {}: {source}", path.display())
            }
            Self::Map { path, source } => {
                write!(f, "cannot map {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Metadata { source, .. } | Self::Map { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Strict decoding failures for one value field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// No integer digits.
    Empty,
    /// Byte outside `-?DIGITS(.DIGIT)?` at `index` within the field.
    UnexpectedByte { index: usize, byte: u8 },
    /// `.` not followed by a digit.
    MissingFractionDigit,
    /// More than one digit after `.`.
    TooManyFractionDigits,
    /// Integer part does not fit in tenths as `i64`.
    Overflow,
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty value"),
            Self::UnexpectedByte { index, byte } => {
                write!(f, "unexpected byte {:?} at index {index}", *byte as char)
            }
            Self::MissingFractionDigit => write!(f, "missing digit after '.'"),
            Self::TooManyFractionDigits => write!(f, "more than one fractional digit"),
            Self::Overflow => write!(f, "value out of range"),
        }
    }
}

impl std::error::Error for ValueError {}

/// Strict framing failures for one record.
///
/// `offset` is the absolute byte offset of the record's first byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    /// Line has no `;` before its terminator.
    MissingDelimiter { offset: usize },
    /// Value field failed strict decoding.
    BadValue { offset: usize, kind: ValueError },
}

impl RecordError {
    /// Absolute offset of the offending record.
    pub fn offset(&self) -> usize {
        match self {
            Self::MissingDelimiter { offset } | Self::BadValue { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDelimiter { offset } => {
                write!(f, "record at byte {offset} has no ';' delimiter")
            }
            Self::BadValue { offset, kind } => {
                write!(f, "record at byte {offset} has a bad value: {kind}")
            }
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadValue { kind, .. } => Some(kind),
            Self::MissingDelimiter { .. } => None,
        }
    }
}

/// Why a single chunk scan failed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChunkFailure {
    /// Strict-mode record error.
    Record(RecordError),
    /// The scan panicked; the payload message is kept when it was a string.
    Panicked { message: String },
}

impl fmt::Display for ChunkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(err) => write!(f, "{err}"),
            Self::Panicked { message } => write!(f, "scan panicked: {message}"),
        }
    }
}

impl std::error::Error for ChunkFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Record(err) => Some(err),
            Self::Panicked { .. } => None,
        }
    }
}

impl From<RecordError> for ChunkFailure {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}

/// Job-level error returned by the aggregation entry points.
#[derive(Debug)]
#[non_exhaustive]
pub enum AggregateError {
    /// Input could not be opened or mapped.
    Input(InputError),
    /// Configuration rejected by [`AggregateConfig::validate`](crate::AggregateConfig::validate).
    InvalidConfig { reason: &'static str },
    /// One chunk failed; the job produced no result.
    Chunk {
        index: usize,
        range: ByteRange,
        failure: ChunkFailure,
    },
    /// The caller's cancel token fired before every chunk was scanned.
    Cancelled,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
            Self::Chunk {
                index,
                range,
                failure,
            } => write!(f, "chunk {index} {range} failed: {failure}"),
            Self::Cancelled => write!(f, "aggregation cancelled"),
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Chunk { failure, .. } => Some(failure),
            Self::InvalidConfig { .. } | Self::Cancelled => None,
        }
    }
}

impl From<InputError> for AggregateError {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}
