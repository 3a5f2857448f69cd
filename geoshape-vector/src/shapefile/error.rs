use crate::shapefile::shape_type::ShapeType;
use std::collections::TryReserveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShapefileError>;

/// Failures raised by the shapefile codec. None are retried internally.
#[derive(Debug, Error)]
pub enum ShapefileError {
    /// Bad file code or version; only raised when headers are read strictly.
    #[error("invalid shapefile header: {0}")]
    Header(String),

    #[error("unsupported shape type code {0}")]
    UnsupportedShapeType(i32),

    #[error("record {record} has shape type {found} but the file holds {expected}")]
    ShapeTypeMismatch {
        record: i32,
        expected: ShapeType,
        found: ShapeType,
    },

    #[error("record {record} is truncated: needed {needed} bytes, {available} available")]
    TruncatedRecord {
        record: i32,
        needed: usize,
        available: usize,
    },

    /// Counts or part indices inside a record disagree with its length.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    #[error("unable to grow buffer to {requested} bytes")]
    BufferGrowth {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("handler declared {declared} bytes but wrote {written}")]
    HandlerLengthMismatch { declared: usize, written: usize },

    /// A length or offset does not fit the format's signed 32-bit word count.
    #[error("{what} of {value} exceeds the shapefile format's limits")]
    LengthOverflow { what: &'static str, value: usize },

    #[error("record index {index} is out of range for {count} records")]
    RecordIndexOutOfRange { index: usize, count: usize },

    #[error("{0}")]
    Geometry(String),

    #[error("the shapefile has been closed")]
    Closed,

    /// Random access was requested from a forward-only stream.
    #[error("the underlying stream does not support seeking")]
    NotSeekable,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
