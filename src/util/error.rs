//! Error types for the BinaryTimeseries library.

use std::path::PathBuf;
use thiserror::Error;

use super::DType;

/// Main error type for BinaryTimeseries operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Endianness marker does not read back as the expected sentinel.
    ///
    /// Nothing after the marker can be trusted once this is returned.
    #[error("Endianness mismatch: expected marker {expected:#06x}, found {found:#06x}")]
    EndiannessMismatch { expected: u16, found: u16 },

    /// Tag byte outside the defined dtype set
    #[error("Unknown {field} dtype tag: {tag}")]
    UnknownTag { field: &'static str, tag: u8 },

    /// Time dtype is a valid tag but not Int64 or Float64
    #[error("Invalid time dtype: {0} (expected L or D)")]
    InvalidTimeType(DType),

    /// Invalid argument combination
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested element window exceeds the available buffer or source
    #[error("Out of bounds: {requested} elements requested, {available} available")]
    OutOfBounds { requested: u64, available: u64 },

    /// Total length disagrees with the header
    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Typed access with a sample type that differs from the stored one
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: DType, actual: DType },

    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an out-of-bounds error from element counts.
    pub fn out_of_bounds(requested: impl TryInto<u64>, available: impl TryInto<u64>) -> Self {
        Self::OutOfBounds {
            requested: requested.try_into().unwrap_or(u64::MAX),
            available: available.try_into().unwrap_or(u64::MAX),
        }
    }
}

/// Result type alias for BinaryTimeseries operations.
pub type Result<T> = std::result::Result<T, Error>;
