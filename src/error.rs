//! Error taxonomy
//!
//! - [`FormatError`]: the bitmap is malformed, the image is skipped
//! - [`CapacityError`]: the encoded data does not fit storage or memory
//! - [`StorageError`]: unexpected I/O failure, fatal to the current operation
//! - [`Error::ReadOnlyStorage`]: routine condition, callers degrade to replay

use core::fmt;

use crate::storage::{StorageError, StorageErrorKind};

/// Reason a bitmap was rejected before any pixel was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// First two bytes are not `BM`
    Signature,
    /// File ended inside the header
    TruncatedHeader,
    /// Plane count other than 1
    Planes(u16),
    /// Bit depth other than 24
    BitDepth(u16),
    /// Compression other than uncompressed RGB
    Compression(u32),
    /// Zero or negative dimensions
    Dimensions { width: i32, height: i32 },
    /// File ends before the last pixel row the header promises
    TruncatedPixels { required: u64, actual: u64 },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signature => f.write_str("not a bitmap file"),
            Self::TruncatedHeader => f.write_str("truncated header"),
            Self::Planes(planes) => write!(f, "not single-plane ({planes} planes)"),
            Self::BitDepth(depth) => write!(f, "not 24-bit ({depth} bits per pixel)"),
            Self::Compression(method) => write!(f, "compressed file (method {method})"),
            Self::Dimensions { width, height } => {
                write!(f, "invalid dimensions {width}x{height}")
            }
            Self::TruncatedPixels { required, actual } => {
                write!(f, "pixel data needs {required} bytes, file has {actual}")
            }
        }
    }
}

/// Data does not fit where it has to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// Encoded stream is larger than the free space on the medium
    Storage { required: u64, available: u64 },
    /// A fixed-capacity buffer is too small
    Memory { required: usize, available: usize },
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage {
                required,
                available,
            } => write!(f, "needs {required} bytes of storage, {available} free"),
            Self::Memory {
                required,
                available,
            } => write!(f, "needs {required} bytes of memory, {available} available"),
        }
    }
}

/// Painter error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Format(FormatError),
    Capacity(CapacityError),
    Storage(StorageError),
    /// Storage is mounted read-only; only previously persisted data can play
    ReadOnlyStorage,
}

impl From<FormatError> for Error {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<CapacityError> for Error {
    fn from(value: CapacityError) -> Self {
        Self::Capacity(value)
    }
}

impl From<StorageError> for Error {
    fn from(value: StorageError) -> Self {
        match value.kind {
            StorageErrorKind::ReadOnly => Self::ReadOnlyStorage,
            StorageErrorKind::NoSpace => Self::Capacity(CapacityError::Storage {
                required: 0,
                available: 0,
            }),
            _ => Self::Storage(value),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(error) => write!(f, "bitmap format error: {error}"),
            Self::Capacity(error) => write!(f, "capacity error: {error}"),
            Self::Storage(error) => write!(f, "storage error: {error}"),
            Self::ReadOnlyStorage => f.write_str("storage is read-only"),
        }
    }
}
