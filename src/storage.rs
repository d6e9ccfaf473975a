//! Storage seam
//!
//! The painter never talks to a filesystem directly. Board support code
//! implements [`Storage`] and [`StorageFile`] on top of whatever volume the
//! device mounts, the same way [`crate::StripTransport`] abstracts the bus.

use core::fmt;

use heapless::String;

use crate::error::CapacityError;

/// Maximum length of a full path, including directory and file name
pub const MAX_PATH_LEN: usize = 96;

/// Owned, fixed-capacity path
pub type PathBuf = String<MAX_PATH_LEN>;

/// `ENOENT`
pub const ERRNO_NOT_FOUND: i32 = 2;
/// `EIO`
pub const ERRNO_IO: i32 = 5;
/// `ENOSPC`
pub const ERRNO_NO_SPACE: i32 = 28;
/// `EROFS`
pub const ERRNO_READ_ONLY: i32 = 30;

/// Broad class of a storage failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Path does not exist
    NotFound,
    /// Medium is mounted read-only
    ReadOnly,
    /// Medium is full
    NoSpace,
    /// File ended before the requested bytes were read
    UnexpectedEof,
    /// Any other I/O failure
    Other,
}

/// Storage failure with an errno-equivalent code for headless diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub code: i32,
}

impl StorageError {
    pub const fn new(kind: StorageErrorKind, code: i32) -> Self {
        Self { kind, code }
    }

    pub const fn not_found() -> Self {
        Self::new(StorageErrorKind::NotFound, ERRNO_NOT_FOUND)
    }

    pub const fn read_only() -> Self {
        Self::new(StorageErrorKind::ReadOnly, ERRNO_READ_ONLY)
    }

    pub const fn no_space() -> Self {
        Self::new(StorageErrorKind::NoSpace, ERRNO_NO_SPACE)
    }

    pub const fn unexpected_eof() -> Self {
        Self::new(StorageErrorKind::UnexpectedEof, ERRNO_IO)
    }

    /// Generic I/O failure carrying the driver's own code
    pub const fn io(code: i32) -> Self {
        Self::new(StorageErrorKind::Other, code)
    }

    pub const fn is_read_only(self) -> bool {
        matches!(self.kind, StorageErrorKind::ReadOnly)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            StorageErrorKind::NotFound => "not found",
            StorageErrorKind::ReadOnly => "read-only filesystem",
            StorageErrorKind::NoSpace => "no space left",
            StorageErrorKind::UnexpectedEof => "unexpected end of file",
            StorageErrorKind::Other => "i/o error",
        };
        write!(f, "{kind} (errno {})", self.code)
    }
}

/// An open file on the storage medium
pub trait StorageFile {
    /// Move the cursor to an absolute byte position
    fn seek(&mut self, position: u64) -> Result<(), StorageError>;

    /// Read up to `buf.len()` bytes, returning how many were read (0 at end of file)
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write up to `data.len()` bytes, returning how many were written
    fn write(&mut self, data: &[u8]) -> Result<usize, StorageError>;

    /// Total file size in bytes
    fn size(&mut self) -> Result<u64, StorageError>;

    /// Fill `buf` completely or fail with [`StorageErrorKind::UnexpectedEof`]
    fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<(), StorageError> {
        while !buf.is_empty() {
            match self.read(buf)? {
                0 => return Err(StorageError::unexpected_eof()),
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    /// Write all of `data`
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), StorageError> {
        while !data.is_empty() {
            match self.write(data)? {
                0 => return Err(StorageError::no_space()),
                n => data = &data[n..],
            }
        }
        Ok(())
    }
}

/// Mounted storage volume
pub trait Storage {
    type File: StorageFile;

    /// Open an existing file for reading
    fn open(&mut self, path: &str) -> Result<Self::File, StorageError>;

    /// Create (or truncate) a file for writing
    fn create(&mut self, path: &str) -> Result<Self::File, StorageError>;

    /// Visit the name of every entry in `dir`
    fn list(&mut self, dir: &str, visit: &mut dyn FnMut(&str)) -> Result<(), StorageError>;

    /// Bytes still available for new data
    fn free_space(&mut self) -> Result<u64, StorageError>;

    /// Whether the volume currently accepts writes
    fn probe_writable(&mut self) -> Result<bool, StorageError>;
}

/// Join a directory and a file name into a single path
pub fn join_path(dir: &str, name: &str) -> Result<PathBuf, CapacityError> {
    let dir = dir.trim_end_matches('/');
    let required = dir.len() + 1 + name.len();
    let mut path = PathBuf::new();
    path.push_str(dir)
        .and_then(|()| path.push('/'))
        .and_then(|()| path.push_str(name))
        .map_err(|()| CapacityError::Memory {
            required,
            available: MAX_PATH_LEN,
        })?;
    Ok(path)
}

/// Log a storage failure together with the path it happened on
pub(crate) fn log_failure(action: &str, path: &str, error: &StorageError) {
    if error.is_read_only() {
        log::info!("{action} {path}: {error}");
    } else {
        log::error!("{action} {path}: {error}");
    }
}
