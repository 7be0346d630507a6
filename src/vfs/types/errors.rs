/*!
 * VFS Error Types
 * Structured, type-safe error handling for mount, resolve, and read operations
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::memory::AllocationError;

/// Result of an operation that may fail at any layer of the filesystem
///
/// # Must Use
/// VFS operations can fail and must be handled
#[must_use = "VFS operations can fail and must be handled"]
pub type VfsResult<T> = Result<T, VfsError>;

/// Archive parsing failures
///
/// These abort indexing of the whole archive. Problems confined to a single
/// entry are recorded as skipped entries instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum ArchiveError {
    #[error("End of central directory record not found")]
    #[diagnostic(
        code(archive::missing_eocd),
        help("The data is not a zip archive, or it was cut off before its end.")
    )]
    MissingEndOfCentralDirectory,

    #[error("Bad signature at offset {offset}: expected 0x{expected:08x}")]
    #[diagnostic(code(archive::bad_signature))]
    BadSignature { offset: u64, expected: u32 },

    #[error("Truncated archive: {0}")]
    #[diagnostic(code(archive::truncated))]
    Truncated(String),

    #[error("Multi-volume archives are not supported (disk {disk})")]
    #[diagnostic(
        code(archive::multi_volume),
        help("Join the volumes into a single archive before mounting.")
    )]
    MultiVolume { disk: u16 },

    #[error("Zip64 archives are not supported")]
    #[diagnostic(
        code(archive::zip64),
        help("Re-create the archive without zip64 extensions (under 4GB and 65535 entries).")
    )]
    Zip64,

    #[error("I/O error: {0}")]
    #[diagnostic(code(archive::io))]
    Io(String),

    #[error(transparent)]
    #[diagnostic(code(archive::allocation))]
    Allocation(#[from] AllocationError),
}

/// Mount failures
///
/// A failed mount never changes the mount table.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum MountError {
    #[error("Mount source not found: {0}")]
    #[diagnostic(
        code(mount::not_found),
        help("Check that the host directory or archive path exists.")
    )]
    NotFound(String),

    #[error("Invalid virtual prefix: {0}")]
    #[diagnostic(
        code(mount::invalid_prefix),
        help("Prefixes are absolute paths such as /res and may not climb above /.")
    )]
    InvalidPrefix(String),

    #[error("Archive is corrupt: {0}")]
    #[diagnostic(code(mount::archive_corrupt))]
    ArchiveCorrupt(ArchiveError),

    #[error("Unsupported archive volume: {0}")]
    #[diagnostic(code(mount::unsupported_volume))]
    UnsupportedVolume(String),

    #[error("Mount limit reached: {0} sources already mounted")]
    #[diagnostic(
        code(mount::limit_reached),
        help("Unmount unused sources or raise max_mounts in VfsConfig.")
    )]
    LimitReached(usize),

    #[error("I/O error: {0}")]
    #[diagnostic(code(mount::io))]
    Io(String),

    #[error(transparent)]
    #[diagnostic(code(mount::allocation))]
    Allocation(#[from] AllocationError),
}

impl From<ArchiveError> for MountError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::MultiVolume { .. } | ArchiveError::Zip64 => {
                MountError::UnsupportedVolume(err.to_string())
            }
            ArchiveError::Allocation(e) => MountError::Allocation(e),
            ArchiveError::Io(msg) => MountError::Io(msg),
            other => MountError::ArchiveCorrupt(other),
        }
    }
}

/// Path resolution failures
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum ResolveError {
    #[error("Not found: {0}")]
    #[diagnostic(code(resolve::not_found))]
    NotFound(String),
}

/// File read failures
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum FileError {
    #[error("Not found: {0}")]
    #[diagnostic(code(file::not_found))]
    NotFound(String),

    #[error("File is empty: {0}")]
    #[diagnostic(code(file::empty))]
    Empty(String),

    #[error("Is a directory: {0}")]
    #[diagnostic(code(file::is_directory))]
    IsDirectory(String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(file::io))]
    Io(String),

    #[error("Corrupt data: {0}")]
    #[diagnostic(
        code(file::corrupt_data),
        help("The archive entry is damaged; re-create the archive.")
    )]
    CorruptData(String),

    #[error("Unsupported compression method {0}")]
    #[diagnostic(code(file::unsupported_compression))]
    UnsupportedCompression(u16),

    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    #[diagnostic(code(file::too_large))]
    TooLarge { size: u64, limit: u64 },

    #[error(transparent)]
    #[diagnostic(code(file::allocation))]
    Allocation(#[from] AllocationError),
}

impl From<ResolveError> for FileError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(path) => FileError::NotFound(path),
        }
    }
}

/// Any filesystem failure
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mount(#[from] MountError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Archive(#[from] ArchiveError),
}
