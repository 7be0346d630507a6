/*!
 * Entry and Metadata Types
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of node visible through the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    File,
    Directory,
}

/// Metadata for a resolved path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub file_type: FileType,
    /// Uncompressed size in bytes; zero for directories
    pub size: u64,
}

impl Metadata {
    #[inline]
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// Directory listing entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub file_type: FileType,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, file_type: FileType) -> Self {
        Self {
            name: name.into(),
            file_type,
        }
    }
}

/// Opaque identifier for a mount, returned by `mount` and consumed by `unmount`
///
/// Identifiers are never reused within one filesystem instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MountId(pub(crate) u64);

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mount#{}", self.0)
    }
}

/// What backs a mount point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    Directory,
    ArchiveBuffer,
    ArchiveFile,
}

impl fmt::Display for MountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MountKind::Directory => "directory",
            MountKind::ArchiveBuffer => "archive-buffer",
            MountKind::ArchiveFile => "archive-file",
        };
        f.write_str(s)
    }
}

/// Snapshot of a mount point, as reported by `VirtualFilesystem::mounts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountInfo {
    pub id: MountId,
    pub virtual_prefix: String,
    /// Host path for directory and archive-file mounts
    pub host_path: Option<PathBuf>,
    pub kind: MountKind,
    pub mount_order: u64,
}
