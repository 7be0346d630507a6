/*!
 * VFS Traits
 * Mountable source abstraction
 */

use std::fmt;
use std::path::{Path, PathBuf};

use super::archive::{ArchiveEntry, ArchiveIndex};
use super::types::*;
use crate::core::StringPool;

/// Where a relative path landed inside one source
#[derive(Debug, Clone)]
pub enum Located<'a> {
    /// Regular host file below a directory mount
    HostFile { path: PathBuf, size: u64 },
    /// Host directory below a directory mount
    HostDirectory(PathBuf),
    /// File entry inside an archive
    ArchiveFile {
        index: &'a ArchiveIndex,
        entry: &'a ArchiveEntry,
    },
    /// Explicit or implied directory inside an archive
    ArchiveDirectory,
}

impl Located<'_> {
    pub fn metadata(&self) -> Metadata {
        match self {
            Located::HostFile { size, .. } => Metadata {
                file_type: FileType::File,
                size: *size,
            },
            Located::ArchiveFile { entry, .. } => Metadata {
                file_type: FileType::File,
                size: entry.uncompressed_size as u64,
            },
            Located::HostDirectory(_) | Located::ArchiveDirectory => Metadata {
                file_type: FileType::Directory,
                size: 0,
            },
        }
    }
}

/// A mountable, read-only source of assets
///
/// Implementations receive paths relative to their mount prefix, already
/// normalized: no leading `/`, no `.` or `..` segments. The empty string
/// is the source root.
pub trait AssetSource: Send + Sync + fmt::Debug {
    /// Find `relative` in this source
    fn lookup<'a>(&'a self, relative: &str, pool: &StringPool) -> Option<Located<'a>>;

    /// Immediate children of the directory at `relative`
    fn list_dir(&self, relative: &str, pool: &StringPool) -> Option<Vec<DirEntry>>;

    /// Kind of backing store
    fn kind(&self) -> MountKind;

    /// Host path backing this source, if any
    fn host_path(&self) -> Option<&Path> {
        None
    }

    /// Source name for logging
    fn name(&self) -> &str;

    /// Archive index, for archive-backed sources
    fn archive(&self) -> Option<&ArchiveIndex> {
        None
    }
}
