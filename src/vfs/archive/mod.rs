/*!
 * Archive Backend
 * Zip archives mounted from memory or from a host file
 */

mod decode;
pub mod format;
mod reader;
pub mod storage;

use std::path::{Path, PathBuf};

pub use reader::{
    scan_central_directory, ArchiveEntry, ArchiveIndex, CompressionMethod, EntryOutcome,
    SkipReason, SkippedEntry,
};
pub use storage::{ArchiveStorage, FileStorage, MemoryStorage};

use super::traits::{AssetSource, Located};
use super::types::*;
use crate::core::StringPool;

/// Mounted archive
#[derive(Debug)]
pub struct ArchiveFS {
    index: ArchiveIndex,
    kind: MountKind,
    host_path: Option<PathBuf>,
    name: String,
}

impl ArchiveFS {
    /// Archive copied from a caller buffer
    pub fn from_buffer_index(index: ArchiveIndex) -> Self {
        Self {
            index,
            kind: MountKind::ArchiveBuffer,
            host_path: None,
            name: "memory".to_string(),
        }
    }

    /// Archive read from an open host file
    pub fn from_file_index(index: ArchiveIndex, path: &Path) -> Self {
        Self {
            index,
            kind: MountKind::ArchiveFile,
            host_path: Some(path.to_path_buf()),
            name: path.display().to_string(),
        }
    }

    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }
}

impl AssetSource for ArchiveFS {
    fn lookup<'a>(&'a self, relative: &str, pool: &StringPool) -> Option<Located<'a>> {
        if let Some(entry) = self.index.lookup(relative, pool) {
            return Some(Located::ArchiveFile {
                index: &self.index,
                entry,
            });
        }
        self.index
            .is_dir(relative, pool)
            .then_some(Located::ArchiveDirectory)
    }

    fn list_dir(&self, relative: &str, pool: &StringPool) -> Option<Vec<DirEntry>> {
        self.index.list_dir(relative, pool)
    }

    fn kind(&self) -> MountKind {
        self.kind
    }

    fn host_path(&self) -> Option<&Path> {
        self.host_path.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn archive(&self) -> Option<&ArchiveIndex> {
        Some(&self.index)
    }
}
