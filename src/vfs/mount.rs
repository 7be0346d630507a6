/*!
 * Virtual Filesystem
 * Ordered mount table with "last mount wins" overlay resolution
 */

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::archive::{ArchiveFS, ArchiveIndex};
use super::config::VfsConfig;
use super::handle::FileHandle;
use super::local::LocalFS;
use super::paths;
use super::traits::{AssetSource, Located};
use super::types::*;
use crate::core::{Handle, StringPool};
use crate::memory::{AllocationError, BufferAllocator, SystemAllocator};
use crate::monitoring::OperationSpan;

/// Data source for a mount
#[derive(Debug, Clone, Copy)]
pub enum MountSource<'a> {
    /// Host directory, probed lazily per lookup
    Directory(&'a Path),
    /// Zip archive on the host, kept open for the mount's lifetime
    ArchiveFile(&'a Path),
    /// Zip archive in memory; the filesystem keeps its own copy
    ArchiveBuffer(&'a [u8]),
}

/// Mount table entry
#[derive(Debug)]
struct MountPoint {
    id: MountId,
    prefix: Handle,
    order: u64,
    source: Box<dyn AssetSource>,
}

/// Result of resolving a virtual path
///
/// Borrowed from the filesystem; recomputed on every lookup.
#[derive(Debug, Clone)]
pub struct ResolvedFile<'a> {
    pub mount: MountId,
    /// Normalized virtual path
    pub path: String,
    located: Located<'a>,
}

impl<'a> ResolvedFile<'a> {
    pub fn metadata(&self) -> Metadata {
        self.located.metadata()
    }

    pub fn is_dir(&self) -> bool {
        self.metadata().is_dir()
    }

    /// Where the path landed inside its source
    pub fn located(&self) -> &Located<'a> {
        &self.located
    }
}

/// Virtual filesystem
///
/// Owns its mount points, their archive storage, and the string pool.
/// Mutation (`mount`, `unmount`) takes `&mut self` while lookups and reads
/// take `&self`, so concurrent use needs one external lock around the whole
/// instance.
#[derive(Debug)]
pub struct VirtualFilesystem {
    mounts: Vec<MountPoint>, // Ascending mount order
    pool: StringPool,
    allocator: Arc<dyn BufferAllocator>,
    config: VfsConfig,
    next_order: u64,
}

impl VirtualFilesystem {
    /// Create an empty filesystem with the system allocator and default config
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> VirtualFilesystemBuilder {
        VirtualFilesystemBuilder::new()
    }

    /// Create a filesystem with a directory or zip archive already mounted at `prefix`
    pub fn with_mount<P: AsRef<Path>>(path: P, prefix: &str) -> VfsResult<Self> {
        let mut vfs = Self::new();
        vfs.mount_path(path, prefix)?;
        Ok(vfs)
    }

    /// Mount `source` at the virtual `prefix`
    ///
    /// Later mounts shadow earlier ones. On failure the mount table is left
    /// exactly as it was.
    pub fn mount(&mut self, source: MountSource<'_>, prefix: &str) -> Result<MountId, MountError> {
        let span = OperationSpan::new("mount", prefix);
        let result = self.attach(source, prefix);
        span.finish(result)
    }

    fn attach(&mut self, source: MountSource<'_>, prefix: &str) -> Result<MountId, MountError> {
        if self.mounts.len() >= self.config.max_mounts {
            return Err(MountError::LimitReached(self.mounts.len()));
        }

        let normalized =
            paths::normalize(prefix).ok_or_else(|| MountError::InvalidPrefix(prefix.to_string()))?;

        let source: Box<dyn AssetSource> = match source {
            MountSource::Directory(path) => Box::new(LocalFS::open(path)?),
            MountSource::ArchiveFile(path) => {
                if !path.is_file() {
                    return Err(MountError::NotFound(path.display().to_string()));
                }
                let index = ArchiveIndex::open_file(path, &mut self.pool, self.allocator.as_ref())?;
                Box::new(ArchiveFS::from_file_index(index, path))
            }
            MountSource::ArchiveBuffer(bytes) => {
                let index = ArchiveIndex::from_buffer(bytes, &mut self.pool, self.allocator.as_ref())?;
                Box::new(ArchiveFS::from_buffer_index(index))
            }
        };

        let prefix = self.pool.intern(&normalized)?;
        self.mounts
            .try_reserve(1)
            .map_err(|e| AllocationError::new(std::mem::size_of::<MountPoint>(), e.to_string()))?;

        let order = self.next_order;
        self.next_order += 1;
        let id = MountId(order);

        info!(
            mount_id = %id,
            prefix = %normalized,
            kind = %source.kind(),
            source = source.name(),
            entries = source.archive().map(|a| a.len()),
            skipped = source.archive().map(|a| a.skipped().len()),
            "Mounted source"
        );

        self.mounts.push(MountPoint {
            id,
            prefix,
            order,
            source,
        });
        Ok(id)
    }

    /// Mount a host directory, or a zip archive file, at `prefix`
    pub fn mount_path<P: AsRef<Path>>(&mut self, path: P, prefix: &str) -> Result<MountId, MountError> {
        let path = path.as_ref();
        if path.is_dir() {
            self.mount(MountSource::Directory(path), prefix)
        } else if path.is_file() {
            self.mount(MountSource::ArchiveFile(path), prefix)
        } else {
            Err(MountError::NotFound(path.display().to_string()))
        }
    }

    /// Mount an in-memory zip archive at `prefix`
    pub fn mount_from_memory(&mut self, data: &[u8], prefix: &str) -> Result<MountId, MountError> {
        self.mount(MountSource::ArchiveBuffer(data), prefix)
    }

    /// Remove a mount and release everything it owned
    pub fn unmount(&mut self, id: MountId) -> Result<(), ResolveError> {
        let position = self
            .mounts
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| ResolveError::NotFound(id.to_string()))?;

        let removed = self.mounts.remove(position);
        info!(
            mount_id = %id,
            prefix = self.pool.resolve(removed.prefix),
            "Unmounted source"
        );
        Ok(())
    }

    /// Resolve a virtual path to the most recently mounted source containing it
    pub fn resolve(&self, path: &str) -> Result<ResolvedFile<'_>, ResolveError> {
        let normalized =
            paths::normalize(path).ok_or_else(|| ResolveError::NotFound(path.to_string()))?;

        for mount in self.mounts.iter().rev() {
            let prefix = self.pool.resolve(mount.prefix);
            let Some(relative) = paths::strip_prefix(&normalized, prefix) else {
                continue;
            };
            if let Some(located) = mount.source.lookup(relative, &self.pool) {
                return Ok(ResolvedFile {
                    mount: mount.id,
                    path: normalized,
                    located,
                });
            }
        }

        debug!(path = %normalized, "Path not found in any mount");
        Err(ResolveError::NotFound(normalized))
    }

    /// Check if a virtual path resolves
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// Get metadata for a virtual path
    pub fn metadata(&self, path: &str) -> Result<Metadata, ResolveError> {
        self.resolve(path).map(|resolved| resolved.metadata())
    }

    /// Open a file for reading
    pub fn open(&self, path: &str) -> Result<FileHandle<'_>, FileError> {
        let resolved = self.resolve(path)?;
        FileHandle::open(
            resolved.located,
            resolved.path,
            self.allocator.as_ref(),
            self.config,
        )
    }

    /// Read a whole file into a buffer sized exactly to its content
    pub fn read_all(&self, path: &str) -> Result<Vec<u8>, FileError> {
        let handle = self.open(path)?;
        if handle.size() == 0 {
            return Err(FileError::Empty(handle.path().to_string()));
        }
        handle.into_bytes()
    }

    /// List a virtual directory, merged across every mount that covers it
    ///
    /// Names from later mounts shadow the same names from earlier ones.
    /// Mount prefixes below `path` appear as directories.
    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, ResolveError> {
        let normalized =
            paths::normalize(path).ok_or_else(|| ResolveError::NotFound(path.to_string()))?;

        fn push(entry: DirEntry, merged: &mut Vec<DirEntry>) {
            if !merged.iter().any(|e| e.name == entry.name) {
                merged.push(entry);
            }
        }

        let mut found = false;
        let mut merged: Vec<DirEntry> = Vec::new();

        for mount in self.mounts.iter().rev() {
            let prefix = self.pool.resolve(mount.prefix);

            if let Some(relative) = paths::strip_prefix(&normalized, prefix) {
                if let Some(entries) = mount.source.list_dir(relative, &self.pool) {
                    found = true;
                    for entry in entries {
                        push(entry, &mut merged);
                    }
                }
            } else if let Some(below) = paths::strip_prefix(prefix, &normalized) {
                found = true;
                let name = below.split('/').next().unwrap_or(below);
                push(DirEntry::new(name, FileType::Directory), &mut merged);
            }
        }

        if !found {
            return Err(ResolveError::NotFound(normalized));
        }
        merged.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(merged)
    }

    /// Snapshot of the mount table, in mount order
    pub fn mounts(&self) -> Vec<MountInfo> {
        self.mounts
            .iter()
            .map(|m| MountInfo {
                id: m.id,
                virtual_prefix: self.pool.resolve(m.prefix).to_string(),
                host_path: m.source.host_path().map(Path::to_path_buf),
                kind: m.source.kind(),
                mount_order: m.order,
            })
            .collect()
    }

    /// Archive index behind a mount, if it is archive-backed
    pub fn archive_index(&self, id: MountId) -> Option<&ArchiveIndex> {
        self.mounts
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.source.archive())
    }

    /// Check if a mount is still present
    pub fn is_mounted(&self, id: MountId) -> bool {
        self.mounts.iter().any(|m| m.id == id)
    }

    pub fn pool(&self) -> &StringPool {
        &self.pool
    }

    pub fn config(&self) -> &VfsConfig {
        &self.config
    }

    pub fn allocator(&self) -> &dyn BufferAllocator {
        self.allocator.as_ref()
    }
}

impl Default for VirtualFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for VirtualFilesystem
#[derive(Debug, Default)]
pub struct VirtualFilesystemBuilder {
    allocator: Option<Arc<dyn BufferAllocator>>,
    config: Option<VfsConfig>,
}

impl VirtualFilesystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `allocator` for every buffer the filesystem creates
    pub fn with_allocator(mut self, allocator: Arc<dyn BufferAllocator>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    pub fn with_config(mut self, config: VfsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> VirtualFilesystem {
        VirtualFilesystem {
            mounts: Vec::new(),
            pool: StringPool::new(),
            allocator: self
                .allocator
                .unwrap_or_else(|| Arc::new(SystemAllocator)),
            config: self.config.unwrap_or_default(),
            next_order: 0,
        }
    }
}
