/*!
 * Archive Index
 * Central directory parsing into an interned path index
 */

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::debug;

use super::format::{CentralDirectoryHeader, EndOfCentralDirectory};
use super::storage::{ArchiveStorage, FileStorage, MemoryStorage};
use crate::core::limits::*;
use crate::core::{Handle, StringPool};
use crate::memory::{AllocationError, BufferAllocator};
use crate::vfs::paths;
use crate::vfs::types::{ArchiveError, DirEntry, FileType};

/// Supported compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMethod {
    Store,
    Deflate,
}

impl CompressionMethod {
    pub fn from_raw(method: u16) -> Option<Self> {
        match method {
            METHOD_STORE => Some(Self::Store),
            METHOD_DEFLATE => Some(Self::Deflate),
            _ => None,
        }
    }
}

/// One file stored in an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Interned, sanitized path relative to the archive root
    pub path: Handle,
    pub local_header_offset: u64,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub method: CompressionMethod,
    pub crc32: u32,
}

/// Why an entry was left out of the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedCompression(u16),
    PathTraversal,
    Encrypted,
    Zip64,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedCompression(m) => write!(f, "unsupported compression method {}", m),
            SkipReason::PathTraversal => f.write_str("path escapes archive root"),
            SkipReason::Encrypted => f.write_str("encrypted entry"),
            SkipReason::Zip64 => f.write_str("zip64 entry"),
        }
    }
}

/// Entry that did not make it into the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Raw name as stored in the archive (lossy UTF-8)
    pub name: String,
    pub reason: SkipReason,
}

/// Per-entry result of reading the central directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Included(ArchiveEntry),
    Directory(Handle),
    Skipped(SkippedEntry),
}

/// Read-only index of a mounted archive
///
/// Built once at mount time. Holds the archive storage so entry data can be
/// decompressed on demand for the lifetime of the index.
#[derive(Debug)]
pub struct ArchiveIndex {
    pub(super) storage: Box<dyn ArchiveStorage>,
    entries: HashMap<Handle, ArchiveEntry, RandomState>,
    directories: HashSet<Handle, RandomState>,
    skipped: Vec<SkippedEntry>,
}

impl ArchiveIndex {
    /// Copy `data` and index it
    pub fn from_buffer(
        data: &[u8],
        pool: &mut StringPool,
        allocator: &dyn BufferAllocator,
    ) -> Result<Self, ArchiveError> {
        let storage = MemoryStorage::copy_from(data, allocator)?;
        Self::parse(Box::new(storage), pool, allocator)
    }

    /// Open a host archive file and index it, keeping the file open
    pub fn open_file(
        path: &Path,
        pool: &mut StringPool,
        allocator: &dyn BufferAllocator,
    ) -> Result<Self, ArchiveError> {
        let storage = FileStorage::open(path)
            .map_err(|e| ArchiveError::Io(format!("open {}: {}", path.display(), e)))?;
        Self::parse(Box::new(storage), pool, allocator)
    }

    /// Index an archive held by `storage`
    pub fn parse(
        storage: Box<dyn ArchiveStorage>,
        pool: &mut StringPool,
        allocator: &dyn BufferAllocator,
    ) -> Result<Self, ArchiveError> {
        let outcomes = scan_central_directory(storage.as_ref(), pool, allocator)?;

        let mut entries = HashMap::with_capacity_and_hasher(outcomes.len(), RandomState::new());
        let mut directories = HashSet::with_hasher(RandomState::new());
        let mut skipped = Vec::new();

        directories.insert(pool.intern("")?);

        for outcome in outcomes {
            match outcome {
                EntryOutcome::Included(entry) => {
                    add_parents(pool.resolve(entry.path).to_owned(), pool, &mut directories)?;
                    entries.insert(entry.path, entry);
                }
                EntryOutcome::Directory(handle) => {
                    add_parents(pool.resolve(handle).to_owned(), pool, &mut directories)?;
                    directories.insert(handle);
                }
                EntryOutcome::Skipped(entry) => {
                    debug!(name = %entry.name, reason = %entry.reason, "skipping archive entry");
                    skipped.push(entry);
                }
            }
        }

        // A name listed as both file and directory resolves as the file
        directories.retain(|handle| !entries.contains_key(handle));

        Ok(Self {
            storage,
            entries,
            directories,
            skipped,
        })
    }

    /// File entry at `relative`, if any
    pub fn lookup(&self, relative: &str, pool: &StringPool) -> Option<&ArchiveEntry> {
        pool.get(relative).and_then(|handle| self.entries.get(&handle))
    }

    /// Whether `relative` names a directory (explicit or implied)
    pub fn is_dir(&self, relative: &str, pool: &StringPool) -> bool {
        pool.get(relative)
            .is_some_and(|handle| self.directories.contains(&handle))
    }

    /// Immediate children of the directory at `relative`
    pub fn list_dir(&self, relative: &str, pool: &StringPool) -> Option<Vec<DirEntry>> {
        if !self.is_dir(relative, pool) {
            return None;
        }

        let files = self
            .entries
            .keys()
            .map(|handle| (*handle, FileType::File));
        let dirs = self
            .directories
            .iter()
            .map(|handle| (*handle, FileType::Directory));

        let mut children: Vec<DirEntry> = files
            .chain(dirs)
            .filter_map(|(handle, file_type)| {
                let path = pool.resolve(handle);
                (!path.is_empty() && paths::parent(path) == relative)
                    .then(|| DirEntry::new(paths::file_name(path), file_type))
            })
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Some(children)
    }

    /// All file entries, in no particular order
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.values()
    }

    /// Entries left out of the index, with reasons
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Number of file entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn add_parents(
    mut path: String,
    pool: &mut StringPool,
    directories: &mut HashSet<Handle, RandomState>,
) -> Result<(), AllocationError> {
    while let Some((parent, _)) = path.rsplit_once('/') {
        let parent = parent.to_owned();
        if !directories.insert(pool.intern(&parent)?) {
            break;
        }
        path = parent;
    }
    Ok(())
}

/// Read every central directory record and classify it
///
/// Record-level damage (bad signature, truncation) aborts the scan. Problems
/// confined to one entry become [`EntryOutcome::Skipped`].
pub fn scan_central_directory(
    storage: &dyn ArchiveStorage,
    pool: &mut StringPool,
    allocator: &dyn BufferAllocator,
) -> Result<Vec<EntryOutcome>, ArchiveError> {
    let (eocd, eocd_offset) = locate_end_of_central_directory(storage, allocator)?;
    eocd.check_single_volume()?;
    if eocd.is_zip64() {
        return Err(ArchiveError::Zip64);
    }

    let cd_offset = eocd.central_directory_offset as u64;
    let cd_size = eocd.central_directory_size as u64;
    if cd_offset + cd_size > eocd_offset {
        return Err(ArchiveError::Truncated(format!(
            "central directory ({} bytes at offset {}) overlaps end record at {}",
            cd_size, cd_offset, eocd_offset
        )));
    }

    let mut directory = allocator.allocate_zeroed(cd_size as usize)?;
    storage
        .read_exact_at(cd_offset, &mut directory)
        .map_err(|e| ArchiveError::Io(format!("read central directory: {}", e)))?;

    let mut outcomes = Vec::with_capacity(eocd.total_entries as usize);
    let mut pos = 0usize;
    for _ in 0..eocd.total_entries {
        let header = CentralDirectoryHeader::parse(&directory, pos, cd_offset)?;
        pos += header.record_len;
        outcomes.push(classify(&header, pool)?);
    }

    Ok(outcomes)
}

fn locate_end_of_central_directory(
    storage: &dyn ArchiveStorage,
    allocator: &dyn BufferAllocator,
) -> Result<(EndOfCentralDirectory, u64), ArchiveError> {
    let len = storage.len();
    let window = (END_OF_CENTRAL_DIRECTORY_LEN + MAX_ARCHIVE_COMMENT_LEN) as u64;
    let tail_start = len.saturating_sub(window);

    let mut tail = allocator.allocate_zeroed((len - tail_start) as usize)?;
    storage
        .read_exact_at(tail_start, &mut tail)
        .map_err(|e| ArchiveError::Io(format!("read archive tail: {}", e)))?;

    EndOfCentralDirectory::find(&tail)
        .map(|(pos, record)| (record, tail_start + pos as u64))
        .ok_or(ArchiveError::MissingEndOfCentralDirectory)
}

fn classify(
    header: &CentralDirectoryHeader<'_>,
    pool: &mut StringPool,
) -> Result<EntryOutcome, AllocationError> {
    let raw_name = String::from_utf8_lossy(header.name);
    let skip = |reason| {
        Ok(EntryOutcome::Skipped(SkippedEntry {
            name: raw_name.to_string(),
            reason,
        }))
    };

    let Some(path) = paths::sanitize_entry_name(&raw_name) else {
        return skip(SkipReason::PathTraversal);
    };
    let is_directory = raw_name.ends_with('/') || raw_name.ends_with('\\');

    if is_directory {
        if path.is_empty() {
            return Ok(EntryOutcome::Directory(pool.intern("")?));
        }
        return Ok(EntryOutcome::Directory(pool.intern(&path)?));
    }
    if header.is_encrypted() {
        return skip(SkipReason::Encrypted);
    }
    if header.is_zip64() {
        return skip(SkipReason::Zip64);
    }
    let Some(method) = CompressionMethod::from_raw(header.method) else {
        return skip(SkipReason::UnsupportedCompression(header.method));
    };
    if path.is_empty() {
        return skip(SkipReason::PathTraversal);
    }

    Ok(EntryOutcome::Included(ArchiveEntry {
        path: pool.intern(&path)?,
        local_header_offset: header.local_header_offset as u64,
        compressed_size: header.compressed_size,
        uncompressed_size: header.uncompressed_size,
        method,
        crc32: header.crc32,
    }))
}
