/*!
 * File Handle
 * Read cursor over a resolved host file or archive entry
 */

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use super::archive::{ArchiveEntry, ArchiveIndex};
use super::config::VfsConfig;
use super::traits::Located;
use super::types::*;
use crate::memory::BufferAllocator;

enum Backing<'a> {
    Host(File),
    Archive {
        index: &'a ArchiveIndex,
        entry: &'a ArchiveEntry,
        /// Whole entry, decompressed on first access
        data: Option<Cursor<Vec<u8>>>,
    },
}

/// Open file
///
/// Host files are read straight through. Archive entries are decompressed in
/// full into an allocator buffer on the first read or seek.
pub struct FileHandle<'a> {
    path: String,
    size: u64,
    backing: Backing<'a>,
    allocator: &'a dyn BufferAllocator,
    config: VfsConfig,
}

impl<'a> FileHandle<'a> {
    pub(crate) fn open(
        located: Located<'a>,
        path: String,
        allocator: &'a dyn BufferAllocator,
        config: VfsConfig,
    ) -> Result<Self, FileError> {
        let size = located.metadata().size;
        let backing = match located {
            Located::HostFile { path: host, .. } => {
                let file = File::open(&host)
                    .map_err(|e| FileError::Io(format!("open {}: {}", host.display(), e)))?;
                Backing::Host(file)
            }
            Located::ArchiveFile { index, entry } => Backing::Archive {
                index,
                entry,
                data: None,
            },
            Located::HostDirectory(_) | Located::ArchiveDirectory => {
                return Err(FileError::IsDirectory(path));
            }
        };

        Ok(Self {
            path,
            size,
            backing,
            allocator,
            config,
        })
    }

    /// Size of the file content (decompressed size for archive entries)
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Virtual path this handle was opened from
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read up to `buf.len()` bytes at the cursor, returning the count read
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, FileError> {
        match &mut self.backing {
            Backing::Host(file) => file
                .read(buf)
                .map_err(|e| FileError::Io(format!("read {}: {}", self.path, e))),
            Backing::Archive { .. } => {
                let cursor = self.materialize()?;
                // Reads from an in-memory cursor cannot fail
                Ok(cursor.read(buf).unwrap_or(0))
            }
        }
    }

    /// Consume the handle, returning the full content in an exactly sized buffer
    pub fn into_bytes(self) -> Result<Vec<u8>, FileError> {
        if self.size > self.config.max_entry_size {
            return Err(FileError::TooLarge {
                size: self.size,
                limit: self.config.max_entry_size,
            });
        }

        match self.backing {
            Backing::Host(file) => {
                let size = self.size as usize;
                let mut buf = self.allocator.allocate(size)?;
                file.take(self.size)
                    .read_to_end(&mut buf)
                    .map_err(|e| FileError::Io(format!("read {}: {}", self.path, e)))?;
                if buf.len() != size {
                    return Err(FileError::Io(format!(
                        "short read {}: expected {} bytes, got {}",
                        self.path,
                        size,
                        buf.len()
                    )));
                }
                Ok(buf)
            }
            Backing::Archive {
                data: Some(cursor), ..
            } => Ok(cursor.into_inner()),
            Backing::Archive { index, entry, .. } => {
                index.read_entry(entry, self.allocator, &self.config)
            }
        }
    }

    fn materialize(&mut self) -> Result<&mut Cursor<Vec<u8>>, FileError> {
        let Backing::Archive { index, entry, data } = &mut self.backing else {
            return Err(FileError::Io(format!("{} is not archive-backed", self.path)));
        };

        if data.is_none() {
            let bytes = index.read_entry(entry, self.allocator, &self.config)?;
            *data = Some(Cursor::new(bytes));
        }
        Ok(data.get_or_insert_with(|| Cursor::new(Vec::new())))
    }
}

impl Read for FileHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Seek for FileHandle<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.backing {
            Backing::Host(file) => file.seek(pos),
            Backing::Archive { .. } => self
                .materialize()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
                .seek(pos),
        }
    }
}

impl std::fmt::Debug for FileHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backing = match &self.backing {
            Backing::Host(_) => "host",
            Backing::Archive { .. } => "archive",
        };
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("backing", &backing)
            .finish()
    }
}
