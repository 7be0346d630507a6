/*!
 * Archive Storage
 * Random-access backing bytes for an archive index
 */

use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::memory::{AllocationError, BufferAllocator};

/// Positional read access to archive bytes
///
/// The index keeps its storage alive for as long as the index exists, so
/// entries can be decompressed lazily long after mounting.
pub trait ArchiveStorage: Send + Sync + fmt::Debug {
    /// Total length in bytes
    fn len(&self) -> u64;

    /// Fill `buf` from `offset`, failing with `UnexpectedEof` past the end
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned in-memory copy of an archive
pub struct MemoryStorage {
    data: Vec<u8>,
}

impl MemoryStorage {
    /// Copy `data` into a buffer obtained from `allocator`
    pub fn copy_from(data: &[u8], allocator: &dyn BufferAllocator) -> Result<Self, AllocationError> {
        Ok(Self {
            data: allocator.allocate_copy(data)?,
        })
    }

    /// Take ownership of an existing buffer
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("len", &self.data.len())
            .finish()
    }
}

impl ArchiveStorage for MemoryStorage {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(offset).map_err(|_| eof())?;
        let end = start.checked_add(buf.len()).ok_or_else(eof)?;
        let src = self.data.get(start..end).ok_or_else(eof)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

/// Open host file holding an archive
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    file: Mutex<File>,
    len: u64,
}

impl FileStorage {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveStorage for FileStorage {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let end = offset.checked_add(buf.len() as u64).ok_or_else(eof)?;
        if end > self.len {
            return Err(eof());
        }
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}

fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of archive")
}
