/*!
 * Entry Decoding
 * On-demand Store/Deflate decompression of archive entries
 */

use flate2::{Crc, Decompress, FlushDecompress, Status};
use tracing::warn;

use super::format::LocalFileHeader;
use super::reader::{ArchiveEntry, ArchiveIndex, CompressionMethod};
use crate::core::limits::LOCAL_FILE_HEADER_LEN;
use crate::memory::BufferAllocator;
use crate::vfs::config::VfsConfig;
use crate::vfs::types::FileError;

impl ArchiveIndex {
    /// Decompress `entry` into a buffer of exactly `uncompressed_size` bytes
    ///
    /// The whole entry is materialized; there is no streaming decompression.
    /// Any partially filled buffer is dropped on failure.
    pub fn read_entry(
        &self,
        entry: &ArchiveEntry,
        allocator: &dyn BufferAllocator,
        config: &VfsConfig,
    ) -> Result<Vec<u8>, FileError> {
        let size = entry.uncompressed_size as u64;
        if size > config.max_entry_size {
            return Err(FileError::TooLarge {
                size,
                limit: config.max_entry_size,
            });
        }

        let data_offset = self.data_offset(entry)?;
        let end = data_offset + entry.compressed_size as u64;
        if end > self.storage.len() {
            return Err(FileError::CorruptData(format!(
                "entry data ends at {} past archive end {}",
                end,
                self.storage.len()
            )));
        }

        let mut compressed = allocator.allocate_zeroed(entry.compressed_size as usize)?;
        self.storage
            .read_exact_at(data_offset, &mut compressed)
            .map_err(|e| FileError::Io(format!("read entry data: {}", e)))?;

        let output = match entry.method {
            CompressionMethod::Store => {
                if entry.compressed_size != entry.uncompressed_size {
                    return Err(FileError::CorruptData(format!(
                        "stored entry has compressed size {} but uncompressed size {}",
                        entry.compressed_size, entry.uncompressed_size
                    )));
                }
                compressed
            }
            CompressionMethod::Deflate => {
                inflate(&compressed, entry.uncompressed_size as usize, allocator)?
            }
        };

        if config.verify_crc {
            let mut crc = Crc::new();
            crc.update(&output);
            if crc.sum() != entry.crc32 {
                warn!(
                    expected = entry.crc32,
                    actual = crc.sum(),
                    "archive entry failed CRC check"
                );
                return Err(FileError::CorruptData(format!(
                    "crc mismatch: expected 0x{:08x}, got 0x{:08x}",
                    entry.crc32,
                    crc.sum()
                )));
            }
        }

        Ok(output)
    }

    /// Absolute offset of the entry data, read from its local file header
    fn data_offset(&self, entry: &ArchiveEntry) -> Result<u64, FileError> {
        let mut header = [0u8; LOCAL_FILE_HEADER_LEN];
        self.storage
            .read_exact_at(entry.local_header_offset, &mut header)
            .map_err(|_| {
                FileError::CorruptData(format!(
                    "local file header at offset {} is cut off",
                    entry.local_header_offset
                ))
            })?;

        let local = LocalFileHeader::parse(&header).ok_or_else(|| {
            FileError::CorruptData(format!(
                "bad local file header signature at offset {}",
                entry.local_header_offset
            ))
        })?;

        // The local header must agree with the central directory on the method
        match CompressionMethod::from_raw(local.method) {
            None => return Err(FileError::UnsupportedCompression(local.method)),
            Some(method) if method != entry.method => {
                return Err(FileError::CorruptData(format!(
                    "local header method {} disagrees with central directory",
                    local.method
                )));
            }
            Some(_) => {}
        }
        Ok(entry.local_header_offset + local.data_offset())
    }
}

/// Inflate a raw deflate stream that must produce exactly `expected_len` bytes
fn inflate(
    input: &[u8],
    expected_len: usize,
    allocator: &dyn BufferAllocator,
) -> Result<Vec<u8>, FileError> {
    let mut output = allocator.allocate_zeroed(expected_len)?;
    if expected_len == 0 {
        return Ok(output);
    }

    let mut decoder = Decompress::new(false);
    let status = decoder
        .decompress(input, &mut output, FlushDecompress::Finish)
        .map_err(|e| FileError::CorruptData(format!("deflate stream: {}", e)))?;

    if status != Status::StreamEnd {
        return Err(FileError::CorruptData(format!(
            "deflate stream did not end within {} bytes of output",
            expected_len
        )));
    }
    if decoder.total_out() != expected_len as u64 {
        return Err(FileError::CorruptData(format!(
            "deflate produced {} bytes, expected {}",
            decoder.total_out(),
            expected_len
        )));
    }

    Ok(output)
}
