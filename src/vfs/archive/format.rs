/*!
 * Zip Record Layouts
 * Fixed-size little-endian records of the zip container format
 */

use crate::core::limits::*;
use crate::vfs::types::ArchiveError;

#[inline]
fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

#[inline]
fn le_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// End of central directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub disk_number: u16,
    pub central_directory_disk: u16,
    pub entries_on_disk: u16,
    pub total_entries: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    /// Locate the record by scanning backward from the end of `tail`
    ///
    /// Returns the record and its position within `tail`. A candidate is
    /// accepted only if its declared comment fits inside `tail`, so data
    /// appended after the archive does not confuse the scan unless it
    /// happens to contain a valid-looking record itself.
    pub fn find(tail: &[u8]) -> Option<(usize, Self)> {
        if tail.len() < END_OF_CENTRAL_DIRECTORY_LEN {
            return None;
        }

        let last = tail.len() - END_OF_CENTRAL_DIRECTORY_LEN;
        (0..=last).rev().find_map(|pos| {
            if le_u32(tail, pos) != END_OF_CENTRAL_DIRECTORY_SIGNATURE {
                return None;
            }
            let record = Self::parse_at(tail, pos);
            let end = pos + END_OF_CENTRAL_DIRECTORY_LEN + record.comment_len as usize;
            (end <= tail.len()).then_some((pos, record))
        })
    }

    fn parse_at(buf: &[u8], pos: usize) -> Self {
        Self {
            disk_number: le_u16(buf, pos + 4),
            central_directory_disk: le_u16(buf, pos + 6),
            entries_on_disk: le_u16(buf, pos + 8),
            total_entries: le_u16(buf, pos + 10),
            central_directory_size: le_u32(buf, pos + 12),
            central_directory_offset: le_u32(buf, pos + 16),
            comment_len: le_u16(buf, pos + 20),
        }
    }

    /// Reject archives split across several disks
    pub fn check_single_volume(&self) -> Result<(), ArchiveError> {
        if self.disk_number != 0 {
            return Err(ArchiveError::MultiVolume {
                disk: self.disk_number,
            });
        }
        if self.central_directory_disk != 0 {
            return Err(ArchiveError::MultiVolume {
                disk: self.central_directory_disk,
            });
        }
        if self.entries_on_disk != self.total_entries {
            return Err(ArchiveError::MultiVolume {
                disk: self.disk_number,
            });
        }
        Ok(())
    }

    /// Whether the record defers to a zip64 end of central directory
    pub fn is_zip64(&self) -> bool {
        self.total_entries == ZIP64_SENTINEL_U16
            || self.central_directory_size == ZIP64_SENTINEL_U32
            || self.central_directory_offset == ZIP64_SENTINEL_U32
    }
}

/// Central directory file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryHeader<'a> {
    pub flags: u16,
    pub method: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_start: u16,
    pub local_header_offset: u32,
    pub name: &'a [u8],
    /// Total length of this record including variable fields
    pub record_len: usize,
}

impl<'a> CentralDirectoryHeader<'a> {
    /// Parse the record starting at `pos` within the central directory bytes
    ///
    /// `base` is the absolute archive offset of `directory`, used in errors.
    pub fn parse(directory: &'a [u8], pos: usize, base: u64) -> Result<Self, ArchiveError> {
        let fixed_end = pos + CENTRAL_DIRECTORY_HEADER_LEN;
        if fixed_end > directory.len() {
            return Err(ArchiveError::Truncated(format!(
                "central directory record at offset {} is cut off",
                base + pos as u64
            )));
        }
        if le_u32(directory, pos) != CENTRAL_DIRECTORY_SIGNATURE {
            return Err(ArchiveError::BadSignature {
                offset: base + pos as u64,
                expected: CENTRAL_DIRECTORY_SIGNATURE,
            });
        }

        let name_len = le_u16(directory, pos + 28) as usize;
        let extra_len = le_u16(directory, pos + 30) as usize;
        let comment_len = le_u16(directory, pos + 32) as usize;
        let record_len = CENTRAL_DIRECTORY_HEADER_LEN + name_len + extra_len + comment_len;

        if pos + record_len > directory.len() {
            return Err(ArchiveError::Truncated(format!(
                "central directory record at offset {} runs past the directory",
                base + pos as u64
            )));
        }

        Ok(Self {
            flags: le_u16(directory, pos + 8),
            method: le_u16(directory, pos + 10),
            crc32: le_u32(directory, pos + 16),
            compressed_size: le_u32(directory, pos + 20),
            uncompressed_size: le_u32(directory, pos + 24),
            disk_start: le_u16(directory, pos + 34),
            local_header_offset: le_u32(directory, pos + 42),
            name: &directory[fixed_end..fixed_end + name_len],
            record_len,
        })
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    #[inline]
    pub fn is_zip64(&self) -> bool {
        self.compressed_size == ZIP64_SENTINEL_U32
            || self.uncompressed_size == ZIP64_SENTINEL_U32
            || self.local_header_offset == ZIP64_SENTINEL_U32
            || self.disk_start == ZIP64_SENTINEL_U16
    }
}

/// Local file header (fixed part only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub method: u16,
    pub name_len: u16,
    pub extra_len: u16,
}

impl LocalFileHeader {
    /// Parse the fixed header; `None` if the signature does not match
    pub fn parse(buf: &[u8; LOCAL_FILE_HEADER_LEN]) -> Option<Self> {
        if le_u32(buf, 0) != LOCAL_FILE_HEADER_SIGNATURE {
            return None;
        }
        Some(Self {
            method: le_u16(buf, 8),
            name_len: le_u16(buf, 26),
            extra_len: le_u16(buf, 28),
        })
    }

    /// Distance from the header start to the entry data
    #[inline]
    pub fn data_offset(&self) -> u64 {
        LOCAL_FILE_HEADER_LEN as u64 + self.name_len as u64 + self.extra_len as u64
    }
}
