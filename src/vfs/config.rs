/*!
 * Filesystem Configuration
 *
 * Runtime options supplied through the VirtualFilesystem builder
 */

use crate::core::limits::{DEFAULT_MAX_ENTRY_SIZE, DEFAULT_MAX_MOUNTS};

/// Filesystem configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsConfig {
    /// Check the CRC-32 of every decompressed archive entry
    pub verify_crc: bool,
    /// Largest file (decompressed) that may be read into memory
    pub max_entry_size: u64,
    /// Maximum number of simultaneous mounts
    pub max_mounts: usize,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            verify_crc: true,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            max_mounts: DEFAULT_MAX_MOUNTS,
        }
    }
}

impl VfsConfig {
    /// Verify everything, with a tighter entry size cap (16MB)
    pub const fn strict() -> Self {
        Self {
            verify_crc: true,
            max_entry_size: 16 * 1024 * 1024,
            max_mounts: DEFAULT_MAX_MOUNTS,
        }
    }

    /// Skip CRC verification for faster loads of trusted archives
    pub const fn permissive() -> Self {
        Self {
            verify_crc: false,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            max_mounts: DEFAULT_MAX_MOUNTS,
        }
    }

    pub const fn with_verify_crc(mut self, verify_crc: bool) -> Self {
        self.verify_crc = verify_crc;
        self
    }

    pub const fn with_max_entry_size(mut self, max_entry_size: u64) -> Self {
        self.max_entry_size = max_entry_size;
        self
    }

    pub const fn with_max_mounts(mut self, max_mounts: usize) -> Self {
        self.max_mounts = max_mounts;
        self
    }
}
