/*!
 * Limits and Format Constants
 *
 * Centralized location for size limits, thresholds, and zip format magic numbers.
 * Organized by domain for maintainability and discoverability.
 *
 * - Security-relevant values are marked with [SECURITY]
 * - Values fixed by the zip file format are marked with [FORMAT]
 */

// =============================================================================
// ASSET LIMITS
// =============================================================================

/// Largest single entry (decompressed) the filesystem will materialize (256MB)
/// Entries are asset-sized; anything larger is treated as corrupt input
/// [SECURITY] Bounds the allocation a hostile size field can request
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 256 * 1024 * 1024;

/// Default cap on simultaneously mounted sources
pub const DEFAULT_MAX_MOUNTS: usize = 1024;

/// Initial capacity of the string pool
pub const STRING_POOL_INITIAL_CAPACITY: usize = 256;

// =============================================================================
// ZIP FORMAT
// =============================================================================

/// Local file header signature `PK\x03\x04`
/// [FORMAT]
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;

/// Central directory file header signature `PK\x01\x02`
/// [FORMAT]
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;

/// End of central directory record signature `PK\x05\x06`
/// [FORMAT]
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;

/// Fixed part of a local file header
/// [FORMAT]
pub const LOCAL_FILE_HEADER_LEN: usize = 30;

/// Fixed part of a central directory file header
/// [FORMAT]
pub const CENTRAL_DIRECTORY_HEADER_LEN: usize = 46;

/// Fixed part of the end of central directory record
/// [FORMAT]
pub const END_OF_CENTRAL_DIRECTORY_LEN: usize = 22;

/// Longest archive comment; bounds the backward EOCD scan
/// [FORMAT]
pub const MAX_ARCHIVE_COMMENT_LEN: usize = u16::MAX as usize;

/// Sentinel marking a field whose real value lives in a zip64 extra block
/// [FORMAT]
pub const ZIP64_SENTINEL_U32: u32 = u32::MAX;

/// Sentinel for 16-bit zip64 fields (entry counts, disk numbers)
/// [FORMAT]
pub const ZIP64_SENTINEL_U16: u16 = u16::MAX;

/// Compression method: stored
/// [FORMAT]
pub const METHOD_STORE: u16 = 0;

/// Compression method: deflate
/// [FORMAT]
pub const METHOD_DEFLATE: u16 = 8;

/// General purpose flag bit: entry is encrypted
/// [FORMAT]
pub const FLAG_ENCRYPTED: u16 = 0x0001;
