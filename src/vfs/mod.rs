/*!
 * Virtual File System Module
 * Mount table over host directories and zip archives
 */

pub mod archive;
pub mod config;
pub mod handle;
pub mod local;
pub mod mount;
pub mod paths;
pub mod traits;
pub mod types;

// Re-exports
pub use archive::{ArchiveEntry, ArchiveFS, ArchiveIndex, CompressionMethod, EntryOutcome, SkipReason, SkippedEntry};
pub use config::VfsConfig;
pub use handle::FileHandle;
pub use local::LocalFS;
pub use mount::{MountSource, ResolvedFile, VirtualFilesystem, VirtualFilesystemBuilder};
pub use traits::{AssetSource, Located};
pub use types::{
    ArchiveError, DirEntry, FileError, FileType, Metadata, MountError, MountId, MountInfo,
    MountKind, ResolveError, VfsError, VfsResult,
};
