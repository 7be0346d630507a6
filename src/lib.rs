/*!
 * Asset VFS Library
 * Virtual filesystem that overlays host directories and zip archives
 */

pub mod assets;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use assets::{load_file, load_text, AssetError, AssetLoader, MediaDecoder, SoundDecoder};
pub use crate::core::{Handle, StringPool};
pub use memory::{AllocationError, BufferAllocator, SystemAllocator, TrackingAllocator};
pub use monitoring::{init_tracing, TraceFormat};
pub use vfs::{
    FileError, FileHandle, MountError, MountId, MountSource, ResolveError, VfsConfig, VfsError,
    VirtualFilesystem,
};
