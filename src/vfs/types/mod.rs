/*!
 * VFS Types
 */

mod entry;
mod errors;

pub use entry::{DirEntry, FileType, Metadata, MountId, MountInfo, MountKind};
pub use errors::{ArchiveError, FileError, MountError, ResolveError, VfsError, VfsResult};
