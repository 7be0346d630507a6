/*!
 * Asset Error Types
 */

use std::error::Error;
use thiserror::Error;

use crate::vfs::FileError;

/// Failure to load a typed asset
///
/// Keeps "could not read the bytes" apart from "read them but could not
/// decode them".
#[derive(Error, Debug)]
pub enum AssetError<E>
where
    E: Error + 'static,
{
    #[error(transparent)]
    File(#[from] FileError),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: E,
    },
}

impl<E> AssetError<E>
where
    E: Error + 'static,
{
    /// The underlying read error, if the bytes could not be loaded
    pub fn as_file_error(&self) -> Option<&FileError> {
        match self {
            AssetError::File(e) => Some(e),
            AssetError::Decode { .. } => None,
        }
    }
}
