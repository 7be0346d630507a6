/*!
 * Asset Loader
 * Raw, text, and typed asset loading from a virtual filesystem
 */

use bytes::Bytes;
use tracing::debug;

use super::decoder::{MediaDecoder, SoundDecoder, SoundFormat};
use super::errors::AssetError;
use crate::vfs::{FileError, VirtualFilesystem};

/// Load a whole file
///
/// The returned buffer's length is the file's exact length.
pub fn load_file(vfs: &VirtualFilesystem, path: &str) -> Result<Bytes, FileError> {
    vfs.read_all(path).map(Bytes::from)
}

/// Load a file followed by a single nul terminator byte
///
/// A file of N bytes yields N + 1 bytes; the first N equal [`load_file`].
/// Both buffers come from the filesystem's allocator.
pub fn load_text(vfs: &VirtualFilesystem, path: &str) -> Result<Bytes, FileError> {
    let data = vfs.read_all(path)?;
    let mut text = vfs.allocator().allocate(data.len() + 1)?;
    text.extend_from_slice(&data);
    text.push(0);
    Ok(Bytes::from(text))
}

/// Typed asset loader
///
/// Each typed load reads the file, hands the bytes to the decoder, and drops
/// the intermediate buffer whether or not decoding succeeded.
#[derive(Debug)]
pub struct AssetLoader<'a, D> {
    vfs: &'a VirtualFilesystem,
    decoder: D,
}

impl<'a, D: MediaDecoder> AssetLoader<'a, D> {
    pub fn new(vfs: &'a VirtualFilesystem, decoder: D) -> Self {
        Self { vfs, decoder }
    }

    pub fn vfs(&self) -> &'a VirtualFilesystem {
        self.vfs
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn load_file(&self, path: &str) -> Result<Bytes, FileError> {
        load_file(self.vfs, path)
    }

    pub fn load_text(&self, path: &str) -> Result<Bytes, FileError> {
        load_text(self.vfs, path)
    }

    pub fn load_image(&self, path: &str) -> Result<D::Image, AssetError<D::Error>> {
        self.decode(path, "image", |decoder, data| decoder.decode_image(data))
    }

    pub fn load_font_bmf(
        &self,
        path: &str,
        characters: &str,
    ) -> Result<D::Font, AssetError<D::Error>> {
        self.decode(path, "bmf font", |decoder, data| {
            decoder.decode_font_bmf(data, characters)
        })
    }

    pub fn load_font_tty(
        &self,
        path: &str,
        glyph_width: u32,
        glyph_height: u32,
        characters: &str,
    ) -> Result<D::Font, AssetError<D::Error>> {
        self.decode(path, "tty font", |decoder, data| {
            decoder.decode_font_tty(data, glyph_width, glyph_height, characters)
        })
    }

    pub fn load_font_ttf(&self, path: &str, font_size: u32) -> Result<D::Font, AssetError<D::Error>> {
        self.decode(path, "ttf font", |decoder, data| {
            decoder.decode_font_ttf(data, font_size)
        })
    }

    fn decode<T, F>(&self, path: &str, what: &str, f: F) -> Result<T, AssetError<D::Error>>
    where
        F: FnOnce(&D, &[u8]) -> Result<T, D::Error>,
    {
        let data = self.vfs.read_all(path)?;
        debug!(path, kind = what, bytes = data.len(), "Decoding asset");

        f(&self.decoder, &data).map_err(|source| AssetError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

impl<'a, D: SoundDecoder> AssetLoader<'a, D> {
    /// Load a sound, choosing the container format from the path's extension
    pub fn load_sound(&self, path: &str) -> Result<D::Sound, AssetError<D::Error>> {
        let format = SoundFormat::from_path(path);
        self.decode(path, "sound", |decoder, data| {
            decoder.decode_sound(format, data)
        })
    }
}
