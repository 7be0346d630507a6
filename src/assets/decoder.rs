/*!
 * Media Decoders
 * Collaborator traits for turning asset bytes into images, fonts, and sounds
 */

use serde::{Deserialize, Serialize};
use std::error::Error;

/// Printable ASCII, the glyph order bitmap fonts are usually laid out in
pub const DEFAULT_FONT_CHARACTERS: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Decoder for images and fonts
///
/// The loader owns the byte buffer and drops it once the decoder returns,
/// whatever the outcome. Implementations copy what they need to keep.
pub trait MediaDecoder {
    type Image;
    type Font;
    type Error: Error + Send + Sync + 'static;

    fn decode_image(&self, data: &[u8]) -> Result<Self::Image, Self::Error>;

    /// Bitmap font: glyphs separated by marker-colored columns
    fn decode_font_bmf(&self, data: &[u8], characters: &str) -> Result<Self::Font, Self::Error>;

    /// Fixed-cell "TTY" font image
    fn decode_font_tty(
        &self,
        data: &[u8],
        glyph_width: u32,
        glyph_height: u32,
        characters: &str,
    ) -> Result<Self::Font, Self::Error>;

    /// TrueType font rasterized at `font_size` pixels
    fn decode_font_ttf(&self, data: &[u8], font_size: u32) -> Result<Self::Font, Self::Error>;
}

/// Container format of a sound file, taken from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundFormat {
    Wav,
    Ogg,
    Mp3,
    Flac,
    Unknown,
}

impl SoundFormat {
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let Some((_, ext)) = name.rsplit_once('.') else {
            return SoundFormat::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "wav" => SoundFormat::Wav,
            "ogg" => SoundFormat::Ogg,
            "mp3" => SoundFormat::Mp3,
            "flac" => SoundFormat::Flac,
            _ => SoundFormat::Unknown,
        }
    }
}

/// Decoder for sounds
///
/// Separate from [`MediaDecoder`] so loaders without audio support simply
/// do not offer `load_sound`.
pub trait SoundDecoder: MediaDecoder {
    type Sound;

    fn decode_sound(&self, format: SoundFormat, data: &[u8]) -> Result<Self::Sound, Self::Error>;
}
