/*!
 * Shared Test Helpers
 * Minimal zip writer and header-only media decoders
 */

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use asset_vfs::assets::{MediaDecoder, SoundDecoder, SoundFormat};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use thiserror::Error;

pub const METHOD_STORE: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;
pub const METHOD_BZIP2: u16 = 12;

/// Path of a checked-in fixture
pub fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join(name)
}

pub fn resources_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("resources")
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

struct ZipEntry {
    name: Vec<u8>,
    method: u16,
    flags: u16,
    crc: u32,
    uncompressed_size: u32,
    payload: Vec<u8>,
}

/// Builds zip archives entry by entry
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<ZipEntry>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, METHOD_STORE, 0, crc32(data), data.len() as u32, data.to_vec())
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, METHOD_DEFLATE, 0, crc32(data), data.len() as u32, deflate(data))
    }

    pub fn directory(self, name: &str) -> Self {
        self.raw(name, METHOD_STORE, 0, 0, 0, Vec::new())
    }

    /// Stored entry whose recorded CRC does not match its content
    pub fn stored_with_crc(self, name: &str, data: &[u8], crc: u32) -> Self {
        self.raw(name, METHOD_STORE, 0, crc, data.len() as u32, data.to_vec())
    }

    /// Entry with full control over every recorded field
    pub fn raw(
        mut self,
        name: &str,
        method: u16,
        flags: u16,
        crc: u32,
        uncompressed_size: u32,
        payload: Vec<u8>,
    ) -> Self {
        self.entries.push(ZipEntry {
            name: name.as_bytes().to_vec(),
            method,
            flags,
            crc,
            uncompressed_size,
            payload,
        });
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            offsets.push(out.len() as u32);
            out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
            out.extend_from_slice(&20u16.to_le_bytes());
            out.extend_from_slice(&entry.flags.to_le_bytes());
            out.extend_from_slice(&entry.method.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // time
            out.extend_from_slice(&0u16.to_le_bytes()); // date
            out.extend_from_slice(&entry.crc.to_le_bytes());
            out.extend_from_slice(&(entry.payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&entry.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // extra
            out.extend_from_slice(&entry.name);
            out.extend_from_slice(&entry.payload);
        }

        let cd_offset = out.len() as u32;
        for (entry, offset) in self.entries.iter().zip(&offsets) {
            out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
            out.extend_from_slice(&20u16.to_le_bytes()); // made by
            out.extend_from_slice(&20u16.to_le_bytes()); // needed
            out.extend_from_slice(&entry.flags.to_le_bytes());
            out.extend_from_slice(&entry.method.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes());
            out.extend_from_slice(&entry.crc.to_le_bytes());
            out.extend_from_slice(&(entry.payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&entry.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // extra
            out.extend_from_slice(&0u16.to_le_bytes()); // comment
            out.extend_from_slice(&0u16.to_le_bytes()); // disk
            out.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
            out.extend_from_slice(&0u32.to_le_bytes()); // external attrs
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&entry.name);
        }
        let cd_size = out.len() as u32 - cd_offset;

        let count = self.entries.len() as u16;
        out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // this disk
        out.extend_from_slice(&0u16.to_le_bytes()); // cd disk
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.comment);
        out
    }
}

/// Offset of the end-of-central-directory record in an archive built without a comment
pub fn eocd_offset(archive: &[u8]) -> usize {
    archive.len() - 22
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a PNG image")]
    NotPng,
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

/// Reads image dimensions from a PNG IHDR chunk and nothing else
#[derive(Debug, Default)]
pub struct PngHeaderDecoder;

impl MediaDecoder for PngHeaderDecoder {
    type Image = ImageInfo;
    type Font = usize;
    type Error = DecodeError;

    fn decode_image(&self, data: &[u8]) -> Result<ImageInfo, DecodeError> {
        const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
        if data.len() < 24 || &data[..8] != SIGNATURE || &data[12..16] != b"IHDR" {
            return Err(DecodeError::NotPng);
        }
        let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        Ok(ImageInfo { width, height })
    }

    fn decode_font_bmf(&self, data: &[u8], characters: &str) -> Result<usize, DecodeError> {
        self.decode_image(data)?;
        Ok(characters.chars().count())
    }

    fn decode_font_tty(
        &self,
        data: &[u8],
        glyph_width: u32,
        glyph_height: u32,
        characters: &str,
    ) -> Result<usize, DecodeError> {
        let image = self.decode_image(data)?;
        if glyph_width == 0 || glyph_height == 0 {
            return Err(DecodeError::Unsupported("zero glyph size"));
        }
        let cells = (image.width / glyph_width) * (image.height / glyph_height);
        Ok(characters.chars().count().min(cells as usize))
    }

    fn decode_font_ttf(&self, _data: &[u8], _font_size: u32) -> Result<usize, DecodeError> {
        Err(DecodeError::Unsupported("truetype"))
    }
}

impl SoundDecoder for PngHeaderDecoder {
    type Sound = (SoundFormat, usize);

    fn decode_sound(&self, format: SoundFormat, data: &[u8]) -> Result<Self::Sound, DecodeError> {
        Ok((format, data.len()))
    }
}
