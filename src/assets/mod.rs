/*!
 * Assets Module
 * Loading raw bytes, text, and decoded media through the virtual filesystem
 */

pub mod decoder;
pub mod errors;
pub mod loader;

pub use decoder::{MediaDecoder, SoundDecoder, SoundFormat, DEFAULT_FONT_CHARACTERS};
pub use errors::AssetError;
pub use loader::{load_file, load_text, AssetLoader};
