/*!
 * Core Module
 * Fundamental data structures and constants
 */

pub mod data_structures;
pub mod limits;

pub use data_structures::{Handle, StringPool};
