/*!
 * Data Structures
 */

pub mod string_pool;

pub use string_pool::{Handle, StringPool};
