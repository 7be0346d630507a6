/*!
 * Memory Module
 * Allocator capability threaded through the filesystem
 */

pub mod allocator;

pub use allocator::{
    AllocationError, AllocationStats, BufferAllocator, SystemAllocator, TrackingAllocator,
};
