/*!
 * Buffer Allocator Capability
 * Explicitly injected allocation for archive copies and loaded assets
 */

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Allocation failure
///
/// Aborts only the operation that requested the memory. Mounts that already
/// exist are left untouched.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[error("Allocation of {requested} bytes failed: {reason}")]
pub struct AllocationError {
    pub requested: usize,
    pub reason: String,
}

impl AllocationError {
    pub fn new(requested: usize, reason: impl Into<String>) -> Self {
        Self {
            requested,
            reason: reason.into(),
        }
    }
}

/// Source of byte buffers
///
/// Every buffer the filesystem hands out or keeps (in-memory archive copies,
/// central directory scratch space, decompressed entries, loaded files) is
/// obtained through this capability. It is threaded through constructors
/// rather than bound globally, so tests can substitute a tracking or
/// limited allocator.
pub trait BufferAllocator: Send + Sync + fmt::Debug {
    /// Allocate an empty vector with capacity for exactly `len` bytes
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocationError>;

    /// Allocate a zero-filled buffer of `len` bytes
    fn allocate_zeroed(&self, len: usize) -> Result<Vec<u8>, AllocationError> {
        let mut buf = self.allocate(len)?;
        buf.resize(len, 0);
        Ok(buf)
    }

    /// Allocate a copy of `data`
    fn allocate_copy(&self, data: &[u8]) -> Result<Vec<u8>, AllocationError> {
        let mut buf = self.allocate(data.len())?;
        buf.extend_from_slice(data);
        Ok(buf)
    }
}

/// Global-heap allocator with fallible reservation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocationError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|e| AllocationError::new(len, e.to_string()))?;
        Ok(buf)
    }
}

/// Allocation statistics recorded by [`TrackingAllocator`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStats {
    pub allocations: u64,
    pub failures: u64,
    pub total_bytes: u64,
    pub largest: usize,
}

/// Allocator that counts requests and optionally enforces a per-request limit
///
/// Requests above `limit` fail with [`AllocationError`] instead of reaching
/// the heap, which makes allocation failure paths testable.
#[derive(Debug, Default)]
pub struct TrackingAllocator {
    limit: Option<usize>,
    stats: Mutex<AllocationStats>,
}

impl TrackingAllocator {
    /// Create an unlimited tracking allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracking allocator that rejects requests larger than `limit`
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            stats: Mutex::new(AllocationStats::default()),
        }
    }

    /// Snapshot of the statistics so far
    pub fn stats(&self) -> AllocationStats {
        *self.stats.lock()
    }
}

impl BufferAllocator for TrackingAllocator {
    fn allocate(&self, len: usize) -> Result<Vec<u8>, AllocationError> {
        let mut stats = self.stats.lock();

        if let Some(limit) = self.limit {
            if len > limit {
                stats.failures += 1;
                return Err(AllocationError::new(
                    len,
                    format!("exceeds allocator limit of {} bytes", limit),
                ));
            }
        }

        let buf = SystemAllocator.allocate(len).inspect_err(|_| {
            stats.failures += 1;
        })?;

        stats.allocations += 1;
        stats.total_bytes += len as u64;
        stats.largest = stats.largest.max(len);
        Ok(buf)
    }
}
