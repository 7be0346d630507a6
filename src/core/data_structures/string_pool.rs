/*!
 * String Pool
 * Interning of path strings for O(1) equality and hashing
 */

use ahash::RandomState;
use smartstring::alias::String as SmartString;
use std::collections::HashMap;

use crate::core::limits::STRING_POOL_INITIAL_CAPACITY;
use crate::memory::AllocationError;

/// Handle to an interned string
///
/// Handles compare by identity. A handle is only meaningful for the pool
/// that produced it and stays valid for that pool's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32);

impl Handle {
    /// Raw index into the pool
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Pool-lifetime string interner
///
/// Interned strings are never released individually; they live until the
/// pool is dropped. Short strings (most path components and asset names) are
/// stored inline without a separate heap allocation.
#[derive(Debug)]
pub struct StringPool {
    strings: Vec<SmartString>,
    lookup: HashMap<SmartString, Handle, RandomState>,
}

impl StringPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            strings: Vec::with_capacity(STRING_POOL_INITIAL_CAPACITY),
            lookup: HashMap::with_capacity_and_hasher(
                STRING_POOL_INITIAL_CAPACITY,
                RandomState::new(),
            ),
        }
    }

    /// Intern `s`, returning the existing handle if the content is already pooled
    pub fn intern(&mut self, s: &str) -> Result<Handle, AllocationError> {
        if let Some(&handle) = self.lookup.get(s) {
            return Ok(handle);
        }

        let index = u32::try_from(self.strings.len())
            .map_err(|_| AllocationError::new(s.len(), "string pool handle space exhausted"))?;

        self.strings
            .try_reserve(1)
            .map_err(|e| AllocationError::new(s.len(), e.to_string()))?;
        self.lookup
            .try_reserve(1)
            .map_err(|e| AllocationError::new(s.len(), e.to_string()))?;

        let handle = Handle(index);
        let owned = SmartString::from(s);
        self.strings.push(owned.clone());
        self.lookup.insert(owned, handle);
        Ok(handle)
    }

    /// Look up a handle without interning
    #[inline]
    pub fn get(&self, s: &str) -> Option<Handle> {
        self.lookup.get(s).copied()
    }

    /// Resolve a handle back to its string
    ///
    /// # Panics
    /// Panics if the handle came from a different pool with more entries.
    #[inline]
    pub fn resolve(&self, handle: Handle) -> &str {
        self.strings[handle.0 as usize].as_str()
    }

    /// Compare two handles by identity
    #[inline(always)]
    pub fn equals(a: Handle, b: Handle) -> bool {
        a == b
    }

    /// Number of distinct strings interned
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}
