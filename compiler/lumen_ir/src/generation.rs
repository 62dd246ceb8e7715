//! Program generations.
//!
//! Every program instance owns a fresh `GenerationId`. Symbols and AST nodes
//! are stamped with it, so that a value minted by one program can never be
//! mistaken for a value of another without going through a clone.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Next generation to hand out. Zero is reserved for "no generation".
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

/// Identifier of one program instance.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct GenerationId(u32);

impl GenerationId {
    /// Placeholder generation that no program ever owns.
    pub const NONE: GenerationId = GenerationId(0);

    /// Allocate a process-unique generation.
    pub fn next() -> Self {
        GenerationId(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a real generation.
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_some() {
            write!(f, "Gen({})", self.0)
        } else {
            write!(f, "Gen::NONE")
        }
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests;
