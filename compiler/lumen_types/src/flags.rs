//! Pre-computed type metadata flags.
//!
//! `TypeFlags` are computed once when a type is interned, so queries like
//! "is this host-shareable?" never walk the type graph.

use bitflags::bitflags;

bitflags! {
    /// Pre-computed type properties for O(1) queries.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        // === Category Flags ===

        /// `bool`, `i32`, `u32` or `f32`.
        const IS_SCALAR = 1 << 0;
        /// Numeric scalar, or a vector or matrix of them.
        const IS_NUMERIC = 1 << 1;
        /// `i32`/`u32` or a vector of them.
        const IS_INTEGER = 1 << 2;
        /// `f32` or a vector or matrix of it.
        const IS_FLOAT = 1 << 3;
        /// `bool` or a vector of it.
        const IS_BOOLEAN = 1 << 4;
        /// Sampler or texture.
        const IS_HANDLE = 1 << 5;

        // === Capability Flags ===

        /// Can be built with a type constructor expression.
        const CONSTRUCTIBLE = 1 << 8;
        /// Has a defined memory layout for uniform and storage buffers.
        const HOST_SHAREABLE = 1 << 9;

        // === Presence Flags ===

        /// Contains a runtime-sized array.
        const HAS_RUNTIME_ARRAY = 1 << 12;
        /// Contains a pointer.
        const HAS_POINTER = 1 << 13;
    }
}

impl TypeFlags {
    /// Flags that propagate from a component to an aggregate containing it.
    pub const PROPAGATE: TypeFlags = TypeFlags::HAS_RUNTIME_ARRAY.union(TypeFlags::HAS_POINTER);

    #[inline]
    pub fn is_numeric(self) -> bool {
        self.contains(TypeFlags::IS_NUMERIC)
    }

    #[inline]
    pub fn is_host_shareable(self) -> bool {
        self.contains(TypeFlags::HOST_SHAREABLE)
    }

    #[inline]
    pub fn is_constructible(self) -> bool {
        self.contains(TypeFlags::CONSTRUCTIBLE)
    }
}

#[cfg(test)]
mod tests;
