//! Handles into the type pool and the declaration arena.
//!
//! Both are plain `u32` indices. They are meaningful only together with the
//! `Pool` or `Ast` of the program that produced them.

use std::fmt;

/// Index of an interned type in a program's type pool.
///
/// Equal `TypeId`s within one pool denote the same type, so type equality is
/// an integer compare. Scalars are pre-interned at fixed indices.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const BOOL: TypeId = TypeId(0);
    pub const I32: TypeId = TypeId(1);
    pub const U32: TypeId = TypeId(2);
    pub const F32: TypeId = TypeId(3);

    /// First index handed out for compound types.
    pub const FIRST_COMPOUND: u32 = 4;

    /// Sentinel for "no type".
    pub const NONE: TypeId = TypeId(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned scalars.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        self.0 < Self::FIRST_COMPOUND
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BOOL => write!(f, "TypeId::BOOL"),
            Self::I32 => write!(f, "TypeId::I32"),
            Self::U32 => write!(f, "TypeId::U32"),
            Self::F32 => write!(f, "TypeId::F32"),
            Self::NONE => write!(f, "TypeId::NONE"),
            TypeId(raw) => write!(f, "TypeId({raw})"),
        }
    }
}

impl Default for TypeId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Index of a module-level declaration in a program's AST arena.
///
/// Struct types are keyed by the `DeclId` of the declaration that introduced
/// them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        DeclId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

crate::static_assert_size!(TypeId, 4);
crate::static_assert_size!(DeclId, 4);
