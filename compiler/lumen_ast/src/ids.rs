//! Arena indices.

use std::fmt;

use lumen_ir::GenerationId;

/// Defines a `u32` index newtype with an `INVALID` sentinel.
macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    )* };
}

define_id!(
    /// Index into the expression arena.
    ExprId,
    /// Index into the statement arena.
    StmtId,
    /// Index into the variable arena (locals, globals and parameters).
    VarId,
    /// Index into the struct member arena.
    MemberId,
    /// Index into the attribute arena.
    AttrId,
    /// Index into the switch case arena.
    CaseId,
    /// Index into the case selector arena.
    SelectorId,
);

/// Identity of a node: its generation plus a per-generation counter.
///
/// Layout: 8 bytes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId {
    generation: GenerationId,
    index: u32,
}

impl NodeId {
    pub(crate) const fn new(generation: GenerationId, index: u32) -> Self {
        NodeId { generation, index }
    }

    #[inline]
    pub const fn generation(self) -> GenerationId {
        self.generation
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@{:?})", self.index, self.generation)
    }
}

lumen_ir::static_assert_size!(ExprId, 4);
lumen_ir::static_assert_size!(NodeId, 8);
