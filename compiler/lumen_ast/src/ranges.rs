//! Arena range types.
//!
//! A range is a `start`/`len` pair into one of the arena's side lists.

/// Defines range types with `start: u32` and `len: u16` fields, an `EMPTY`
/// constant and a `TypeName(start..end)` debug form.
macro_rules! define_range {
    ($($name:ident),* $(,)?) => { $(
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        #[repr(C)]
        pub struct $name {
            pub start: u32,
            pub len: u16,
        }

        impl $name {
            pub const EMPTY: Self = Self { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u16) -> Self {
                Self { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn as_range(&self) -> ::std::ops::Range<usize> {
                let start = self.start as usize;
                start..start + self.len()
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({}..{})", stringify!($name), self.start, self.start + u32::from(self.len))
            }
        }
    )* };
}

define_range!(
    ExprRange,
    StmtRange,
    VarRange,
    MemberRange,
    AttrRange,
    CaseRange,
    SelectorRange,
);
