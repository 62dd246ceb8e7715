//! Type system for the Lumen shader compiler.
//!
//! Every type lives in a [`Pool`] owned by one program and is referred to by
//! a [`TypeId`]. The pool interns structurally: asking twice for the same
//! shape returns the same id, so type equality is an integer compare.
//!
//! # Architecture
//!
//! - **`TypeId`**: `u32` index, scalars pre-interned at fixed positions
//! - **`TypeData`**: the closed variant set, one entry per interned type
//! - **`Tag`**: fieldless discriminant for exhaustive dispatch
//! - **`TypeFlags`**: properties computed once at interning time
//!
//! Structs are nominal. Their identity is the declaration that introduced
//! them, so two declarations with identical members stay distinct types.

mod data;
mod flags;
mod pool;
mod tag;

pub use data::{
    ArrayCount, StructMember, StructType, TextureKind, TextureType, TypeData,
};
pub use flags::TypeFlags;
pub use pool::{Layout, Pool};
pub use tag::Tag;

pub use lumen_ir::TypeId;
