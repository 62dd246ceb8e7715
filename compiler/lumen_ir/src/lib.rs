//! Lumen IR - core handles shared by every compiler phase.
//!
//! This crate holds the small, `Copy` building blocks the rest of the compiler
//! is written against:
//! - Spans and named source buffers for diagnostics
//! - Generations, which scope symbols and nodes to one program instance
//! - Symbols and the per-generation symbol table
//! - `TypeId`/`DeclId` handles into the type pool and the AST arena
//! - Shader enums (storage classes, access modes, texture shapes)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers → `Symbol`, types → `TypeId`
//! - **Flatten Everything**: nodes are referenced by `u32` indices, never boxes
//! - **Generation-tagged**: a `Symbol` remembers which program minted it

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod generation;
mod source;
mod span;
mod storage;
mod symbol;
mod texture;
mod type_id;

pub use generation::GenerationId;
pub use source::{Location, Source};
pub use span::Span;
pub use storage::{Access, StorageClass};
pub use symbol::{Symbol, SymbolTable};
pub use texture::{SamplerKind, TexelFormat, TextureDimension};
pub use type_id::{DeclId, TypeId};
