//! Type descriptors.

use lumen_ir::{Access, DeclId, SamplerKind, StorageClass, Symbol, TexelFormat, TextureDimension, TypeId};

use crate::Tag;

/// Shape of one interned type.
///
/// Child types are `TypeId`s into the same pool.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Bool,
    I32,
    U32,
    F32,
    Vector { elem: TypeId, width: u8 },
    Matrix { columns: u8, rows: u8, elem: TypeId },
    Pointer { pointee: TypeId, storage: StorageClass },
    Sampler(SamplerKind),
    Texture(TextureType),
    Struct(StructType),
    Array { elem: TypeId, count: ArrayCount, stride: Option<u32> },
    Alias { name: Symbol, target: TypeId },
    AccessControl { access: Access, inner: TypeId },
}

impl TypeData {
    pub fn tag(&self) -> Tag {
        match self {
            TypeData::Bool => Tag::Bool,
            TypeData::I32 => Tag::I32,
            TypeData::U32 => Tag::U32,
            TypeData::F32 => Tag::F32,
            TypeData::Vector { .. } => Tag::Vector,
            TypeData::Matrix { .. } => Tag::Matrix,
            TypeData::Pointer { .. } => Tag::Pointer,
            TypeData::Sampler(_) => Tag::Sampler,
            TypeData::Texture(_) => Tag::Texture,
            TypeData::Struct(_) => Tag::Struct,
            TypeData::Array { .. } => Tag::Array,
            TypeData::Alias { .. } => Tag::Alias,
            TypeData::AccessControl { .. } => Tag::AccessControl,
        }
    }
}

/// Element count of an array type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArrayCount {
    Fixed(u32),
    /// Sized at bind time; only legal as the last member of a storage buffer.
    Runtime,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TextureType {
    pub dim: TextureDimension,
    pub kind: TextureKind,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TextureKind {
    /// Sampled texture with an `i32`, `u32` or `f32` sample type.
    Sampled(TypeId),
    Multisampled(TypeId),
    Depth,
    Storage { format: TexelFormat, access: Access },
}

/// A named struct member.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructMember {
    pub name: Symbol,
    pub ty: TypeId,
}

/// A nominal struct type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructType {
    /// Declaration that introduced this struct.
    pub decl: DeclId,
    pub name: Symbol,
    pub members: Vec<StructMember>,
    /// Per-pool ordinal used for the internal name.
    pub ordinal: u32,
}

impl StructType {
    /// Find a member by name.
    pub fn member(&self, name: Symbol) -> Option<(usize, &StructMember)> {
        self.members.iter().enumerate().find(|(_, m)| m.name == name)
    }
}
