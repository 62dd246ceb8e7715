//! Type kind tag for exhaustive dispatch.

use std::fmt;

/// Discriminant of [`TypeData`](crate::TypeData).
///
/// Adding a variant here forces every `match` on `Tag` to be revisited.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Tag {
    Bool,
    I32,
    U32,
    F32,
    Vector,
    Matrix,
    Pointer,
    Sampler,
    Texture,
    Struct,
    Array,
    Alias,
    AccessControl,
}

impl Tag {
    pub const ALL: [Tag; 13] = [
        Tag::Bool,
        Tag::I32,
        Tag::U32,
        Tag::F32,
        Tag::Vector,
        Tag::Matrix,
        Tag::Pointer,
        Tag::Sampler,
        Tag::Texture,
        Tag::Struct,
        Tag::Array,
        Tag::Alias,
        Tag::AccessControl,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Tag::Bool => "bool",
            Tag::I32 => "i32",
            Tag::U32 => "u32",
            Tag::F32 => "f32",
            Tag::Vector => "vector",
            Tag::Matrix => "matrix",
            Tag::Pointer => "pointer",
            Tag::Sampler => "sampler",
            Tag::Texture => "texture",
            Tag::Struct => "struct",
            Tag::Array => "array",
            Tag::Alias => "alias",
            Tag::AccessControl => "access_control",
        }
    }

    /// `bool`, `i32`, `u32` or `f32`.
    pub const fn is_scalar(self) -> bool {
        matches!(self, Tag::Bool | Tag::I32 | Tag::U32 | Tag::F32)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests;
