//! Type names.
//!
//! Two separate algorithms:
//! - `internal_name` is computed once at interning time from the shape and
//!   the struct ordinal. It is unique within the pool and used as a key.
//! - `friendly_name` spells the type the way a user wrote it, resolving
//!   struct and alias names through the symbol table. It may collide.

#![allow(clippy::format_push_string)]

use lumen_ir::{SymbolTable, TypeId};

use crate::{ArrayCount, Pool, TextureKind, TypeData};

impl Pool {
    pub(super) fn internal_name(&self, data: &TypeData) -> String {
        match data {
            TypeData::Bool => "__bool".to_owned(),
            TypeData::I32 => "__i32".to_owned(),
            TypeData::U32 => "__u32".to_owned(),
            TypeData::F32 => "__f32".to_owned(),
            TypeData::Vector { elem, width } => {
                format!("__vec_{width}{}", self.type_name(*elem))
            }
            TypeData::Matrix { columns, rows, elem } => {
                format!("__mat_{columns}_{rows}{}", self.type_name(*elem))
            }
            TypeData::Pointer { pointee, storage } => {
                format!("__ptr_{}{}", storage.as_str(), self.type_name(*pointee))
            }
            TypeData::Sampler(kind) => format!("__{}", kind.as_str()),
            TypeData::Texture(tex) => match tex.kind {
                TextureKind::Sampled(sample) => {
                    format!("__sampled_texture_{}{}", tex.dim, self.type_name(sample))
                }
                TextureKind::Multisampled(sample) => {
                    format!("__multisampled_texture_{}{}", tex.dim, self.type_name(sample))
                }
                TextureKind::Depth => format!("__depth_texture_{}", tex.dim),
                TextureKind::Storage { format, access } => {
                    format!("__storage_texture_{}_{format}_{access}", tex.dim)
                }
            },
            TypeData::Struct(st) => format!("__struct_{}", st.ordinal),
            TypeData::Array { elem, count, stride } => {
                let mut name = format!("__array{}", self.type_name(*elem));
                match count {
                    ArrayCount::Fixed(n) => name.push_str(&format!("_{n}")),
                    ArrayCount::Runtime => name.push_str("_rt"),
                }
                if let Some(stride) = stride {
                    name.push_str(&format!("_stride_{stride}"));
                }
                name
            }
            TypeData::Alias { name, target } => {
                format!("__alias_{}{}", name.index(), self.type_name(*target))
            }
            TypeData::AccessControl { access, inner } => {
                format!("__access_control_{access}{}", self.type_name(*inner))
            }
        }
    }

    /// Human-readable name, e.g. `vec3<f32>` or a struct's declared name.
    pub fn friendly_name(&self, id: TypeId, symbols: &SymbolTable) -> String {
        let mut buf = String::new();
        self.friendly_name_into(id, symbols, &mut buf);
        buf
    }

    fn friendly_name_into(&self, id: TypeId, symbols: &SymbolTable, buf: &mut String) {
        match self.data(id) {
            TypeData::Bool => buf.push_str("bool"),
            TypeData::I32 => buf.push_str("i32"),
            TypeData::U32 => buf.push_str("u32"),
            TypeData::F32 => buf.push_str("f32"),
            TypeData::Vector { elem, width } => {
                buf.push_str(&format!("vec{width}<"));
                self.friendly_name_into(*elem, symbols, buf);
                buf.push('>');
            }
            TypeData::Matrix { columns, rows, elem } => {
                buf.push_str(&format!("mat{columns}x{rows}<"));
                self.friendly_name_into(*elem, symbols, buf);
                buf.push('>');
            }
            TypeData::Pointer { pointee, storage } => {
                buf.push_str("ptr<");
                buf.push_str(storage.as_str());
                buf.push_str(", ");
                self.friendly_name_into(*pointee, symbols, buf);
                buf.push('>');
            }
            TypeData::Sampler(kind) => buf.push_str(kind.as_str()),
            TypeData::Texture(tex) => match tex.kind {
                TextureKind::Sampled(sample) => {
                    buf.push_str(&format!("texture_{}<", tex.dim));
                    self.friendly_name_into(sample, symbols, buf);
                    buf.push('>');
                }
                TextureKind::Multisampled(sample) => {
                    buf.push_str(&format!("texture_multisampled_{}<", tex.dim));
                    self.friendly_name_into(sample, symbols, buf);
                    buf.push('>');
                }
                TextureKind::Depth => buf.push_str(&format!("texture_depth_{}", tex.dim)),
                TextureKind::Storage { format, access } => {
                    buf.push_str(&format!("texture_storage_{}<{format}, {access}>", tex.dim));
                }
            },
            TypeData::Struct(st) => push_symbol(buf, symbols, st.name),
            TypeData::Array { elem, count, .. } => {
                buf.push_str("array<");
                self.friendly_name_into(*elem, symbols, buf);
                if let ArrayCount::Fixed(n) = count {
                    buf.push_str(&format!(", {n}"));
                }
                buf.push('>');
            }
            TypeData::Alias { name, .. } => push_symbol(buf, symbols, *name),
            TypeData::AccessControl { access, inner } => {
                buf.push_str(&format!("[[access({access})]] "));
                self.friendly_name_into(*inner, symbols, buf);
            }
        }
    }
}

fn push_symbol(buf: &mut String, symbols: &SymbolTable, name: lumen_ir::Symbol) {
    buf.push_str(symbols.name_for(name).unwrap_or("<unknown>"));
}
