//! Host-shareable memory layout.
//!
//! Sizes and alignments follow the uniform/storage buffer rules: scalars are
//! 4 bytes, `vec3` aligns like `vec4`, matrices are arrays of column
//! vectors, struct members are placed at the next multiple of their
//! alignment.

use lumen_ir::TypeId;

use crate::{ArrayCount, Pool, TypeData};

/// Size and alignment in bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Layout {
    pub size: u32,
    pub align: u32,
}

impl Layout {
    const fn new(size: u32, align: u32) -> Self {
        Layout { size, align }
    }
}

fn round_up(align: u32, value: u32) -> u32 {
    value.div_ceil(align) * align
}

impl Pool {
    /// Layout of a host-shareable, fixed-size type.
    ///
    /// `None` for types without a host layout (`bool`, pointers, handles)
    /// and for anything containing a runtime-sized array.
    pub fn size_and_align(&self, id: TypeId) -> Option<Layout> {
        match self.data(id) {
            TypeData::Bool
            | TypeData::Pointer { .. }
            | TypeData::Sampler(_)
            | TypeData::Texture(_) => None,
            TypeData::I32 | TypeData::U32 | TypeData::F32 => Some(Layout::new(4, 4)),
            TypeData::Vector { elem, width } => {
                let scalar = self.size_and_align(*elem)?;
                let size = scalar.size * u32::from(*width);
                let align = if *width == 2 { size } else { scalar.size * 4 };
                Some(Layout::new(size, align))
            }
            TypeData::Matrix { columns, rows, elem } => {
                let scalar = self.size_and_align(*elem)?;
                let column_size = scalar.size * u32::from(*rows);
                let column_align = if *rows == 2 { column_size } else { scalar.size * 4 };
                Some(Layout::new(
                    u32::from(*columns) * round_up(column_align, column_size),
                    column_align,
                ))
            }
            TypeData::Array { elem, count, .. } => match count {
                ArrayCount::Fixed(n) => {
                    let elem_layout = self.size_and_align(*elem)?;
                    let stride = self.array_stride(id)?;
                    Some(Layout::new(n * stride, elem_layout.align))
                }
                ArrayCount::Runtime => None,
            },
            TypeData::Struct(st) => {
                let mut offset = 0u32;
                let mut align = 1u32;
                for member in &st.members {
                    let member_layout = self.size_and_align(member.ty)?;
                    offset = round_up(member_layout.align, offset) + member_layout.size;
                    align = align.max(member_layout.align);
                }
                Some(Layout::new(round_up(align, offset), align))
            }
            TypeData::Alias { target: inner, .. } | TypeData::AccessControl { inner, .. } => {
                self.size_and_align(*inner)
            }
        }
    }

    /// Byte distance between consecutive elements of an array type.
    ///
    /// An explicit stride wins over the natural one. Runtime-sized arrays
    /// have a stride too.
    pub fn array_stride(&self, id: TypeId) -> Option<u32> {
        match self.data(self.unwrap_alias(id)) {
            TypeData::Array {
                stride: Some(stride),
                ..
            } => Some(*stride),
            TypeData::Array { elem, .. } => {
                let elem_layout = self.size_and_align(*elem)?;
                Some(round_up(elem_layout.align, elem_layout.size))
            }
            _ => None,
        }
    }

    /// Byte offset of every member of a struct type.
    ///
    /// A trailing runtime-sized array gets an offset even though the struct
    /// itself has no fixed size.
    pub fn struct_member_offsets(&self, id: TypeId) -> Option<Vec<u32>> {
        let st = self.as_struct(id)?;
        let mut offsets = Vec::with_capacity(st.members.len());
        let mut offset = 0u32;
        for (idx, member) in st.members.iter().enumerate() {
            let is_last = idx + 1 == st.members.len();
            match self.size_and_align(member.ty) {
                Some(layout) => {
                    offset = round_up(layout.align, offset);
                    offsets.push(offset);
                    offset += layout.size;
                }
                None if is_last => {
                    let align = self.runtime_array_align(member.ty)?;
                    offsets.push(round_up(align, offset));
                }
                None => return None,
            }
        }
        Some(offsets)
    }

    fn runtime_array_align(&self, id: TypeId) -> Option<u32> {
        match self.data(self.unwrap_all(id)) {
            TypeData::Array {
                elem,
                count: ArrayCount::Runtime,
                ..
            } => self.size_and_align(*elem).map(|l| l.align),
            _ => None,
        }
    }
}
