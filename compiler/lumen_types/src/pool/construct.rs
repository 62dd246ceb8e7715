//! Type construction for the Pool.
//!
//! Every constructor returns the canonical id for its shape. Malformed
//! shapes are internal compiler errors: semantic analysis validates user
//! input before anything reaches the pool.

use lumen_diagnostic::ice_assert;
use lumen_ir::{Access, DeclId, SamplerKind, StorageClass, Symbol, TypeId};

use crate::{ArrayCount, Pool, StructMember, StructType, Tag, TextureKind, TextureType, TypeData, TypeFlags};

impl Pool {
    // === Scalars ===

    pub fn bool(&self) -> TypeId {
        TypeId::BOOL
    }

    pub fn i32(&self) -> TypeId {
        TypeId::I32
    }

    pub fn u32(&self) -> TypeId {
        TypeId::U32
    }

    pub fn f32(&self) -> TypeId {
        TypeId::F32
    }

    // === Compound Constructors ===

    /// `vecN<elem>`, N in 2..=4, elem a scalar.
    pub fn vector(&mut self, elem: TypeId, width: u8) -> TypeId {
        ice_assert!(
            self.ice(),
            (2..=4).contains(&width),
            "vector width {width} out of range"
        );
        ice_assert!(
            self.ice(),
            self.tag(elem).is_scalar(),
            "vector element must be a scalar, got {}",
            self.tag(elem)
        );
        self.intern(TypeData::Vector { elem, width })
    }

    /// `matCxR<f32>`.
    pub fn matrix(&mut self, columns: u8, rows: u8, elem: TypeId) -> TypeId {
        ice_assert!(
            self.ice(),
            (2..=4).contains(&columns) && (2..=4).contains(&rows),
            "matrix dimensions {columns}x{rows} out of range"
        );
        ice_assert!(
            self.ice(),
            self.is_f32(elem),
            "matrix element must be f32, got {}",
            self.tag(elem)
        );
        self.intern(TypeData::Matrix { columns, rows, elem })
    }

    pub fn pointer(&mut self, pointee: TypeId, storage: StorageClass) -> TypeId {
        ice_assert!(
            self.ice(),
            !self.is_pointer(self.unwrap_alias(pointee)),
            "pointer to pointer"
        );
        self.intern(TypeData::Pointer { pointee, storage })
    }

    pub fn sampler(&mut self, kind: SamplerKind) -> TypeId {
        self.intern(TypeData::Sampler(kind))
    }

    pub fn texture(&mut self, texture: TextureType) -> TypeId {
        match texture.kind {
            TextureKind::Sampled(sample) | TextureKind::Multisampled(sample) => {
                ice_assert!(
                    self.ice(),
                    matches!(self.tag(sample), Tag::I32 | Tag::U32 | Tag::F32),
                    "texture sample type must be i32, u32 or f32, got {}",
                    self.tag(sample)
                );
            }
            TextureKind::Depth | TextureKind::Storage { .. } => {}
        }
        self.intern(TypeData::Texture(texture))
    }

    /// `array<elem, count>`. A stride of `None` means the natural stride.
    pub fn array(&mut self, elem: TypeId, count: ArrayCount, stride: Option<u32>) -> TypeId {
        ice_assert!(
            self.ice(),
            count != ArrayCount::Fixed(0),
            "array with zero elements"
        );
        ice_assert!(self.ice(), stride != Some(0), "array with zero stride");
        ice_assert!(
            self.ice(),
            self.contains(elem),
            "array element {elem:?} is not a known type"
        );
        self.intern(TypeData::Array { elem, count, stride })
    }

    pub fn alias(&mut self, name: Symbol, target: TypeId) -> TypeId {
        ice_assert!(self.ice(), name.is_valid(), "alias without a name");
        ice_assert!(
            self.ice(),
            self.contains(target),
            "alias target {target:?} is not a known type"
        );
        self.intern(TypeData::Alias { name, target })
    }

    pub fn access_control(&mut self, access: Access, inner: TypeId) -> TypeId {
        ice_assert!(
            self.ice(),
            self.contains(inner),
            "access-controlled type {inner:?} is not a known type"
        );
        self.intern(TypeData::AccessControl { access, inner })
    }

    /// The struct introduced by `decl`.
    ///
    /// The first request creates it; later requests for the same
    /// declaration return the same id and must describe the same members.
    pub fn struct_type(&mut self, decl: DeclId, name: Symbol, members: Vec<StructMember>) -> TypeId {
        if let Some(existing) = self.struct_for_decl(decl) {
            let same = match self.data(existing) {
                TypeData::Struct(st) => st.name == name && st.members == members,
                _ => false,
            };
            ice_assert!(self.ice(), same, "struct {decl:?} re-created with a different shape");
            return existing;
        }
        ice_assert!(self.ice(), !members.is_empty(), "struct {decl:?} has no members");
        for member in &members {
            ice_assert!(
                self.ice(),
                self.contains(member.ty),
                "struct member type {:?} is not a known type",
                member.ty
            );
        }

        let ordinal = self.next_struct;
        self.next_struct += 1;
        let data = TypeData::Struct(StructType {
            decl,
            name,
            members,
            ordinal,
        });
        let flags = self.flags_for(&data);
        let name = self.internal_name(&data);
        let id = self.push(data, flags, name);
        self.structs_by_decl.insert(decl, id);
        id
    }

    /// Result of indexing a value of type `id`.
    ///
    /// Vectors yield their element, matrices a column vector, arrays their
    /// element.
    pub fn index_result(&mut self, id: TypeId) -> Option<TypeId> {
        match *self.data(self.unwrap_all(id)) {
            TypeData::Vector { elem, .. } | TypeData::Array { elem, .. } => Some(elem),
            TypeData::Matrix { rows, elem, .. } => Some(self.vector(elem, rows)),
            _ => None,
        }
    }

    // === Flags ===

    pub(super) fn flags_for(&self, data: &TypeData) -> TypeFlags {
        let scalar = TypeFlags::IS_SCALAR | TypeFlags::CONSTRUCTIBLE;
        let numeric = scalar | TypeFlags::IS_NUMERIC | TypeFlags::HOST_SHAREABLE;
        match data {
            TypeData::Bool => scalar | TypeFlags::IS_BOOLEAN,
            TypeData::I32 | TypeData::U32 => numeric | TypeFlags::IS_INTEGER,
            TypeData::F32 => numeric | TypeFlags::IS_FLOAT,
            TypeData::Vector { elem, .. } => {
                // Same category as the element, minus the scalar bit.
                self.flags(*elem) - TypeFlags::IS_SCALAR
            }
            TypeData::Matrix { .. } => {
                TypeFlags::IS_NUMERIC
                    | TypeFlags::IS_FLOAT
                    | TypeFlags::CONSTRUCTIBLE
                    | TypeFlags::HOST_SHAREABLE
            }
            TypeData::Pointer { .. } => TypeFlags::HAS_POINTER,
            TypeData::Sampler(_) | TypeData::Texture(_) => TypeFlags::IS_HANDLE,
            TypeData::Array { elem, count, .. } => {
                let elem_flags = self.flags(*elem);
                let mut flags = elem_flags & (TypeFlags::PROPAGATE | TypeFlags::HOST_SHAREABLE);
                match count {
                    ArrayCount::Fixed(_) => {
                        flags |= elem_flags & TypeFlags::CONSTRUCTIBLE;
                    }
                    ArrayCount::Runtime => flags |= TypeFlags::HAS_RUNTIME_ARRAY,
                }
                flags
            }
            TypeData::Struct(st) => {
                let mut flags = TypeFlags::CONSTRUCTIBLE | TypeFlags::HOST_SHAREABLE;
                for member in &st.members {
                    let member_flags = self.flags(member.ty);
                    flags &= member_flags | !(TypeFlags::CONSTRUCTIBLE | TypeFlags::HOST_SHAREABLE);
                    flags |= member_flags & TypeFlags::PROPAGATE;
                }
                if flags.contains(TypeFlags::HAS_RUNTIME_ARRAY) {
                    flags -= TypeFlags::CONSTRUCTIBLE;
                }
                flags
            }
            TypeData::Alias { target: inner, .. } | TypeData::AccessControl { inner, .. } => {
                self.flags(*inner)
            }
        }
    }
}
