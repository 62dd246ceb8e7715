//! The type pool.
//!
//! One `Pool` per program. Types are appended to `items` and never removed,
//! so a `TypeId` stays valid for the pool's lifetime.

mod construct;
mod format;
mod layout;

use lumen_diagnostic::{ice, IceHandler};
use lumen_ir::{DeclId, TypeId};
use rustc_hash::FxHashMap;

use crate::{StructType, Tag, TypeData, TypeFlags};

pub use layout::Layout;

struct Item {
    data: TypeData,
    flags: TypeFlags,
    /// Internal name, unique within the pool.
    name: String,
}

/// Interned types of one program.
pub struct Pool {
    items: Vec<Item>,
    /// Structural intern table for every non-struct type.
    interned: FxHashMap<TypeData, TypeId>,
    /// Struct identity is the originating declaration.
    structs_by_decl: FxHashMap<DeclId, TypeId>,
    /// Next struct ordinal. Starts at zero in every pool.
    next_struct: u32,
    ice: IceHandler,
}

impl Pool {
    /// Create a pool with the scalars pre-interned.
    pub fn new(ice: IceHandler) -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(64),
            interned: FxHashMap::default(),
            structs_by_decl: FxHashMap::default(),
            next_struct: 0,
            ice,
        };
        for data in [TypeData::Bool, TypeData::I32, TypeData::U32, TypeData::F32] {
            pool.intern(data);
        }
        debug_assert_eq!(pool.items.len(), TypeId::FIRST_COMPOUND as usize);
        pool
    }

    /// The handler used for malformed requests.
    pub fn ice(&self) -> &IceHandler {
        &self.ice
    }

    /// Number of interned types, scalars included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Never true: scalars are always present.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check whether `id` names a type in this pool.
    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.items.len()
    }

    /// All types in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeData)> {
        self.items.iter().enumerate().map(|(idx, item)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "push() refuses to grow past u32::MAX"
            )]
            let id = TypeId::from_raw(idx as u32);
            (id, &item.data)
        })
    }

    // === Item Access ===

    fn item(&self, id: TypeId) -> &Item {
        match self.items.get(id.index()) {
            Some(item) => item,
            None => ice!(self.ice, "unknown type id {id:?}"),
        }
    }

    /// Shape of `id`.
    pub fn data(&self, id: TypeId) -> &TypeData {
        &self.item(id).data
    }

    pub fn tag(&self, id: TypeId) -> Tag {
        self.item(id).data.tag()
    }

    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.item(id).flags
    }

    /// Short internal name, unique within this pool.
    ///
    /// Structs are numbered `__struct_0`, `__struct_1`, ... in creation
    /// order, independent of their declared names.
    pub fn type_name(&self, id: TypeId) -> &str {
        &self.item(id).name
    }

    // === Variant Queries ===
    // Exactly one of these holds for any type.

    pub fn is_bool(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Bool
    }

    pub fn is_i32(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::I32
    }

    pub fn is_u32(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::U32
    }

    pub fn is_f32(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::F32
    }

    pub fn is_vector(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Vector
    }

    pub fn is_matrix(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Matrix
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Pointer
    }

    pub fn is_sampler(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Sampler
    }

    pub fn is_texture(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Texture
    }

    pub fn is_struct(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Struct
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Array
    }

    pub fn is_alias(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Alias
    }

    pub fn is_access_control(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::AccessControl
    }

    // === Structural Helpers ===

    /// Follow alias chains.
    pub fn unwrap_alias(&self, mut id: TypeId) -> TypeId {
        while let TypeData::Alias { target, .. } = self.data(id) {
            id = *target;
        }
        id
    }

    /// Follow aliases and access-control wrappers.
    pub fn unwrap_all(&self, mut id: TypeId) -> TypeId {
        loop {
            match self.data(id) {
                TypeData::Alias { target: next, .. } | TypeData::AccessControl { inner: next, .. } => {
                    id = *next;
                }
                _ => return id,
            }
        }
    }

    /// Struct descriptor of `id`, looking through aliases and access control.
    pub fn as_struct(&self, id: TypeId) -> Option<&StructType> {
        match self.data(self.unwrap_all(id)) {
            TypeData::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Struct type introduced by `decl`, if one was created.
    pub fn struct_for_decl(&self, decl: DeclId) -> Option<TypeId> {
        self.structs_by_decl.get(&decl).copied()
    }

    /// Scalar component: the type itself for scalars, the element for
    /// vectors, `f32` for matrices.
    pub fn scalar_of(&self, id: TypeId) -> Option<TypeId> {
        let id = self.unwrap_alias(id);
        match self.data(id) {
            TypeData::Bool | TypeData::I32 | TypeData::U32 | TypeData::F32 => Some(id),
            TypeData::Vector { elem, .. } | TypeData::Matrix { elem, .. } => Some(*elem),
            _ => None,
        }
    }

    /// Width of a vector type.
    pub fn vector_width(&self, id: TypeId) -> Option<u8> {
        match self.data(self.unwrap_alias(id)) {
            TypeData::Vector { width, .. } => Some(*width),
            _ => None,
        }
    }

    /// Pointee and address space of a pointer type.
    pub fn pointee(&self, id: TypeId) -> Option<(TypeId, lumen_ir::StorageClass)> {
        match self.data(self.unwrap_alias(id)) {
            TypeData::Pointer { pointee, storage } => Some((*pointee, *storage)),
            _ => None,
        }
    }

    // === Interning ===

    fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let flags = self.flags_for(&data);
        let name = self.internal_name(&data);
        let id = self.push(data.clone(), flags, name);
        self.interned.insert(data, id);
        id
    }

    fn push(&mut self, data: TypeData, flags: TypeFlags, name: String) -> TypeId {
        let raw = match u32::try_from(self.items.len()) {
            Ok(raw) if raw != u32::MAX => raw,
            _ => ice!(self.ice, "type pool exceeded capacity"),
        };
        tracing::trace!(id = raw, name = %name, "interned type");
        self.items.push(Item { data, flags, name });
        TypeId::from_raw(raw)
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new(IceHandler::new())
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("len", &self.items.len())
            .field("structs", &self.next_struct)
            .finish_non_exhaustive()
    }
}
