//! Address spaces and access modes.

use std::fmt;

/// Address space of a variable or pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum StorageClass {
    /// No explicit address space (`let`, `const`, parameters).
    #[default]
    None,
    Function,
    Private,
    Workgroup,
    Uniform,
    Storage,
    /// Opaque resources: samplers and textures.
    Handle,
}

impl StorageClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageClass::None => "",
            StorageClass::Function => "function",
            StorageClass::Private => "private",
            StorageClass::Workgroup => "workgroup",
            StorageClass::Uniform => "uniform",
            StorageClass::Storage => "storage",
            StorageClass::Handle => "handle",
        }
    }

    /// Resources that need `@group`/`@binding` attributes.
    pub const fn is_resource(self) -> bool {
        matches!(
            self,
            StorageClass::Uniform | StorageClass::Storage | StorageClass::Handle
        )
    }

    /// Address spaces legal at module scope.
    pub const fn is_module_scope(self) -> bool {
        !matches!(self, StorageClass::None | StorageClass::Function)
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memory access mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Access {
    #[default]
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub const fn as_str(self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::ReadWrite => "read_write",
        }
    }

    pub const fn can_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
