//! Declarations and variables.

use lumen_diagnostic::DiagnosticControl;
use lumen_ir::{Span, StorageClass, Symbol, TypeId};

use crate::{AttrRange, ExprId, MemberRange, NodeId, StmtRange, VarId, VarRange};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Var,
    Let,
    Const,
    Param,
}

impl VarKind {
    /// `let`, `const` and parameters cannot be assigned.
    pub const fn is_mutable(self) -> bool {
        matches!(self, VarKind::Var)
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
            VarKind::Param => "",
        }
    }
}

/// A local, global, or parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Variable {
    pub id: NodeId,
    pub name: Symbol,
    pub kind: VarKind,
    pub storage: StorageClass,
    /// Declared type. `None` means inferred from the initializer.
    pub ty: Option<TypeId>,
    pub init: Option<ExprId>,
    pub attrs: AttrRange,
    pub span: Span,
}

/// A struct member declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MemberDecl {
    pub id: NodeId,
    pub name: Symbol,
    pub ty: TypeId,
    pub attrs: AttrRange,
    pub span: Span,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: VarRange,
    pub return_type: Option<TypeId>,
    pub return_attrs: AttrRange,
    pub body: StmtRange,
    pub attrs: AttrRange,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Struct {
        name: Symbol,
        members: MemberRange,
        /// Type interned for this declaration.
        ty: TypeId,
    },
    GlobalVar(VarId),
    Function(FunctionDecl),
    Alias {
        name: Symbol,
        /// The alias type itself, not its target.
        ty: TypeId,
    },
    /// Module-scope `diagnostic(severity, rule);`
    DiagnosticDirective(DiagnosticControl),
}

/// A module-scope declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Decl {
    pub id: NodeId,
    pub kind: DeclKind,
    pub span: Span,
}
