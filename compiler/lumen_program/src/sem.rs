//! Semantic side tables.
//!
//! The resolver never writes into the AST. Everything it learns about a
//! node is recorded here, keyed by the node's arena id.

use lumen_ast::{ExprId, PipelineStage, VarId};
use lumen_ir::{DeclId, Symbol, TypeId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::BuiltinFn;

/// What a call expression invokes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CallTarget {
    Function(DeclId),
    Builtin(BuiltinFn),
}

/// How a member expression was resolved.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MemberAccess {
    /// Struct field by declaration index.
    Field(u32),
    /// Vector swizzle, one component index per letter.
    Swizzle(SmallVec<[u8; 4]>),
}

/// A function carrying a pipeline stage attribute.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EntryPoint {
    pub decl: DeclId,
    pub name: Symbol,
    pub stage: PipelineStage,
    pub workgroup_size: Option<[u32; 3]>,
}

/// Results of semantic analysis for one program.
#[derive(Clone, Debug, Default)]
pub struct Sem {
    expr_types: Vec<TypeId>,
    var_types: Vec<TypeId>,
    resolved_vars: FxHashMap<ExprId, VarId>,
    calls: FxHashMap<ExprId, CallTarget>,
    members: FxHashMap<ExprId, MemberAccess>,
    entry_points: Vec<EntryPoint>,
}

impl Sem {
    pub(crate) fn with_capacity(exprs: usize, vars: usize) -> Self {
        Sem {
            expr_types: vec![TypeId::NONE; exprs],
            var_types: vec![TypeId::NONE; vars],
            ..Sem::default()
        }
    }

    // === Recording ===

    pub(crate) fn set_expr_type(&mut self, expr: ExprId, ty: TypeId) {
        self.expr_types[expr.index()] = ty;
    }

    pub(crate) fn set_var_type(&mut self, var: VarId, ty: TypeId) {
        self.var_types[var.index()] = ty;
    }

    pub(crate) fn set_resolved_var(&mut self, expr: ExprId, var: VarId) {
        self.resolved_vars.insert(expr, var);
    }

    pub(crate) fn set_call(&mut self, expr: ExprId, target: CallTarget) {
        self.calls.insert(expr, target);
    }

    pub(crate) fn set_member(&mut self, expr: ExprId, access: MemberAccess) {
        self.members.insert(expr, access);
    }

    pub(crate) fn push_entry_point(&mut self, entry: EntryPoint) {
        self.entry_points.push(entry);
    }

    // === Queries ===

    /// Type of an expression, or `TypeId::NONE` if it failed to resolve.
    pub fn expr_type(&self, expr: ExprId) -> TypeId {
        self.expr_types.get(expr.index()).copied().unwrap_or(TypeId::NONE)
    }

    /// Type of a variable, or `TypeId::NONE` if it failed to resolve.
    pub fn var_type(&self, var: VarId) -> TypeId {
        self.var_types.get(var.index()).copied().unwrap_or(TypeId::NONE)
    }

    /// Variable an identifier expression refers to.
    pub fn resolved_var(&self, expr: ExprId) -> Option<VarId> {
        self.resolved_vars.get(&expr).copied()
    }

    pub fn call_target(&self, expr: ExprId) -> Option<CallTarget> {
        self.calls.get(&expr).copied()
    }

    pub fn member_access(&self, expr: ExprId) -> Option<&MemberAccess> {
        self.members.get(&expr)
    }

    /// Entry points in module order.
    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn entry_point(&self, decl: DeclId) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|ep| ep.decl == decl)
    }
}
