//! The AST arena.
//!
//! One `Ast` per program generation. Nodes are appended and never removed;
//! ids stay valid for the arena's lifetime.

use lumen_diagnostic::{ice, IceHandler};
use lumen_ir::{DeclId, GenerationId, Span, StorageClass, Symbol, TypeId};

use crate::{
    AttrId, AttrKind, AttrRange, Attribute, Case, CaseId, CaseRange, CaseSelector, Decl, DeclKind,
    Expr, ExprId, ExprKind, ExprRange, FunctionDecl, MemberDecl, MemberId, MemberRange, NodeId,
    SelectorId, SelectorRange, Stmt, StmtId, StmtKind, StmtRange, VarId, VarKind, VarRange,
    Variable,
};

/// Arena holding every node of one program.
#[derive(Clone, Debug)]
pub struct Ast {
    generation: GenerationId,
    next_node: u32,
    /// Raised when an index no longer fits its id.
    ice: IceHandler,

    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    decls: Vec<Decl>,
    vars: Vec<Variable>,
    members: Vec<MemberDecl>,
    attrs: Vec<Attribute>,
    cases: Vec<Case>,
    selectors: Vec<CaseSelector>,

    // Side lists addressed by ranges.
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    var_lists: Vec<VarId>,
    member_lists: Vec<MemberId>,
    attr_lists: Vec<AttrId>,
    case_lists: Vec<CaseId>,
    selector_lists: Vec<SelectorId>,

    /// Module-scope declarations in source order.
    module: Vec<DeclId>,
}

impl Ast {
    pub fn new(generation: GenerationId, ice: IceHandler) -> Self {
        Ast {
            generation,
            next_node: 0,
            ice,
            exprs: Vec::new(),
            stmts: Vec::new(),
            decls: Vec::new(),
            vars: Vec::new(),
            members: Vec::new(),
            attrs: Vec::new(),
            cases: Vec::new(),
            selectors: Vec::new(),
            expr_lists: Vec::new(),
            stmt_lists: Vec::new(),
            var_lists: Vec::new(),
            member_lists: Vec::new(),
            attr_lists: Vec::new(),
            case_lists: Vec::new(),
            selector_lists: Vec::new(),
            module: Vec::new(),
        }
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    /// Number of nodes allocated so far, of every kind.
    pub fn node_count(&self) -> u32 {
        self.next_node
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.generation, self.next_node);
        self.next_node = match self.next_node.checked_add(1) {
            Some(next) => next,
            None => ice!(self.ice, "AST arena exceeded u32::MAX nodes"),
        };
        id
    }

    /// Convert an arena length to a `u32` index.
    fn to_index(&self, len: usize) -> u32 {
        match u32::try_from(len) {
            Ok(index) => index,
            Err(_) => ice!(self.ice, "AST arena exceeded u32::MAX nodes"),
        }
    }

    /// Convert a list length to a range length.
    fn to_len(&self, len: usize) -> u16 {
        match u16::try_from(len) {
            Ok(len) => len,
            Err(_) => ice!(self.ice, "AST list of {len} nodes exceeds u16::MAX"),
        }
    }

    // === Allocation ===

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = self.next_id();
        let idx = self.to_index(self.exprs.len());
        self.exprs.push(Expr { id, kind, span });
        ExprId::new(idx)
    }

    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = self.next_id();
        let idx = self.to_index(self.stmts.len());
        self.stmts.push(Stmt { id, kind, span });
        StmtId::new(idx)
    }

    /// Allocate a declaration. It is not part of the module until
    /// [`Ast::push_module_decl`] is called.
    pub fn alloc_decl(&mut self, kind: DeclKind, span: Span) -> DeclId {
        let id = self.next_id();
        let idx = self.to_index(self.decls.len());
        self.decls.push(Decl { id, kind, span });
        DeclId::new(idx)
    }

    /// Reserve a declaration slot whose kind is filled in later.
    ///
    /// Struct types are keyed by their declaration, so the id must exist
    /// before the type does.
    pub fn reserve_decl(&mut self, span: Span) -> DeclId {
        self.alloc_decl(DeclKind::Alias { name: Symbol::INVALID, ty: TypeId::NONE }, span)
    }

    /// Fill in a slot obtained from [`Ast::reserve_decl`].
    pub fn set_decl_kind(&mut self, decl: DeclId, kind: DeclKind) {
        self.decls[decl.index()].kind = kind;
    }

    #[expect(clippy::too_many_arguments, reason = "one argument per Variable field")]
    pub fn alloc_var(
        &mut self,
        name: Symbol,
        kind: VarKind,
        storage: StorageClass,
        ty: Option<TypeId>,
        init: Option<ExprId>,
        attrs: AttrRange,
        span: Span,
    ) -> VarId {
        let id = self.next_id();
        let idx = self.to_index(self.vars.len());
        self.vars.push(Variable {
            id,
            name,
            kind,
            storage,
            ty,
            init,
            attrs,
            span,
        });
        VarId::new(idx)
    }

    pub fn alloc_member(&mut self, name: Symbol, ty: TypeId, attrs: AttrRange, span: Span) -> MemberId {
        let id = self.next_id();
        let idx = self.to_index(self.members.len());
        self.members.push(MemberDecl {
            id,
            name,
            ty,
            attrs,
            span,
        });
        MemberId::new(idx)
    }

    pub fn alloc_attr(&mut self, kind: AttrKind, span: Span) -> AttrId {
        let id = self.next_id();
        let idx = self.to_index(self.attrs.len());
        self.attrs.push(Attribute { id, kind, span });
        AttrId::new(idx)
    }

    pub fn alloc_case(&mut self, selectors: SelectorRange, body: StmtRange, span: Span) -> CaseId {
        let id = self.next_id();
        let idx = self.to_index(self.cases.len());
        self.cases.push(Case {
            id,
            selectors,
            body,
            span,
        });
        CaseId::new(idx)
    }

    pub fn alloc_selector(&mut self, expr: Option<ExprId>, span: Span) -> SelectorId {
        let id = self.next_id();
        let idx = self.to_index(self.selectors.len());
        self.selectors.push(CaseSelector { id, expr, span });
        SelectorId::new(idx)
    }

    // === Lists ===

    pub fn alloc_expr_list(&mut self, items: &[ExprId]) -> ExprRange {
        let start = self.to_index(self.expr_lists.len());
        let len = self.to_len(items.len());
        self.expr_lists.extend_from_slice(items);
        ExprRange::new(start, len)
    }

    pub fn alloc_stmt_list(&mut self, items: &[StmtId]) -> StmtRange {
        let start = self.to_index(self.stmt_lists.len());
        let len = self.to_len(items.len());
        self.stmt_lists.extend_from_slice(items);
        StmtRange::new(start, len)
    }

    pub fn alloc_var_list(&mut self, items: &[VarId]) -> VarRange {
        let start = self.to_index(self.var_lists.len());
        let len = self.to_len(items.len());
        self.var_lists.extend_from_slice(items);
        VarRange::new(start, len)
    }

    pub fn alloc_member_list(&mut self, items: &[MemberId]) -> MemberRange {
        let start = self.to_index(self.member_lists.len());
        let len = self.to_len(items.len());
        self.member_lists.extend_from_slice(items);
        MemberRange::new(start, len)
    }

    pub fn alloc_attr_list(&mut self, items: &[AttrId]) -> AttrRange {
        let start = self.to_index(self.attr_lists.len());
        let len = self.to_len(items.len());
        self.attr_lists.extend_from_slice(items);
        AttrRange::new(start, len)
    }

    pub fn alloc_case_list(&mut self, items: &[CaseId]) -> CaseRange {
        let start = self.to_index(self.case_lists.len());
        let len = self.to_len(items.len());
        self.case_lists.extend_from_slice(items);
        CaseRange::new(start, len)
    }

    pub fn alloc_selector_list(&mut self, items: &[SelectorId]) -> SelectorRange {
        let start = self.to_index(self.selector_lists.len());
        let len = self.to_len(items.len());
        self.selector_lists.extend_from_slice(items);
        SelectorRange::new(start, len)
    }

    /// Append a declaration to the module, after all existing ones.
    pub fn push_module_decl(&mut self, decl: DeclId) {
        self.module.push(decl);
    }

    // === Lookup ===

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.index()]
    }

    #[inline]
    pub fn member(&self, id: MemberId) -> &MemberDecl {
        &self.members[id.index()]
    }

    #[inline]
    pub fn attr(&self, id: AttrId) -> &Attribute {
        &self.attrs[id.index()]
    }

    #[inline]
    pub fn case(&self, id: CaseId) -> &Case {
        &self.cases[id.index()]
    }

    #[inline]
    pub fn selector(&self, id: SelectorId) -> &CaseSelector {
        &self.selectors[id.index()]
    }

    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.as_range()]
    }

    pub fn var_list(&self, range: VarRange) -> &[VarId] {
        &self.var_lists[range.as_range()]
    }

    pub fn member_list(&self, range: MemberRange) -> &[MemberId] {
        &self.member_lists[range.as_range()]
    }

    pub fn attr_list(&self, range: AttrRange) -> &[AttrId] {
        &self.attr_lists[range.as_range()]
    }

    pub fn case_list(&self, range: CaseRange) -> &[CaseId] {
        &self.case_lists[range.as_range()]
    }

    pub fn selector_list(&self, range: SelectorRange) -> &[SelectorId] {
        &self.selector_lists[range.as_range()]
    }

    /// Module-scope declarations in source order.
    pub fn module(&self) -> &[DeclId] {
        &self.module
    }

    // === Queries ===

    /// Name a declaration introduces into module scope.
    pub fn decl_name(&self, id: DeclId) -> Option<Symbol> {
        match self.decl(id).kind {
            DeclKind::Struct { name, .. }
            | DeclKind::Alias { name, .. }
            | DeclKind::Function(FunctionDecl { name, .. }) => Some(name),
            DeclKind::GlobalVar(var) => Some(self.var(var).name),
            DeclKind::DiagnosticDirective(_) => None,
        }
    }

    /// Module functions in source order.
    pub fn functions(&self) -> impl Iterator<Item = (DeclId, &FunctionDecl)> {
        self.module.iter().filter_map(|&id| match &self.decl(id).kind {
            DeclKind::Function(func) => Some((id, func)),
            _ => None,
        })
    }

    /// First attribute in `range` matching `pred`.
    pub fn find_attr<T>(&self, range: AttrRange, pred: impl Fn(&AttrKind) -> Option<T>) -> Option<T> {
        self.attr_list(range)
            .iter()
            .find_map(|&id| pred(&self.attr(id).kind))
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Every node id in the arena, of every kind.
    pub fn all_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.exprs
            .iter()
            .map(|n| n.id)
            .chain(self.stmts.iter().map(|n| n.id))
            .chain(self.decls.iter().map(|n| n.id))
            .chain(self.vars.iter().map(|n| n.id))
            .chain(self.members.iter().map(|n| n.id))
            .chain(self.attrs.iter().map(|n| n.id))
            .chain(self.cases.iter().map(|n| n.id))
            .chain(self.selectors.iter().map(|n| n.id))
    }
}

#[cfg(test)]
mod tests;
