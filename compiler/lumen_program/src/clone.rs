//! The clone protocol.
//!
//! A [`CloneContext`] copies nodes, types and symbols from a read-only
//! source [`Program`] into a [`ProgramBuilder`] of another generation.
//! Every `clone_*` method follows the same steps:
//!
//! 1. return the memoized destination value if this source value was
//!    cloned before;
//! 2. clone each child into a local;
//! 3. allocate the node in the destination and memoize it.
//!
//! Memoization is what keeps sharing intact: a symbol used by fifty
//! identifiers is registered once, a struct type referenced from several
//! declarations maps to one destination type.
//!
//! Struct declarations are the one cycle-prone case. Their type is keyed by
//! the declaration id, so the destination slot is reserved and memoized
//! before any member is cloned.

use lumen_ast::{
    AttrId, AttrKind, AttrRange, CaseId, CaseRange, DeclKind, ExprId, ExprKind, ExprRange, FunctionDecl,
    MemberId, MemberRange, SelectorId, SelectorRange, StmtId, StmtKind, StmtRange, VarId, VarRange,
};
use lumen_diagnostic::{ice, ice_assert, DiagnosticControl, IceHandler};
use lumen_ir::{DeclId, Span, Symbol, TypeId};
use lumen_types::{StructMember, TextureKind, TextureType, TypeData};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{Program, ProgramBuilder};

type SymbolRenamer<'a> = Box<dyn FnMut(&str) -> Option<String> + 'a>;

/// Copies a [`Program`] (or parts of it) into a [`ProgramBuilder`].
pub struct CloneContext<'src, 'dst> {
    src: &'src Program,
    dst: &'dst mut ProgramBuilder,
    ice: IceHandler,
    renamer: Option<SymbolRenamer<'dst>>,

    // === Remap tables (source -> destination) ===
    symbols: FxHashMap<Symbol, Symbol>,
    types: FxHashMap<TypeId, TypeId>,
    exprs: FxHashMap<ExprId, ExprId>,
    stmts: FxHashMap<StmtId, StmtId>,
    decls: FxHashMap<DeclId, DeclId>,
    vars: FxHashMap<VarId, VarId>,
    members: FxHashMap<MemberId, MemberId>,
    attrs: FxHashMap<AttrId, AttrId>,
    cases: FxHashMap<CaseId, CaseId>,
    selectors: FxHashMap<SelectorId, SelectorId>,
}

impl<'src, 'dst> CloneContext<'src, 'dst> {
    pub fn new(src: &'src Program, dst: &'dst mut ProgramBuilder) -> Self {
        let ice = dst.session().ice().clone();
        ice_assert!(
            ice,
            src.generation() != dst.generation(),
            "clone source and destination share generation {:?}",
            src.generation()
        );
        CloneContext {
            src,
            dst,
            ice,
            renamer: None,
            symbols: FxHashMap::default(),
            types: FxHashMap::default(),
            exprs: FxHashMap::default(),
            stmts: FxHashMap::default(),
            decls: FxHashMap::default(),
            vars: FxHashMap::default(),
            members: FxHashMap::default(),
            attrs: FxHashMap::default(),
            cases: FxHashMap::default(),
            selectors: FxHashMap::default(),
        }
    }

    /// Install a hook consulted once per distinct source symbol.
    ///
    /// Returning `Some(prefix)` registers a fresh destination name derived
    /// from `prefix`; `None` keeps the spelling.
    #[must_use]
    pub fn with_symbol_renamer(mut self, renamer: impl FnMut(&str) -> Option<String> + 'dst) -> Self {
        self.renamer = Some(Box::new(renamer));
        self
    }

    pub fn src(&self) -> &'src Program {
        self.src
    }

    /// The destination builder, e.g. for allocating replacement nodes.
    pub fn dst(&mut self) -> &mut ProgramBuilder {
        self.dst
    }

    /// Make every later clone of `src` return `with`, an expression that
    /// already lives in the destination.
    pub fn replace_expr(&mut self, src: ExprId, with: ExprId) {
        self.exprs.insert(src, with);
    }

    /// Clone every module declaration, in order, into the destination
    /// module.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(src = ?self.src.generation(), dst = ?self.dst.generation())
    )]
    pub fn clone_all(&mut self) {
        let src = self.src;
        for &decl in src.ast().module() {
            let new = self.clone_decl(decl);
            self.dst.ast_mut().push_module_decl(new);
        }
        tracing::debug!(
            decls = self.decls.len(),
            exprs = self.exprs.len(),
            symbols = self.symbols.len(),
            "cloned module"
        );
    }

    // === Symbols & Types ===

    pub fn clone_symbol(&mut self, symbol: Symbol) -> Symbol {
        if !symbol.is_valid() {
            return Symbol::INVALID;
        }
        if let Some(&done) = self.symbols.get(&symbol) {
            return done;
        }
        let src = self.src;
        let Some(name) = src.symbols().name_for(symbol) else {
            ice!(
                self.ice,
                "cloned symbol {symbol:?} does not belong to source generation {:?}",
                src.generation()
            )
        };
        let renamed = self.renamer.as_mut().and_then(|rename| rename(name));
        let new = match renamed {
            Some(prefix) => {
                let new = self.dst.unique_sym(&prefix);
                tracing::trace!(from = name, to = ?self.dst.symbols().name_for(new), "renamed symbol");
                new
            }
            None => self.dst.sym(name),
        };
        self.symbols.insert(symbol, new);
        new
    }

    pub fn clone_type(&mut self, ty: TypeId) -> TypeId {
        if ty == TypeId::NONE {
            return TypeId::NONE;
        }
        if let Some(&done) = self.types.get(&ty) {
            return done;
        }
        let src = self.src;
        let new = match *src.types().data(ty) {
            TypeData::Bool => TypeId::BOOL,
            TypeData::I32 => TypeId::I32,
            TypeData::U32 => TypeId::U32,
            TypeData::F32 => TypeId::F32,
            TypeData::Vector { elem, width } => {
                let elem = self.clone_type(elem);
                self.dst.types_mut().vector(elem, width)
            }
            TypeData::Matrix { columns, rows, elem } => {
                let elem = self.clone_type(elem);
                self.dst.types_mut().matrix(columns, rows, elem)
            }
            TypeData::Pointer { pointee, storage } => {
                let pointee = self.clone_type(pointee);
                self.dst.types_mut().pointer(pointee, storage)
            }
            TypeData::Sampler(kind) => self.dst.types_mut().sampler(kind),
            TypeData::Texture(TextureType { dim, kind }) => {
                let kind = match kind {
                    TextureKind::Sampled(sample) => TextureKind::Sampled(self.clone_type(sample)),
                    TextureKind::Multisampled(sample) => TextureKind::Multisampled(self.clone_type(sample)),
                    TextureKind::Depth | TextureKind::Storage { .. } => kind,
                };
                self.dst.types_mut().texture(TextureType { dim, kind })
            }
            TypeData::Struct(ref st) => {
                let decl = self.clone_decl(st.decl);
                match self.dst.types().struct_for_decl(decl) {
                    Some(new) => new,
                    None => ice!(self.ice, "struct declaration {decl:?} cloned without a type"),
                }
            }
            TypeData::Array { elem, count, stride } => {
                let elem = self.clone_type(elem);
                self.dst.types_mut().array(elem, count, stride)
            }
            TypeData::Alias { name, target } => {
                let name = self.clone_symbol(name);
                let target = self.clone_type(target);
                self.dst.types_mut().alias(name, target)
            }
            TypeData::AccessControl { access, inner } => {
                let inner = self.clone_type(inner);
                self.dst.types_mut().access_control(access, inner)
            }
        };
        self.types.insert(ty, new);
        new
    }

    fn clone_opt_type(&mut self, ty: Option<TypeId>) -> Option<TypeId> {
        ty.map(|ty| self.clone_type(ty))
    }

    // === Declarations ===

    pub fn clone_decl(&mut self, id: DeclId) -> DeclId {
        if let Some(&done) = self.decls.get(&id) {
            return done;
        }
        let src = self.src;
        let decl = *src.ast().decl(id);
        let span = decl.span;

        let kind = match decl.kind {
            DeclKind::Struct { name, members, ty } => return self.clone_struct_decl(id, name, members, ty, span),
            DeclKind::GlobalVar(var) => DeclKind::GlobalVar(self.clone_var(var)),
            DeclKind::Function(func) => {
                let name = self.clone_symbol(func.name);
                let attrs = self.clone_attrs(func.attrs);
                let params = self.clone_vars(func.params);
                let return_type = self.clone_opt_type(func.return_type);
                let return_attrs = self.clone_attrs(func.return_attrs);
                let body = self.clone_stmts(func.body);
                DeclKind::Function(FunctionDecl {
                    name,
                    params,
                    return_type,
                    return_attrs,
                    body,
                    attrs,
                })
            }
            DeclKind::Alias { name, ty } => {
                let name = self.clone_symbol(name);
                let ty = self.clone_type(ty);
                DeclKind::Alias { name, ty }
            }
            DeclKind::DiagnosticDirective(control) => DeclKind::DiagnosticDirective(self.clone_control(control)),
        };
        let new = self.dst.ast_mut().alloc_decl(kind, span);
        self.decls.insert(id, new);
        new
    }

    fn clone_struct_decl(&mut self, id: DeclId, name: Symbol, members: MemberRange, ty: TypeId, span: Span) -> DeclId {
        let new = self.dst.ast_mut().reserve_decl(span);
        self.decls.insert(id, new);
        let name = self.clone_symbol(name);
        let members = self.clone_members(members);
        let ast = self.dst.ast();
        let layout: Vec<StructMember> = ast
            .member_list(members)
            .iter()
            .map(|&m| StructMember {
                name: ast.member(m).name,
                ty: ast.member(m).ty,
            })
            .collect();
        let new_ty = self.dst.types_mut().struct_type(new, name, layout);
        self.types.insert(ty, new_ty);
        self.dst.ast_mut().set_decl_kind(
            new,
            DeclKind::Struct {
                name,
                members,
                ty: new_ty,
            },
        );
        new
    }

    pub fn clone_var(&mut self, id: VarId) -> VarId {
        if let Some(&done) = self.vars.get(&id) {
            return done;
        }
        let src = self.src;
        let var = *src.ast().var(id);
        let name = self.clone_symbol(var.name);
        let ty = self.clone_opt_type(var.ty);
        let init = var.init.map(|init| self.clone_expr(init));
        let attrs = self.clone_attrs(var.attrs);
        let new = self
            .dst
            .ast_mut()
            .alloc_var(name, var.kind, var.storage, ty, init, attrs, var.span);
        self.vars.insert(id, new);
        new
    }

    pub fn clone_member(&mut self, id: MemberId) -> MemberId {
        if let Some(&done) = self.members.get(&id) {
            return done;
        }
        let src = self.src;
        let member = *src.ast().member(id);
        let name = self.clone_symbol(member.name);
        let ty = self.clone_type(member.ty);
        let attrs = self.clone_attrs(member.attrs);
        let new = self.dst.ast_mut().alloc_member(name, ty, attrs, member.span);
        self.members.insert(id, new);
        new
    }

    pub fn clone_attr(&mut self, id: AttrId) -> AttrId {
        if let Some(&done) = self.attrs.get(&id) {
            return done;
        }
        let src = self.src;
        let attr = *src.ast().attr(id);
        let kind = match attr.kind {
            AttrKind::Diagnostic(control) => AttrKind::Diagnostic(self.clone_control(control)),
            kind @ (AttrKind::Stage(_)
            | AttrKind::WorkgroupSize(..)
            | AttrKind::Location(_)
            | AttrKind::Builtin(_)
            | AttrKind::Group(_)
            | AttrKind::Binding(_)) => kind,
        };
        let new = self.dst.ast_mut().alloc_attr(kind, attr.span);
        self.attrs.insert(id, new);
        new
    }

    fn clone_control(&mut self, control: DiagnosticControl) -> DiagnosticControl {
        let rule_name = self.clone_symbol(control.rule_name);
        DiagnosticControl::new(&self.ice, control.severity, rule_name, control.span)
    }

    // === Statements ===

    pub fn clone_stmt(&mut self, id: StmtId) -> StmtId {
        if let Some(&done) = self.stmts.get(&id) {
            return done;
        }
        lumen_stack::ensure_sufficient_stack(|| {
            let src = self.src;
            let stmt = *src.ast().stmt(id);
            let kind = match stmt.kind {
                StmtKind::Assign { lhs, rhs } => {
                    let lhs = self.clone_expr(lhs);
                    let rhs = self.clone_expr(rhs);
                    StmtKind::Assign { lhs, rhs }
                }
                StmtKind::VarDecl(var) => StmtKind::VarDecl(self.clone_var(var)),
                StmtKind::Block(body) => StmtKind::Block(self.clone_stmts(body)),
                StmtKind::If {
                    cond,
                    body,
                    else_stmt,
                } => {
                    let cond = self.clone_expr(cond);
                    let body = self.clone_stmts(body);
                    let else_stmt = else_stmt.map(|e| self.clone_stmt(e));
                    StmtKind::If {
                        cond,
                        body,
                        else_stmt,
                    }
                }
                StmtKind::Loop { body, continuing } => {
                    let body = self.clone_stmts(body);
                    let continuing = continuing.map(|c| self.clone_stmts(c));
                    StmtKind::Loop { body, continuing }
                }
                StmtKind::Switch { cond, cases } => {
                    let cond = self.clone_expr(cond);
                    let cases = self.clone_cases(cases);
                    StmtKind::Switch { cond, cases }
                }
                StmtKind::Return(value) => StmtKind::Return(value.map(|v| self.clone_expr(v))),
                StmtKind::Call(call) => StmtKind::Call(self.clone_expr(call)),
                kind @ (StmtKind::Break | StmtKind::Continue | StmtKind::Discard) => kind,
            };
            let new = self.dst.ast_mut().alloc_stmt(kind, stmt.span);
            self.stmts.insert(id, new);
            new
        })
    }

    pub fn clone_case(&mut self, id: CaseId) -> CaseId {
        if let Some(&done) = self.cases.get(&id) {
            return done;
        }
        let src = self.src;
        let case = *src.ast().case(id);
        let selectors = self.clone_selectors(case.selectors);
        let body = self.clone_stmts(case.body);
        let new = self.dst.ast_mut().alloc_case(selectors, body, case.span);
        self.cases.insert(id, new);
        new
    }

    pub fn clone_selector(&mut self, id: SelectorId) -> SelectorId {
        if let Some(&done) = self.selectors.get(&id) {
            return done;
        }
        let src = self.src;
        let selector = *src.ast().selector(id);
        let expr = selector.expr.map(|e| self.clone_expr(e));
        let new = self.dst.ast_mut().alloc_selector(expr, selector.span);
        self.selectors.insert(id, new);
        new
    }

    // === Expressions ===

    pub fn clone_expr(&mut self, id: ExprId) -> ExprId {
        if let Some(&done) = self.exprs.get(&id) {
            return done;
        }
        lumen_stack::ensure_sufficient_stack(|| {
            let src = self.src;
            let expr = *src.ast().expr(id);
            let kind = match expr.kind {
                ExprKind::Literal(lit) => ExprKind::Literal(lit),
                ExprKind::Ident(name) => ExprKind::Ident(self.clone_symbol(name)),
                ExprKind::Unary { op, operand } => {
                    let operand = self.clone_expr(operand);
                    ExprKind::Unary { op, operand }
                }
                ExprKind::Binary { op, lhs, rhs } => {
                    let lhs = self.clone_expr(lhs);
                    let rhs = self.clone_expr(rhs);
                    ExprKind::Binary { op, lhs, rhs }
                }
                ExprKind::Call { callee, args } => {
                    let callee = self.clone_symbol(callee);
                    let args = self.clone_exprs(args);
                    ExprKind::Call { callee, args }
                }
                ExprKind::TypeConstructor { ty, args } => {
                    let ty = self.clone_type(ty);
                    let args = self.clone_exprs(args);
                    ExprKind::TypeConstructor { ty, args }
                }
                ExprKind::Member { object, member } => {
                    let object = self.clone_expr(object);
                    let member = self.clone_symbol(member);
                    ExprKind::Member { object, member }
                }
                ExprKind::Index { object, index } => {
                    let object = self.clone_expr(object);
                    let index = self.clone_expr(index);
                    ExprKind::Index { object, index }
                }
                ExprKind::Bitcast { ty, operand } => {
                    let ty = self.clone_type(ty);
                    let operand = self.clone_expr(operand);
                    ExprKind::Bitcast { ty, operand }
                }
            };
            let new = self.dst.ast_mut().alloc_expr(kind, expr.span);
            self.exprs.insert(id, new);
            new
        })
    }

    // === Ranges ===

    fn clone_exprs(&mut self, range: ExprRange) -> ExprRange {
        let src = self.src;
        let items: SmallVec<[ExprId; 8]> = src.ast().expr_list(range).iter().map(|&e| self.clone_expr(e)).collect();
        self.dst.ast_mut().alloc_expr_list(&items)
    }

    fn clone_stmts(&mut self, range: StmtRange) -> StmtRange {
        let src = self.src;
        let items: SmallVec<[StmtId; 8]> = src.ast().stmt_list(range).iter().map(|&s| self.clone_stmt(s)).collect();
        self.dst.ast_mut().alloc_stmt_list(&items)
    }

    fn clone_vars(&mut self, range: VarRange) -> VarRange {
        let src = self.src;
        let items: SmallVec<[VarId; 4]> = src.ast().var_list(range).iter().map(|&v| self.clone_var(v)).collect();
        self.dst.ast_mut().alloc_var_list(&items)
    }

    fn clone_members(&mut self, range: MemberRange) -> MemberRange {
        let src = self.src;
        let items: SmallVec<[MemberId; 8]> =
            src.ast().member_list(range).iter().map(|&m| self.clone_member(m)).collect();
        self.dst.ast_mut().alloc_member_list(&items)
    }

    fn clone_attrs(&mut self, range: AttrRange) -> AttrRange {
        if range.is_empty() {
            return AttrRange::EMPTY;
        }
        let src = self.src;
        let items: SmallVec<[AttrId; 4]> = src.ast().attr_list(range).iter().map(|&a| self.clone_attr(a)).collect();
        self.dst.ast_mut().alloc_attr_list(&items)
    }

    fn clone_cases(&mut self, range: CaseRange) -> CaseRange {
        let src = self.src;
        let items: SmallVec<[CaseId; 8]> = src.ast().case_list(range).iter().map(|&c| self.clone_case(c)).collect();
        self.dst.ast_mut().alloc_case_list(&items)
    }

    fn clone_selectors(&mut self, range: SelectorRange) -> SelectorRange {
        let src = self.src;
        let items: SmallVec<[SelectorId; 4]> =
            src.ast().selector_list(range).iter().map(|&s| self.clone_selector(s)).collect();
        self.dst.ast_mut().alloc_selector_list(&items)
    }
}
