//! Program construction.
//!
//! `ProgramBuilder` is the mutable phase of a program. Parsers, tests and
//! the clone protocol all build modules through it; `build()` then runs
//! semantic analysis and freezes the result into a [`Program`].

use std::sync::Arc;

use lumen_ast::{
    AttrId, AttrKind, AttrRange, Ast, BinaryOp, CaseId, DeclKind, ExprId, ExprKind, FunctionDecl, Literal,
    MemberId, SelectorId, StmtId, StmtKind, UnaryOp, VarId, VarKind,
};
use lumen_diagnostic::{ice, Diagnostic, DiagnosticControl, DiagnosticList, RuleSeverity};
use lumen_ir::{DeclId, GenerationId, Source, Span, StorageClass, Symbol, SymbolTable, TypeId};
use lumen_types::{Pool, StructMember};
use smallvec::SmallVec;

use crate::{resolver, Program, Session};

/// Signature of a function under construction.
///
/// ```text
/// let sig = FunctionSig::new()
///     .with_param(x)
///     .with_return_type(f32)
///     .with_attr(stage);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FunctionSig {
    pub params: SmallVec<[VarId; 4]>,
    pub return_type: Option<TypeId>,
    pub return_attrs: SmallVec<[AttrId; 2]>,
    pub attrs: SmallVec<[AttrId; 2]>,
}

impl FunctionSig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_param(mut self, param: VarId) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn with_return_type(mut self, ty: TypeId) -> Self {
        self.return_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_return_attr(mut self, attr: AttrId) -> Self {
        self.return_attrs.push(attr);
        self
    }

    #[must_use]
    pub fn with_attr(mut self, attr: AttrId) -> Self {
        self.attrs.push(attr);
        self
    }
}

/// Mutable phase of a program: one fresh generation being filled in.
pub struct ProgramBuilder {
    session: Session,
    generation: GenerationId,
    symbols: SymbolTable,
    types: Pool,
    ast: Ast,
    diagnostics: DiagnosticList,
    source: Option<Arc<Source>>,
}

impl ProgramBuilder {
    /// Start a program in a new generation.
    pub fn new(session: &Session) -> Self {
        let generation = GenerationId::next();
        tracing::trace!(?generation, "new program builder");
        ProgramBuilder {
            session: session.clone(),
            generation,
            symbols: SymbolTable::new(generation),
            types: Pool::new(session.ice().clone()),
            ast: Ast::new(generation, session.ice().clone()),
            diagnostics: DiagnosticList::new(),
            source: None,
        }
    }

    /// Attach the source buffer spans refer to.
    #[must_use]
    pub fn with_source(mut self, source: Arc<Source>) -> Self {
        self.source = Some(source);
        self
    }

    // === Accessors ===

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn types(&self) -> &Pool {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut Pool {
        &mut self.types
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Record a diagnostic found while building, e.g. by a parser.
    pub fn push_diagnostic(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    /// Intern a spelling.
    pub fn sym(&mut self, name: &str) -> Symbol {
        match self.symbols.register(name) {
            Some(symbol) => symbol,
            None => ice!(self.session.ice(), "symbol table is full, cannot intern `{name}`"),
        }
    }

    /// Intern a spelling derived from `prefix` that is not yet in use.
    pub fn unique_sym(&mut self, prefix: &str) -> Symbol {
        match self.symbols.new_unique(prefix) {
            Some(symbol) => symbol,
            None => ice!(self.session.ice(), "symbol table is full, cannot intern `{prefix}`"),
        }
    }

    // === Expressions ===

    pub fn lit(&mut self, literal: Literal, span: Span) -> ExprId {
        self.ast.alloc_expr(ExprKind::Literal(literal), span)
    }

    pub fn lit_bool(&mut self, value: bool, span: Span) -> ExprId {
        self.lit(Literal::Bool(value), span)
    }

    pub fn lit_i32(&mut self, value: i32, span: Span) -> ExprId {
        self.lit(Literal::I32(value), span)
    }

    pub fn lit_u32(&mut self, value: u32, span: Span) -> ExprId {
        self.lit(Literal::U32(value), span)
    }

    pub fn lit_f32(&mut self, value: f32, span: Span) -> ExprId {
        self.lit(Literal::f32(value), span)
    }

    pub fn ident(&mut self, name: &str, span: Span) -> ExprId {
        let name = self.sym(name);
        self.ast.alloc_expr(ExprKind::Ident(name), span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> ExprId {
        self.ast.alloc_expr(ExprKind::Unary { op, operand }, span)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId, span: Span) -> ExprId {
        self.ast.alloc_expr(ExprKind::Binary { op, lhs, rhs }, span)
    }

    pub fn call(&mut self, callee: &str, args: &[ExprId], span: Span) -> ExprId {
        let callee = self.sym(callee);
        let args = self.ast.alloc_expr_list(args);
        self.ast.alloc_expr(ExprKind::Call { callee, args }, span)
    }

    pub fn construct(&mut self, ty: TypeId, args: &[ExprId], span: Span) -> ExprId {
        let args = self.ast.alloc_expr_list(args);
        self.ast.alloc_expr(ExprKind::TypeConstructor { ty, args }, span)
    }

    /// Member access or swizzle.
    pub fn member_expr(&mut self, object: ExprId, member: &str, span: Span) -> ExprId {
        let member = self.sym(member);
        self.ast.alloc_expr(ExprKind::Member { object, member }, span)
    }

    pub fn index(&mut self, object: ExprId, index: ExprId, span: Span) -> ExprId {
        self.ast.alloc_expr(ExprKind::Index { object, index }, span)
    }

    pub fn bitcast(&mut self, ty: TypeId, operand: ExprId, span: Span) -> ExprId {
        self.ast.alloc_expr(ExprKind::Bitcast { ty, operand }, span)
    }

    // === Statements ===

    pub fn assign(&mut self, lhs: ExprId, rhs: ExprId, span: Span) -> StmtId {
        self.ast.alloc_stmt(StmtKind::Assign { lhs, rhs }, span)
    }

    /// Declare a function-scope variable and return its declaration
    /// statement.
    pub fn local(
        &mut self,
        kind: VarKind,
        name: &str,
        ty: Option<TypeId>,
        init: Option<ExprId>,
        span: Span,
    ) -> StmtId {
        let name = self.sym(name);
        let storage = if kind == VarKind::Var {
            StorageClass::Function
        } else {
            StorageClass::None
        };
        let var = self
            .ast
            .alloc_var(name, kind, storage, ty, init, AttrRange::EMPTY, span);
        self.ast.alloc_stmt(StmtKind::VarDecl(var), span)
    }

    pub fn block(&mut self, body: &[StmtId], span: Span) -> StmtId {
        let body = self.ast.alloc_stmt_list(body);
        self.ast.alloc_stmt(StmtKind::Block(body), span)
    }

    pub fn if_stmt(&mut self, cond: ExprId, body: &[StmtId], else_stmt: Option<StmtId>, span: Span) -> StmtId {
        let body = self.ast.alloc_stmt_list(body);
        self.ast.alloc_stmt(
            StmtKind::If {
                cond,
                body,
                else_stmt,
            },
            span,
        )
    }

    pub fn loop_stmt(&mut self, body: &[StmtId], continuing: Option<&[StmtId]>, span: Span) -> StmtId {
        let body = self.ast.alloc_stmt_list(body);
        let continuing = continuing.map(|c| self.ast.alloc_stmt_list(c));
        self.ast.alloc_stmt(StmtKind::Loop { body, continuing }, span)
    }

    pub fn switch(&mut self, cond: ExprId, cases: &[CaseId], span: Span) -> StmtId {
        let cases = self.ast.alloc_case_list(cases);
        self.ast.alloc_stmt(StmtKind::Switch { cond, cases }, span)
    }

    pub fn case(&mut self, selectors: &[SelectorId], body: &[StmtId], span: Span) -> CaseId {
        let selectors = self.ast.alloc_selector_list(selectors);
        let body = self.ast.alloc_stmt_list(body);
        self.ast.alloc_case(selectors, body, span)
    }

    /// A case selector; `None` is `default`.
    pub fn selector(&mut self, expr: Option<ExprId>, span: Span) -> SelectorId {
        self.ast.alloc_selector(expr, span)
    }

    pub fn ret(&mut self, value: Option<ExprId>, span: Span) -> StmtId {
        self.ast.alloc_stmt(StmtKind::Return(value), span)
    }

    pub fn break_stmt(&mut self, span: Span) -> StmtId {
        self.ast.alloc_stmt(StmtKind::Break, span)
    }

    pub fn continue_stmt(&mut self, span: Span) -> StmtId {
        self.ast.alloc_stmt(StmtKind::Continue, span)
    }

    pub fn discard(&mut self, span: Span) -> StmtId {
        self.ast.alloc_stmt(StmtKind::Discard, span)
    }

    pub fn call_stmt(&mut self, callee: &str, args: &[ExprId], span: Span) -> StmtId {
        let call = self.call(callee, args, span);
        self.ast.alloc_stmt(StmtKind::Call(call), span)
    }

    // === Attributes ===

    pub fn attr(&mut self, kind: AttrKind, span: Span) -> AttrId {
        self.ast.alloc_attr(kind, span)
    }

    /// `@diagnostic(severity, rule)` attribute.
    pub fn diagnostic_attr(&mut self, severity: RuleSeverity, rule: &str, span: Span) -> AttrId {
        let control = self.diagnostic_control(severity, rule, span);
        self.ast.alloc_attr(AttrKind::Diagnostic(control), span)
    }

    fn diagnostic_control(&mut self, severity: RuleSeverity, rule: &str, span: Span) -> DiagnosticControl {
        let rule = self.sym(rule);
        DiagnosticControl::new(self.session.ice(), severity, rule, span)
    }

    // === Declarations ===

    pub fn param(&mut self, name: &str, ty: TypeId, attrs: &[AttrId], span: Span) -> VarId {
        let name = self.sym(name);
        let attrs = self.ast.alloc_attr_list(attrs);
        self.ast
            .alloc_var(name, VarKind::Param, StorageClass::None, Some(ty), None, attrs, span)
    }

    pub fn struct_member(&mut self, name: &str, ty: TypeId, attrs: &[AttrId], span: Span) -> MemberId {
        let name = self.sym(name);
        let attrs = self.ast.alloc_attr_list(attrs);
        self.ast.alloc_member(name, ty, attrs, span)
    }

    /// Declare a struct and create its type.
    pub fn struct_decl(&mut self, name: &str, members: &[MemberId], span: Span) -> (DeclId, TypeId) {
        let name = self.sym(name);
        let decl = self.ast.reserve_decl(span);
        let fields = members
            .iter()
            .map(|&m| {
                let member = self.ast.member(m);
                StructMember {
                    name: member.name,
                    ty: member.ty,
                }
            })
            .collect();
        let ty = self.types.struct_type(decl, name, fields);
        let members = self.ast.alloc_member_list(members);
        self.ast
            .set_decl_kind(decl, DeclKind::Struct { name, members, ty });
        self.ast.push_module_decl(decl);
        (decl, ty)
    }

    /// Declare a type alias and create its type.
    pub fn alias(&mut self, name: &str, target: TypeId, span: Span) -> (DeclId, TypeId) {
        let name = self.sym(name);
        let ty = self.types.alias(name, target);
        let decl = self.ast.alloc_decl(DeclKind::Alias { name, ty }, span);
        self.ast.push_module_decl(decl);
        (decl, ty)
    }

    /// Declare a module-scope `var`.
    pub fn global_var(
        &mut self,
        name: &str,
        storage: StorageClass,
        ty: TypeId,
        init: Option<ExprId>,
        attrs: &[AttrId],
        span: Span,
    ) -> DeclId {
        let name = self.sym(name);
        let attrs = self.ast.alloc_attr_list(attrs);
        let var = self
            .ast
            .alloc_var(name, VarKind::Var, storage, Some(ty), init, attrs, span);
        self.push_decl(DeclKind::GlobalVar(var), span)
    }

    /// Declare a module-scope `const`.
    pub fn global_const(&mut self, name: &str, ty: Option<TypeId>, init: ExprId, span: Span) -> DeclId {
        let name = self.sym(name);
        let var = self.ast.alloc_var(
            name,
            VarKind::Const,
            StorageClass::None,
            ty,
            Some(init),
            AttrRange::EMPTY,
            span,
        );
        self.push_decl(DeclKind::GlobalVar(var), span)
    }

    pub fn function(&mut self, name: &str, sig: &FunctionSig, body: &[StmtId], span: Span) -> DeclId {
        let name = self.sym(name);
        let func = FunctionDecl {
            name,
            params: self.ast.alloc_var_list(&sig.params),
            return_type: sig.return_type,
            return_attrs: self.ast.alloc_attr_list(&sig.return_attrs),
            body: self.ast.alloc_stmt_list(body),
            attrs: self.ast.alloc_attr_list(&sig.attrs),
        };
        self.push_decl(DeclKind::Function(func), span)
    }

    /// Module-level `diagnostic(severity, rule);`.
    pub fn diagnostic_directive(&mut self, severity: RuleSeverity, rule: &str, span: Span) -> DeclId {
        let control = self.diagnostic_control(severity, rule, span);
        self.push_decl(DeclKind::DiagnosticDirective(control), span)
    }

    fn push_decl(&mut self, kind: DeclKind, span: Span) -> DeclId {
        let decl = self.ast.alloc_decl(kind, span);
        self.ast.push_module_decl(decl);
        decl
    }

    // === Finish ===

    /// Resolve the module and freeze it.
    #[tracing::instrument(level = "debug", skip_all, fields(generation = ?self.generation))]
    pub fn build(self) -> Program {
        let ProgramBuilder {
            session,
            generation,
            symbols,
            mut types,
            ast,
            mut diagnostics,
            source,
        } = self;
        let sem = resolver::resolve(
            &symbols,
            &mut types,
            &ast,
            &mut diagnostics,
            session.rule_defaults(),
        );
        Program::new(session, generation, symbols, types, ast, sem, diagnostics, source)
    }
}

#[cfg(test)]
mod tests;
