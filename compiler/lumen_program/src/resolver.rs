//! Semantic analysis.
//!
//! The `Resolver` walks a module once the builder has finished it, records
//! types and name bindings in a [`Sem`], and appends diagnostics. It never
//! stops at the first error: every independent declaration is checked.
//!
//! # Passes
//!
//! ```text
//! Pass 0: Diagnostic directives
//!   - Module-wide rule severities, regardless of position
//!
//! Pass 1: Module names
//!   - Every struct, alias, global and function, so later declarations
//!     can be referenced from earlier ones
//!
//! Pass 2: Types and globals
//!   - Struct members, global initializers, resource bindings
//!
//! Pass 3: Functions
//!   - Signatures, entry point attributes, bodies
//! ```
//!
//! A `TypeId::NONE` result means "already reported". Every check treats it
//! as compatible with anything, so one mistake yields one diagnostic.

mod builtins;
mod expr;
mod scope;
mod stmt;
mod uniformity;

use lumen_ast::{AttrKind, Ast, DeclKind, FunctionDecl, MemberRange, PipelineStage, VarId, VarKind, Variable};
use lumen_diagnostic::{
    ice, Diagnostic, DiagnosticControl, DiagnosticList, DiagnosticRule, ErrorCode, IceHandler,
    RuleSeverities,
};
use lumen_ir::{DeclId, Span, StorageClass, Symbol, SymbolTable, TypeId};
use lumen_types::{ArrayCount, Pool, TypeData, TypeFlags};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{EntryPoint, Sem};

pub use builtins::BuiltinFn;

use scope::Scopes;

/// Run semantic analysis over a finished module.
#[tracing::instrument(level = "debug", skip_all, fields(generation = ?ast.generation()))]
pub(crate) fn resolve(
    symbols: &SymbolTable,
    types: &mut Pool,
    ast: &Ast,
    diagnostics: &mut DiagnosticList,
    rules: RuleSeverities,
) -> Sem {
    let resolver = Resolver::new(symbols, types, ast, diagnostics, rules);
    resolver.run()
}

/// Innermost construct a `break` or `continue` could refer to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Breakable {
    Loop,
    Switch,
    Continuing,
}

/// Function whose body is being resolved.
#[derive(Copy, Clone, Debug)]
struct CurrentFn {
    decl: DeclId,
    name: Symbol,
    return_type: Option<TypeId>,
}

/// Whether an expression designates writable memory.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Reference {
    Mutable,
    Immutable(VarId),
    NotReference,
    /// The root failed to resolve and was already reported.
    Unknown,
}

pub(crate) struct Resolver<'a> {
    // === Immutable Context ===
    ast: &'a Ast,
    symbols: &'a SymbolTable,
    ice: IceHandler,

    // === Type Storage ===
    types: &'a mut Pool,

    // === Output ===
    sem: Sem,
    diagnostics: &'a mut DiagnosticList,

    // === Names ===
    module_scope: FxHashMap<Symbol, DeclId>,
    scopes: Scopes,
    bindings: FxHashMap<(u32, u32), VarId>,

    // === Rule State ===
    rules: RuleSeverities,

    // === Function State ===
    current_fn: Option<CurrentFn>,
    breakables: Vec<Breakable>,
    non_uniform_depth: u32,
    uniform_vars: FxHashMap<VarId, bool>,
}

impl<'a> Resolver<'a> {
    fn new(
        symbols: &'a SymbolTable,
        types: &'a mut Pool,
        ast: &'a Ast,
        diagnostics: &'a mut DiagnosticList,
        rules: RuleSeverities,
    ) -> Self {
        Resolver {
            ast,
            symbols,
            ice: types.ice().clone(),
            sem: Sem::with_capacity(ast.expr_count(), ast.var_count()),
            types,
            diagnostics,
            module_scope: FxHashMap::default(),
            scopes: Scopes::default(),
            bindings: FxHashMap::default(),
            rules,
            current_fn: None,
            breakables: Vec::new(),
            non_uniform_depth: 0,
            uniform_vars: FxHashMap::default(),
        }
    }

    fn run(mut self) -> Sem {
        self.apply_directives();
        self.register_module_names();
        self.check_declarations();
        self.check_functions();
        tracing::debug!(
            errors = self.diagnostics.error_count(),
            warnings = self.diagnostics.warning_count(),
            entry_points = self.sem.entry_points().len(),
            "resolved module"
        );
        self.sem
    }

    // === Reporting ===

    fn error(&mut self, code: ErrorCode, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(code).with_message(message).with_span(span));
    }

    /// Report a diagnostic whose severity is controlled by `rule`.
    fn report_rule(&mut self, rule: DiagnosticRule, code: ErrorCode, span: Span, message: impl Into<String>) {
        match self.rules.get(rule).to_severity() {
            Some(severity) => self.diagnostics.push(
                Diagnostic::error(code)
                    .with_severity(severity)
                    .with_message(message)
                    .with_span(span),
            ),
            None => tracing::trace!(%rule, "diagnostic silenced"),
        }
    }

    // === Names and Types ===

    fn name(&self, symbol: Symbol) -> &'a str {
        match self.symbols.name_for(symbol) {
            Some(name) => name,
            None => ice!(self.ice, "symbol {symbol:?} does not belong to this program"),
        }
    }

    fn type_name(&self, ty: TypeId) -> String {
        self.types.friendly_name(ty, self.symbols)
    }

    /// Type equality that lets unresolved types through.
    fn same_type(&self, a: TypeId, b: TypeId) -> bool {
        a.is_none() || b.is_none() || self.types.unwrap_all(a) == self.types.unwrap_all(b)
    }

    fn flags(&self, ty: TypeId) -> TypeFlags {
        if ty.is_none() {
            TypeFlags::empty()
        } else {
            self.types.flags(ty)
        }
    }

    /// Whether a `var` in this address space may be written through.
    fn storage_writable(&self, var: &Variable) -> bool {
        match var.storage {
            StorageClass::Private | StorageClass::Workgroup | StorageClass::Function | StorageClass::None => {
                true
            }
            StorageClass::Uniform | StorageClass::Handle => false,
            StorageClass::Storage => match var.ty.map(|ty| self.types.data(ty)) {
                Some(TypeData::AccessControl { access, .. }) => access.can_write(),
                _ => false,
            },
        }
    }

    // === Pass 0: Directives ===

    fn apply_directives(&mut self) {
        let ast = self.ast;
        for &decl in ast.module() {
            if let DeclKind::DiagnosticDirective(control) = ast.decl(decl).kind {
                if let Some(rule) = self.rule_for(&control) {
                    self.rules.set(rule, control.severity);
                }
            }
        }
    }

    /// Rule named by a control; unknown names are reported and ignored.
    fn rule_for(&mut self, control: &DiagnosticControl) -> Option<DiagnosticRule> {
        let name = self.name(control.rule_name);
        let rule = DiagnosticRule::from_name(name);
        if rule.is_none() {
            let known: Vec<&str> = DiagnosticRule::ALL.iter().map(|r| r.as_str()).collect();
            self.diagnostics.push(
                Diagnostic::warning(ErrorCode::E1012)
                    .with_message(format!("unknown diagnostic rule `{name}`"))
                    .with_span(control.span)
                    .with_note(format!("known rules: {}", known.join(", "))),
            );
        }
        rule
    }

    // === Pass 1: Module Names ===

    fn register_module_names(&mut self) {
        let ast = self.ast;
        for &decl in ast.module() {
            let Some(name) = ast.decl_name(decl) else {
                continue;
            };
            if self.module_scope.contains_key(&name) {
                let text = self.name(name);
                self.error(
                    ErrorCode::E1002,
                    ast.decl(decl).span,
                    format!("`{text}` is already declared at module scope"),
                );
            } else {
                self.module_scope.insert(name, decl);
            }
        }
    }

    // === Pass 2: Types and Globals ===

    fn check_declarations(&mut self) {
        let ast = self.ast;
        for &decl in ast.module() {
            match ast.decl(decl).kind {
                DeclKind::Struct { name, members, .. } => self.check_struct(name, members),
                DeclKind::GlobalVar(var) => self.check_global(var),
                DeclKind::Function(_) | DeclKind::Alias { .. } | DeclKind::DiagnosticDirective(_) => {}
            }
        }
    }

    fn check_struct(&mut self, name: Symbol, members: MemberRange) {
        let ast = self.ast;
        let struct_name = self.name(name);
        let list = ast.member_list(members);
        let mut seen = FxHashSet::default();
        for (idx, &member) in list.iter().enumerate() {
            let m = *ast.member(member);
            let member_name = self.name(m.name);
            if !seen.insert(m.name) {
                self.error(
                    ErrorCode::E1002,
                    m.span,
                    format!("duplicate member `{member_name}` in struct `{struct_name}`"),
                );
            }
            let flags = self.types.flags(m.ty);
            if flags.intersects(TypeFlags::HAS_POINTER | TypeFlags::IS_HANDLE) {
                let ty = self.type_name(m.ty);
                self.error(
                    ErrorCode::E1010,
                    m.span,
                    format!("struct member `{member_name}` cannot have type `{ty}`"),
                );
            }
            let runtime = matches!(
                self.types.data(self.types.unwrap_all(m.ty)),
                TypeData::Array {
                    count: ArrayCount::Runtime,
                    ..
                }
            );
            if runtime && idx + 1 != list.len() {
                self.error(
                    ErrorCode::E1010,
                    m.span,
                    format!("runtime-sized member `{member_name}` must be the last member of `{struct_name}`"),
                );
            }
            for &attr in ast.attr_list(m.attrs) {
                let attr = *ast.attr(attr);
                if !matches!(attr.kind, AttrKind::Location(_) | AttrKind::Builtin(_)) {
                    self.error(
                        ErrorCode::E1009,
                        attr.span,
                        format!("@{} is not valid on a struct member", attr.kind.name()),
                    );
                }
            }
        }
    }

    fn check_global(&mut self, var: VarId) {
        let v = *self.ast.var(var);
        let name = self.name(v.name);
        match v.kind {
            VarKind::Var => {
                if !v.storage.is_module_scope() {
                    self.error(
                        ErrorCode::E1017,
                        v.span,
                        format!("module-scope `var` `{name}` must declare an address space"),
                    );
                }
            }
            VarKind::Const => {}
            VarKind::Let | VarKind::Param => {
                ice!(self.ice, "{} `{name}` at module scope", v.kind.keyword());
            }
        }
        let ty = self.resolve_var_type(var, &v);
        self.check_binding(var, &v, ty);
    }

    /// Compute and record a variable's type from its declaration.
    fn resolve_var_type(&mut self, var: VarId, v: &Variable) -> TypeId {
        let name = self.name(v.name);
        let init = v.init.map(|init| self.resolve_value(init));
        let ty = match (v.ty, init) {
            (Some(declared), Some(found)) => {
                if !self.same_type(declared, found) {
                    let (expected, found) = (self.type_name(declared), self.type_name(found));
                    self.error(
                        ErrorCode::E1003,
                        v.span,
                        format!("cannot initialize `{name}` of type `{expected}` with a value of type `{found}`"),
                    );
                }
                declared
            }
            (Some(declared), None) => {
                if matches!(v.kind, VarKind::Let | VarKind::Const) {
                    self.error(
                        ErrorCode::E1019,
                        v.span,
                        format!("`{}` declaration `{name}` requires an initializer", v.kind.keyword()),
                    );
                }
                declared
            }
            (None, Some(found)) => found,
            (None, None) => {
                self.error(
                    ErrorCode::E1019,
                    v.span,
                    format!("`{name}` needs a type or an initializer"),
                );
                TypeId::NONE
            }
        };
        self.sem.set_var_type(var, ty);
        ty
    }

    fn check_binding(&mut self, var: VarId, v: &Variable, ty: TypeId) {
        let ast = self.ast;
        let name = self.name(v.name);
        let mut group = None;
        let mut binding = None;
        for &attr in ast.attr_list(v.attrs) {
            let attr = *ast.attr(attr);
            match attr.kind {
                AttrKind::Group(g) => group = Some(g),
                AttrKind::Binding(b) => binding = Some(b),
                other => self.error(
                    ErrorCode::E1009,
                    attr.span,
                    format!("@{} is not valid on a module-scope variable", other.name()),
                ),
            }
        }

        let flags = self.flags(ty);
        if !v.storage.is_resource() {
            if group.is_some() || binding.is_some() {
                self.error(
                    ErrorCode::E1009,
                    v.span,
                    format!("@group and @binding are only valid on resource variables, not `{name}`"),
                );
            }
            if flags.contains(TypeFlags::IS_HANDLE) && v.kind == VarKind::Var {
                self.error(
                    ErrorCode::E1017,
                    v.span,
                    format!("`{name}` has a handle type and must be declared in the handle address space"),
                );
            }
            return;
        }

        match (group, binding) {
            (Some(g), Some(b)) => {
                if let Some(prev) = self.bindings.insert((g, b), var) {
                    let prev_name = self.name(ast.var(prev).name);
                    self.error(
                        ErrorCode::E1017,
                        v.span,
                        format!("@group({g}) @binding({b}) is already used by `{prev_name}`"),
                    );
                }
            }
            _ => self.error(
                ErrorCode::E1017,
                v.span,
                format!("resource variable `{name}` requires @group and @binding"),
            ),
        }
        if v.init.is_some() {
            self.error(
                ErrorCode::E1017,
                v.span,
                format!("resource variable `{name}` cannot have an initializer"),
            );
        }
        if ty.is_none() {
            return;
        }
        let storage = v.storage;
        let valid = match storage {
            StorageClass::Handle => flags.contains(TypeFlags::IS_HANDLE),
            StorageClass::Uniform => {
                flags.is_host_shareable() && !flags.contains(TypeFlags::HAS_RUNTIME_ARRAY)
            }
            _ => flags.is_host_shareable(),
        };
        if !valid {
            let ty = self.type_name(ty);
            self.error(
                ErrorCode::E1017,
                v.span,
                format!("type `{ty}` cannot be used in the {storage} address space"),
            );
        }
    }

    // === Pass 3: Functions ===

    fn check_functions(&mut self) {
        let ast = self.ast;
        for (decl, func) in ast.functions() {
            self.check_function(decl, func);
        }
    }

    fn check_function(&mut self, decl: DeclId, func: &FunctionDecl) {
        let ast = self.ast;
        let saved_rules = self.rules;
        let span = ast.decl(decl).span;
        let stage = self.check_function_attrs(decl, func);

        self.current_fn = Some(CurrentFn {
            decl,
            name: func.name,
            return_type: func.return_type,
        });
        self.scopes.push();
        self.check_params(func, stage.is_some());
        if let Some(stage) = stage {
            self.check_entry_return(func, stage, span);
        }

        // Parameters and top-level locals share one scope.
        self.resolve_stmts(func.body);
        if let Some(ret) = func.return_type {
            if !self.block_always_returns(func.body) {
                let (name, ty) = (self.name(func.name), self.type_name(ret));
                self.error(
                    ErrorCode::E1007,
                    span,
                    format!("function `{name}` must return a value of type `{ty}` on every path"),
                );
            }
        }

        self.scopes.clear();
        self.breakables.clear();
        self.non_uniform_depth = 0;
        self.current_fn = None;
        self.rules = saved_rules;
    }

    /// Apply function attributes and record the entry point, if any.
    fn check_function_attrs(&mut self, decl: DeclId, func: &FunctionDecl) -> Option<PipelineStage> {
        let ast = self.ast;
        let name = self.name(func.name);
        let span = ast.decl(decl).span;
        let mut stage = None;
        let mut workgroup_size = None;
        for &attr in ast.attr_list(func.attrs) {
            let attr = *ast.attr(attr);
            match attr.kind {
                AttrKind::Stage(s) => {
                    if stage.is_some() {
                        self.error(
                            ErrorCode::E1009,
                            attr.span,
                            format!("function `{name}` has more than one pipeline stage"),
                        );
                    } else {
                        stage = Some(s);
                    }
                }
                AttrKind::WorkgroupSize(x, y, z) => {
                    if x == 0 || y == 0 || z == 0 {
                        self.error(ErrorCode::E1009, attr.span, "workgroup size must be at least 1");
                    }
                    workgroup_size = Some([x, y, z]);
                }
                AttrKind::Diagnostic(control) => {
                    if let Some(rule) = self.rule_for(&control) {
                        self.rules.set(rule, control.severity);
                    }
                }
                other => self.error(
                    ErrorCode::E1009,
                    attr.span,
                    format!("@{} is not valid on a function", other.name()),
                ),
            }
        }

        match (stage, workgroup_size) {
            (Some(PipelineStage::Compute), None) => self.error(
                ErrorCode::E1014,
                span,
                format!("compute entry point `{name}` requires @workgroup_size"),
            ),
            (Some(PipelineStage::Vertex | PipelineStage::Fragment) | None, Some(_)) => self.error(
                ErrorCode::E1009,
                span,
                "@workgroup_size is only valid on compute entry points",
            ),
            _ => {}
        }

        let stage = stage?;
        self.sem.push_entry_point(EntryPoint {
            decl,
            name: func.name,
            stage,
            workgroup_size: workgroup_size.filter(|_| stage == PipelineStage::Compute),
        });
        Some(stage)
    }

    fn check_params(&mut self, func: &FunctionDecl, is_entry: bool) {
        let ast = self.ast;
        for &param in ast.var_list(func.params) {
            let p = *ast.var(param);
            let name = self.name(p.name);
            let Some(ty) = p.ty else {
                ice!(self.ice, "parameter `{name}` has no type");
            };
            self.sem.set_var_type(param, ty);
            self.uniform_vars.insert(param, false);
            if self.scopes.declare(p.name, param).is_some() {
                self.error(ErrorCode::E1002, p.span, format!("duplicate parameter `{name}`"));
            }

            let mut has_io = false;
            for &attr in ast.attr_list(p.attrs) {
                let attr = *ast.attr(attr);
                match attr.kind {
                    AttrKind::Builtin(_) | AttrKind::Location(_) if is_entry => has_io = true,
                    AttrKind::Builtin(_) | AttrKind::Location(_) => self.error(
                        ErrorCode::E1009,
                        attr.span,
                        format!("@{} is only valid on entry point parameters", attr.kind.name()),
                    ),
                    other => self.error(
                        ErrorCode::E1009,
                        attr.span,
                        format!("@{} is not valid on a parameter", other.name()),
                    ),
                }
            }
            if is_entry && !has_io && self.types.as_struct(ty).is_none() {
                self.error(
                    ErrorCode::E1014,
                    p.span,
                    format!("entry point parameter `{name}` needs @builtin or @location"),
                );
            }
        }
    }

    fn check_entry_return(&mut self, func: &FunctionDecl, stage: PipelineStage, span: Span) {
        let name = self.name(func.name);
        let Some(ret) = func.return_type else {
            return;
        };
        if stage == PipelineStage::Compute {
            self.error(
                ErrorCode::E1014,
                span,
                format!("compute entry point `{name}` cannot return a value"),
            );
            return;
        }
        let has_io = self
            .ast
            .find_attr(func.return_attrs, |kind| {
                matches!(kind, AttrKind::Builtin(_) | AttrKind::Location(_)).then_some(())
            })
            .is_some();
        if !has_io && self.types.as_struct(ret).is_none() {
            self.error(
                ErrorCode::E1014,
                span,
                format!("return value of entry point `{name}` needs @builtin or @location"),
            );
        }
    }
}
