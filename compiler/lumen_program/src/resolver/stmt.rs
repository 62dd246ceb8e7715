//! Statement resolution.

use lumen_ast::{CaseRange, ExprId, ExprKind, Literal, StmtId, StmtKind, StmtRange, VarId, VarKind};
use lumen_diagnostic::{ice, DiagnosticRule, ErrorCode};
use lumen_ir::{Span, StorageClass, TypeId};
use lumen_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use super::builtins::Shape;
use super::{Breakable, Reference, Resolver};

impl Resolver<'_> {
    /// Resolve a block in a fresh scope.
    pub(super) fn resolve_block(&mut self, body: StmtRange) {
        self.scopes.push();
        self.resolve_stmts(body);
        self.scopes.pop();
    }

    /// Resolve statements in the current scope.
    ///
    /// The first statement after a terminator is reported once under the
    /// `unreachable_code` rule; later ones are still resolved.
    pub(super) fn resolve_stmts(&mut self, body: StmtRange) {
        let ast = self.ast;
        let mut terminated = false;
        let mut reported = false;
        for &stmt in ast.stmt_list(body) {
            if terminated && !reported {
                self.report_rule(
                    DiagnosticRule::UnreachableCode,
                    ErrorCode::E1013,
                    ast.stmt(stmt).span,
                    "unreachable code",
                );
                reported = true;
            }
            self.resolve_stmt(stmt);
            terminated |= ast.stmt(stmt).kind.is_terminator();
        }
    }

    pub(super) fn resolve_stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| self.resolve_stmt_inner(id));
    }

    fn resolve_stmt_inner(&mut self, id: StmtId) {
        let ast = self.ast;
        let stmt = *ast.stmt(id);
        match stmt.kind {
            StmtKind::Assign { lhs, rhs } => self.resolve_assign(lhs, rhs, stmt.span),
            StmtKind::VarDecl(var) => self.resolve_local(var),
            StmtKind::Block(body) => self.resolve_block(body),
            StmtKind::If {
                cond,
                body,
                else_stmt,
            } => {
                let uniform = self.resolve_condition(cond);
                self.with_uniformity(uniform, |this| {
                    this.resolve_block(body);
                    if let Some(else_stmt) = else_stmt {
                        this.resolve_stmt(else_stmt);
                    }
                });
            }
            StmtKind::Loop { body, continuing } => {
                self.breakables.push(Breakable::Loop);
                // The continuing block sees the body's declarations.
                self.scopes.push();
                self.resolve_stmts(body);
                if let Some(continuing) = continuing {
                    self.breakables.push(Breakable::Continuing);
                    self.resolve_block(continuing);
                    self.breakables.pop();
                }
                self.scopes.pop();
                self.breakables.pop();
            }
            StmtKind::Switch { cond, cases } => self.resolve_switch(cond, cases, stmt.span),
            StmtKind::Return(value) => self.resolve_return(value, stmt.span),
            StmtKind::Break => match self.breakables.last() {
                Some(Breakable::Loop | Breakable::Switch) => {}
                Some(Breakable::Continuing) => self.error(
                    ErrorCode::E1016,
                    stmt.span,
                    "`break` is not allowed in a continuing block",
                ),
                None => self.error(ErrorCode::E1016, stmt.span, "`break` outside of a loop or switch"),
            },
            StmtKind::Continue => {
                let target = self
                    .breakables
                    .iter()
                    .rev()
                    .find(|b| **b != Breakable::Switch)
                    .copied();
                match target {
                    Some(Breakable::Loop) => {}
                    Some(Breakable::Continuing) => self.error(
                        ErrorCode::E1016,
                        stmt.span,
                        "`continue` is not allowed in a continuing block",
                    ),
                    Some(Breakable::Switch) | None => {
                        self.error(ErrorCode::E1016, stmt.span, "`continue` outside of a loop");
                    }
                }
            }
            StmtKind::Discard => {}
            StmtKind::Call(expr) => {
                if !matches!(ast.expr(expr).kind, ExprKind::Call { .. }) {
                    ice!(self.ice, "call statement wraps a non-call expression");
                }
                self.resolve_expr(expr, true);
            }
        }
    }

    /// Resolve an `if` condition and report whether it is uniform.
    fn resolve_condition(&mut self, cond: ExprId) -> bool {
        let ty = self.resolve_value(cond);
        if !ty.is_none() && Shape::of(self.types, ty) != Shape::Scalar(TypeId::BOOL) {
            let found = self.type_name(ty);
            self.error(
                ErrorCode::E1004,
                self.ast.expr(cond).span,
                format!("condition must be `bool`, found `{found}`"),
            );
        }
        self.is_uniform(cond)
    }

    fn resolve_assign(&mut self, lhs: ExprId, rhs: ExprId, span: Span) {
        let lhs_ty = self.resolve_value(lhs);
        let rhs_ty = self.resolve_value(rhs);
        match self.reference_root(lhs) {
            Reference::Mutable | Reference::Unknown => {}
            Reference::NotReference => self.error(
                ErrorCode::E1008,
                span,
                "left side of an assignment must be a variable, member or element",
            ),
            Reference::Immutable(var) => {
                let v = *self.ast.var(var);
                let name = self.name(v.name);
                let reason = match v.kind {
                    VarKind::Let => "`let` bindings are immutable".to_owned(),
                    VarKind::Const => "constants are immutable".to_owned(),
                    VarKind::Param => "function parameters are immutable".to_owned(),
                    VarKind::Var => format!("it is read-only in the {} address space", v.storage),
                };
                self.error(ErrorCode::E1008, span, format!("cannot assign to `{name}`: {reason}"));
            }
        }
        if !self.same_type(lhs_ty, rhs_ty) {
            let (expected, found) = (self.type_name(lhs_ty), self.type_name(rhs_ty));
            self.error(
                ErrorCode::E1003,
                span,
                format!("cannot assign a value of type `{found}` to `{expected}`"),
            );
        }
    }

    /// Classify the memory an expression designates.
    pub(super) fn reference_root(&self, expr: ExprId) -> Reference {
        match self.ast.expr(expr).kind {
            ExprKind::Ident(_) => match self.sem.resolved_var(expr) {
                Some(var) => {
                    let v = self.ast.var(var);
                    let writable = v.kind == VarKind::Var && self.storage_writable(v);
                    if writable {
                        Reference::Mutable
                    } else {
                        Reference::Immutable(var)
                    }
                }
                None => Reference::Unknown,
            },
            ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => {
                self.reference_root(object)
            }
            ExprKind::Unary {
                op: lumen_ast::UnaryOp::Deref,
                ..
            } => Reference::Mutable,
            _ => Reference::NotReference,
        }
    }

    fn resolve_local(&mut self, var: VarId) {
        let ast = self.ast;
        let v = *ast.var(var);
        let name = self.name(v.name);
        if v.kind == VarKind::Param {
            ice!(self.ice, "parameter `{name}` declared in a function body");
        }
        if let Some(&first) = ast.attr_list(v.attrs).first() {
            self.error(
                ErrorCode::E1009,
                ast.attr(first).span,
                "attributes are not valid on local variables",
            );
        }
        if !matches!(v.storage, StorageClass::None | StorageClass::Function) {
            self.error(
                ErrorCode::E1009,
                v.span,
                format!("local variable `{name}` cannot use the {} address space", v.storage),
            );
        }

        let ty = self.resolve_var_type(var, &v);
        if self.flags(ty).contains(lumen_types::TypeFlags::IS_HANDLE) && v.kind == VarKind::Var {
            let ty = self.type_name(ty);
            self.error(
                ErrorCode::E1003,
                v.span,
                format!("local variable `{name}` cannot have handle type `{ty}`"),
            );
        }
        let uniform = match v.kind {
            VarKind::Var | VarKind::Param => false,
            VarKind::Let | VarKind::Const => v.init.map_or(true, |init| self.is_uniform(init)),
        };
        self.uniform_vars.insert(var, uniform);

        // Declared after the initializer, so `let x = x;` sees the outer `x`.
        if self.scopes.declare(v.name, var).is_some() {
            self.error(
                ErrorCode::E1002,
                v.span,
                format!("`{name}` is already declared in this scope"),
            );
        }
    }

    fn resolve_switch(&mut self, cond: ExprId, cases: CaseRange, span: Span) {
        let ast = self.ast;
        let cond_ty = self.resolve_value(cond);
        let selector_ty = match Shape::of(self.types, cond_ty) {
            Shape::Scalar(ty @ (TypeId::I32 | TypeId::U32)) => Some(ty),
            _ if cond_ty.is_none() => None,
            _ => {
                let found = self.type_name(cond_ty);
                self.error(
                    ErrorCode::E1015,
                    ast.expr(cond).span,
                    format!("switch selector must be `i32` or `u32`, found `{found}`"),
                );
                None
            }
        };
        let uniform = self.is_uniform(cond);

        self.breakables.push(Breakable::Switch);
        self.with_uniformity(uniform, |this| {
            let mut seen: FxHashMap<i64, Span> = FxHashMap::default();
            let mut defaults = 0usize;
            for &case in ast.case_list(cases) {
                let case = *ast.case(case);
                for &selector in ast.selector_list(case.selectors) {
                    let selector = *ast.selector(selector);
                    let Some(expr) = selector.expr else {
                        defaults += 1;
                        continue;
                    };
                    let ty = this.resolve_value(expr);
                    let value = match ast.expr(expr).kind {
                        ExprKind::Literal(Literal::I32(v)) => i64::from(v),
                        ExprKind::Literal(Literal::U32(v)) => i64::from(v),
                        _ => {
                            this.error(
                                ErrorCode::E1015,
                                selector.span,
                                "case selector must be an integer literal",
                            );
                            continue;
                        }
                    };
                    if let Some(expected) = selector_ty {
                        if !this.same_type(expected, ty) {
                            let (expected, found) = (this.type_name(expected), this.type_name(ty));
                            this.error(
                                ErrorCode::E1015,
                                selector.span,
                                format!("case selector of type `{found}` does not match switch type `{expected}`"),
                            );
                        }
                    }
                    if seen.insert(value, selector.span).is_some() {
                        this.error(
                            ErrorCode::E1015,
                            selector.span,
                            format!("duplicate case selector `{value}`"),
                        );
                    }
                }
                this.resolve_block(case.body);
            }
            if defaults != 1 {
                this.error(
                    ErrorCode::E1015,
                    span,
                    format!("switch must have exactly one `default` case, found {defaults}"),
                );
            }
        });
        self.breakables.pop();
    }

    fn resolve_return(&mut self, value: Option<ExprId>, span: Span) {
        if self.breakables.contains(&Breakable::Continuing) {
            self.error(ErrorCode::E1016, span, "`return` is not allowed in a continuing block");
        }
        let Some(current) = self.current_fn else {
            ice!(self.ice, "return statement outside of a function");
        };
        let name = self.name(current.name);
        match (value, current.return_type) {
            (None, None) => {}
            (Some(value), None) => {
                self.resolve_value(value);
                self.error(
                    ErrorCode::E1007,
                    span,
                    format!("function `{name}` does not return a value"),
                );
            }
            (None, Some(expected)) => {
                let expected = self.type_name(expected);
                self.error(
                    ErrorCode::E1007,
                    span,
                    format!("expected a return value of type `{expected}`"),
                );
            }
            (Some(value), Some(expected)) => {
                let found = self.resolve_value(value);
                if !self.same_type(expected, found) {
                    let (expected, found) = (self.type_name(expected), self.type_name(found));
                    self.error(
                        ErrorCode::E1007,
                        span,
                        format!("expected return type `{expected}`, found `{found}`"),
                    );
                }
            }
        }
    }

    // === Return Analysis ===

    pub(super) fn block_always_returns(&self, body: StmtRange) -> bool {
        self.ast
            .stmt_list(body)
            .iter()
            .any(|&stmt| self.stmt_always_returns(stmt))
    }

    fn stmt_always_returns(&self, stmt: StmtId) -> bool {
        match self.ast.stmt(stmt).kind {
            StmtKind::Return(_) | StmtKind::Discard => true,
            StmtKind::Block(body) => self.block_always_returns(body),
            StmtKind::If {
                body,
                else_stmt: Some(else_stmt),
                ..
            } => self.block_always_returns(body) && self.stmt_always_returns(else_stmt),
            StmtKind::Switch { cases, .. } => self
                .ast
                .case_list(cases)
                .iter()
                .all(|&case| self.block_always_returns(self.ast.case(case).body)),
            // A loop only exits through `break`.
            StmtKind::Loop { body, .. } => !self.breaks_out(body),
            _ => false,
        }
    }

    /// Whether `body` contains a `break` that leaves the enclosing loop.
    fn breaks_out(&self, body: StmtRange) -> bool {
        self.ast
            .stmt_list(body)
            .iter()
            .any(|&stmt| self.breaks_out_stmt(stmt))
    }

    fn breaks_out_stmt(&self, stmt: StmtId) -> bool {
        match self.ast.stmt(stmt).kind {
            StmtKind::Break => true,
            StmtKind::Block(inner) => self.breaks_out(inner),
            StmtKind::If {
                body, else_stmt, ..
            } => self.breaks_out(body) || else_stmt.is_some_and(|e| self.breaks_out_stmt(e)),
            // Nested loops and switches own their breaks.
            _ => false,
        }
    }
}
