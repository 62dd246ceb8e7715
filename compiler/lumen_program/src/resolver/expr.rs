//! Expression typing.

use lumen_ast::{AttrKind, BinaryOp, DeclKind, ExprId, ExprKind, ExprRange, Literal, UnaryOp, VarKind};
use lumen_diagnostic::{DiagnosticRule, ErrorCode};
use lumen_ir::{Span, StorageClass, Symbol, TypeId};
use lumen_stack::ensure_sufficient_stack;
use lumen_types::{ArrayCount, TypeData};
use smallvec::SmallVec;

use super::builtins::Shape;
use super::{BuiltinFn, Resolver};
use crate::{CallTarget, MemberAccess};

impl Resolver<'_> {
    /// Resolve an expression whose value is used.
    pub(super) fn resolve_value(&mut self, id: ExprId) -> TypeId {
        self.resolve_expr(id, false)
    }

    /// Resolve an expression and record its type.
    ///
    /// With `allow_void`, a call to a function without a return type is
    /// accepted and typed `TypeId::NONE`.
    pub(super) fn resolve_expr(&mut self, id: ExprId, allow_void: bool) -> TypeId {
        ensure_sufficient_stack(|| {
            let ty = self.resolve_expr_inner(id, allow_void);
            self.sem.set_expr_type(id, ty);
            ty
        })
    }

    fn resolve_expr_inner(&mut self, id: ExprId, allow_void: bool) -> TypeId {
        let expr = *self.ast.expr(id);
        match expr.kind {
            ExprKind::Literal(lit) => match lit {
                Literal::Bool(_) => TypeId::BOOL,
                Literal::I32(_) => TypeId::I32,
                Literal::U32(_) => TypeId::U32,
                Literal::F32(_) => TypeId::F32,
            },
            ExprKind::Ident(name) => self.resolve_ident(id, name, expr.span),
            ExprKind::Unary { op, operand } => self.resolve_unary(op, operand, expr.span),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.resolve_value(lhs);
                let rhs = self.resolve_value(rhs);
                self.binary_result(op, lhs, rhs, expr.span)
            }
            ExprKind::Call { callee, args } => self.resolve_call(id, callee, args, allow_void, expr.span),
            ExprKind::TypeConstructor { ty, args } => self.resolve_constructor(ty, args, expr.span),
            ExprKind::Member { object, member } => self.resolve_member(id, object, member, expr.span),
            ExprKind::Index { object, index } => self.resolve_index(object, index, expr.span),
            ExprKind::Bitcast { ty, operand } => self.resolve_bitcast(ty, operand, expr.span),
        }
    }

    fn resolve_args(&mut self, args: ExprRange) -> SmallVec<[TypeId; 4]> {
        let ast = self.ast;
        let mut types = SmallVec::new();
        for &arg in ast.expr_list(args) {
            types.push(self.resolve_value(arg));
        }
        types
    }

    // === Names ===

    fn resolve_ident(&mut self, id: ExprId, name: Symbol, span: Span) -> TypeId {
        if let Some(var) = self.scopes.lookup(name) {
            self.sem.set_resolved_var(id, var);
            return self.sem.var_type(var);
        }
        let text = self.name(name);
        match self.module_scope.get(&name).map(|&decl| self.ast.decl(decl).kind) {
            Some(DeclKind::GlobalVar(var)) => {
                self.sem.set_resolved_var(id, var);
                self.sem.var_type(var)
            }
            Some(_) => {
                self.error(ErrorCode::E1001, span, format!("`{text}` does not name a value"));
                TypeId::NONE
            }
            None => {
                self.error(ErrorCode::E1001, span, format!("unknown identifier `{text}`"));
                TypeId::NONE
            }
        }
    }

    // === Operators ===

    fn resolve_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> TypeId {
        let ty = self.resolve_value(operand);
        if ty.is_none() {
            return TypeId::NONE;
        }
        let shape = Shape::of(self.types, ty);
        let result = match op {
            UnaryOp::Neg => matches!(
                shape,
                Shape::Scalar(TypeId::I32 | TypeId::F32) | Shape::Vector(TypeId::I32 | TypeId::F32, _)
            )
            .then_some(ty),
            UnaryOp::Not => matches!(shape, Shape::Scalar(TypeId::BOOL) | Shape::Vector(TypeId::BOOL, _))
                .then_some(ty),
            UnaryOp::Complement => matches!(
                shape,
                Shape::Scalar(TypeId::I32 | TypeId::U32) | Shape::Vector(TypeId::I32 | TypeId::U32, _)
            )
            .then_some(ty),
            UnaryOp::AddressOf => self.address_of(operand, ty),
            UnaryOp::Deref => self.types.pointee(ty).map(|(pointee, _)| pointee),
        };
        result.unwrap_or_else(|| {
            let found = self.type_name(ty);
            self.error(
                ErrorCode::E1005,
                span,
                format!("invalid operand to unary `{}`: `{found}`", op.as_symbol()),
            );
            TypeId::NONE
        })
    }

    /// Pointer to the variable (or part of it) `operand` designates.
    fn address_of(&mut self, operand: ExprId, ty: TypeId) -> Option<TypeId> {
        let mut root = operand;
        loop {
            match self.ast.expr(root).kind {
                ExprKind::Member { object, .. } | ExprKind::Index { object, .. } => root = object,
                ExprKind::Ident(_) => break,
                _ => return None,
            }
        }
        let var = self.ast.var(self.sem.resolved_var(root)?);
        if var.kind != VarKind::Var {
            return None;
        }
        let storage = match var.storage {
            StorageClass::None => StorageClass::Function,
            StorageClass::Handle => return None,
            other => other,
        };
        Some(self.types.pointer(ty, storage))
    }

    pub(super) fn binary_result(&mut self, op: BinaryOp, lhs: TypeId, rhs: TypeId, span: Span) -> TypeId {
        if lhs.is_none() || rhs.is_none() {
            return TypeId::NONE;
        }
        let (ls, rs) = (Shape::of(self.types, lhs), Shape::of(self.types, rhs));
        let result = if op.is_logical() {
            (ls == Shape::Scalar(TypeId::BOOL) && rs == Shape::Scalar(TypeId::BOOL)).then_some(TypeId::BOOL)
        } else if op.is_comparison() {
            self.comparison_result(op, ls, rs)
        } else if op.is_shift() {
            match (ls, rs) {
                (Shape::Scalar(TypeId::I32 | TypeId::U32), Shape::Scalar(TypeId::U32)) => Some(lhs),
                (Shape::Vector(TypeId::I32 | TypeId::U32, n), Shape::Vector(TypeId::U32, m)) if n == m => {
                    Some(lhs)
                }
                _ => None,
            }
        } else if op.is_bitwise() {
            let integer_or_bool = matches!(
                ls,
                Shape::Scalar(TypeId::I32 | TypeId::U32 | TypeId::BOOL)
                    | Shape::Vector(TypeId::I32 | TypeId::U32 | TypeId::BOOL, _)
            );
            (integer_or_bool && ls == rs).then_some(lhs)
        } else {
            self.arithmetic_result(op, lhs, rhs, ls, rs)
        };
        result.unwrap_or_else(|| {
            let (l, r) = (self.type_name(lhs), self.type_name(rhs));
            self.error(
                ErrorCode::E1005,
                span,
                format!("invalid operands to `{}`: `{l}` and `{r}`", op.as_symbol()),
            );
            TypeId::NONE
        })
    }

    fn comparison_result(&mut self, op: BinaryOp, ls: Shape, rs: Shape) -> Option<TypeId> {
        if ls != rs {
            return None;
        }
        let ordered = !matches!(op, BinaryOp::Eq | BinaryOp::NotEq);
        match ls {
            Shape::Scalar(elem) if !(ordered && elem == TypeId::BOOL) => Some(TypeId::BOOL),
            Shape::Vector(elem, width) if !(ordered && elem == TypeId::BOOL) => {
                Some(self.types.vector(TypeId::BOOL, width))
            }
            _ => None,
        }
    }

    fn arithmetic_result(
        &mut self,
        op: BinaryOp,
        lhs: TypeId,
        rhs: TypeId,
        ls: Shape,
        rs: Shape,
    ) -> Option<TypeId> {
        let mul = op == BinaryOp::Mul;
        let numeric = |t: TypeId| t != TypeId::BOOL;
        match (ls, rs) {
            (Shape::Scalar(a), Shape::Scalar(b)) if a == b && numeric(a) => Some(lhs),
            (Shape::Vector(a, n), Shape::Vector(b, m)) if a == b && n == m && numeric(a) => Some(lhs),
            (Shape::Vector(a, _), Shape::Scalar(b)) if a == b && numeric(a) => Some(lhs),
            (Shape::Scalar(a), Shape::Vector(b, _)) if a == b && numeric(a) => Some(rhs),
            (Shape::Matrix(..), Shape::Matrix(..)) if matches!(op, BinaryOp::Add | BinaryOp::Sub) && ls == rs => {
                Some(lhs)
            }
            (Shape::Matrix(..), Shape::Scalar(TypeId::F32)) if mul => Some(lhs),
            (Shape::Scalar(TypeId::F32), Shape::Matrix(..)) if mul => Some(rhs),
            (Shape::Matrix(columns, rows), Shape::Vector(TypeId::F32, n)) if mul && n == columns => {
                Some(self.types.vector(TypeId::F32, rows))
            }
            (Shape::Vector(TypeId::F32, n), Shape::Matrix(columns, rows)) if mul && n == rows => {
                Some(self.types.vector(TypeId::F32, columns))
            }
            (Shape::Matrix(inner, rows), Shape::Matrix(columns, inner2)) if mul && inner == inner2 => {
                Some(self.types.matrix(columns, rows, TypeId::F32))
            }
            _ => None,
        }
    }

    // === Calls ===

    fn resolve_call(
        &mut self,
        id: ExprId,
        callee: Symbol,
        args: ExprRange,
        allow_void: bool,
        span: Span,
    ) -> TypeId {
        let ast = self.ast;
        let arg_types = self.resolve_args(args);
        let name = self.name(callee);

        let result = if let Some(&decl) = self.module_scope.get(&callee) {
            let DeclKind::Function(func) = ast.decl(decl).kind else {
                self.error(ErrorCode::E1006, span, format!("`{name}` is not a function"));
                return TypeId::NONE;
            };
            self.sem.set_call(id, CallTarget::Function(decl));
            if self.current_fn.is_some_and(|f| f.decl == decl) {
                self.error(ErrorCode::E1006, span, format!("function `{name}` cannot call itself"));
            }
            let is_entry = ast
                .find_attr(func.attrs, |kind| matches!(kind, AttrKind::Stage(_)).then_some(()))
                .is_some();
            if is_entry {
                self.error(ErrorCode::E1006, span, format!("entry point `{name}` cannot be called"));
            }
            let params = ast.var_list(func.params);
            if params.len() == arg_types.len() {
                for (idx, (&param, &found)) in params.iter().zip(&arg_types).enumerate() {
                    let expected = ast.var(param).ty.unwrap_or(TypeId::NONE);
                    if !self.same_type(expected, found) {
                        let (expected, found) = (self.type_name(expected), self.type_name(found));
                        self.error(
                            ErrorCode::E1006,
                            ast.expr(ast.expr_list(args)[idx]).span,
                            format!("argument {} of `{name}` expects `{expected}`, found `{found}`", idx + 1),
                        );
                    }
                }
            } else {
                self.error(
                    ErrorCode::E1006,
                    span,
                    format!(
                        "`{name}` expects {} argument(s), found {}",
                        params.len(),
                        arg_types.len()
                    ),
                );
            }
            func.return_type
        } else if let Some(builtin) = BuiltinFn::from_name(name) {
            self.sem.set_call(id, CallTarget::Builtin(builtin));
            if builtin.is_derivative() && self.non_uniform_depth > 0 {
                self.report_rule(
                    DiagnosticRule::DerivativeUniformity,
                    ErrorCode::E1018,
                    span,
                    format!("`{name}` must only be called from uniform control flow"),
                );
            }
            if arg_types.iter().any(|t| t.is_none()) {
                return TypeId::NONE;
            }
            match builtin.check(self.types, self.symbols, &arg_types) {
                Ok(ty) => Some(ty),
                Err(reason) => {
                    self.error(ErrorCode::E1006, span, format!("invalid call to `{name}`: {reason}"));
                    return TypeId::NONE;
                }
            }
        } else {
            self.error(ErrorCode::E1001, span, format!("unknown function `{name}`"));
            return TypeId::NONE;
        };

        match result {
            Some(ty) => ty,
            None => {
                if !allow_void {
                    self.error(
                        ErrorCode::E1006,
                        span,
                        format!("function `{name}` does not return a value"),
                    );
                }
                TypeId::NONE
            }
        }
    }

    fn resolve_constructor(&mut self, ty: TypeId, args: ExprRange, span: Span) -> TypeId {
        let arg_types = self.resolve_args(args);
        if !self.types.flags(ty).is_constructible() {
            let name = self.type_name(ty);
            self.error(ErrorCode::E1006, span, format!("cannot construct a value of type `{name}`"));
            return ty;
        }
        // Zero-argument constructors produce the zero value.
        if arg_types.is_empty() || arg_types.iter().any(|t| t.is_none()) {
            return ty;
        }
        let shapes: SmallVec<[Shape; 4]> = arg_types.iter().map(|&t| Shape::of(self.types, t)).collect();
        let base = self.types.unwrap_all(ty);
        let valid = match self.types.data(base) {
            TypeData::Bool | TypeData::I32 | TypeData::U32 | TypeData::F32 => {
                matches!(shapes.as_slice(), [Shape::Scalar(_)])
            }
            &TypeData::Vector { elem, width } => match shapes.as_slice() {
                // Splat, or a conversion from a vector of the same width.
                [Shape::Scalar(e)] => *e == elem,
                [Shape::Vector(_, n)] => *n == width,
                _ => {
                    let mut count = 0u32;
                    let all_elem = shapes.iter().all(|shape| match *shape {
                        Shape::Scalar(e) if e == elem => {
                            count += 1;
                            true
                        }
                        Shape::Vector(e, n) if e == elem => {
                            count += u32::from(n);
                            true
                        }
                        _ => false,
                    });
                    all_elem && count == u32::from(width)
                }
            },
            &TypeData::Matrix { columns, rows, .. } => {
                let by_column = shapes.len() == usize::from(columns)
                    && shapes.iter().all(|s| *s == Shape::Vector(TypeId::F32, rows));
                let by_scalar = shapes.len() == usize::from(columns) * usize::from(rows)
                    && shapes.iter().all(|s| *s == Shape::Scalar(TypeId::F32));
                by_column || by_scalar
            }
            TypeData::Struct(st) => {
                let members: SmallVec<[TypeId; 8]> = st.members.iter().map(|m| m.ty).collect();
                members.len() == arg_types.len()
                    && members.iter().zip(&arg_types).all(|(&m, &a)| self.same_type(m, a))
            }
            &TypeData::Array {
                elem,
                count: ArrayCount::Fixed(n),
                ..
            } => {
                usize::try_from(n).is_ok_and(|n| n == arg_types.len())
                    && arg_types.iter().all(|&a| self.same_type(elem, a))
            }
            _ => false,
        };
        if !valid {
            let name = self.type_name(ty);
            self.error(ErrorCode::E1006, span, format!("invalid arguments to construct `{name}`"));
        }
        ty
    }

    // === Access ===

    fn resolve_member(&mut self, id: ExprId, object: ExprId, member: Symbol, span: Span) -> TypeId {
        let ty = self.resolve_value(object);
        if ty.is_none() {
            return TypeId::NONE;
        }
        let name = self.name(member);
        let base = self.types.unwrap_all(ty);
        match *self.types.data(base) {
            TypeData::Struct(ref st) => {
                let found = st.member(member).map(|(idx, m)| (idx, m.ty));
                match found {
                    Some((idx, member_ty)) => {
                        let idx = u32::try_from(idx).unwrap_or(u32::MAX);
                        self.sem.set_member(id, MemberAccess::Field(idx));
                        member_ty
                    }
                    None => {
                        let ty = self.type_name(ty);
                        self.error(ErrorCode::E1010, span, format!("no member named `{name}` on `{ty}`"));
                        TypeId::NONE
                    }
                }
            }
            TypeData::Vector { elem, width } => match parse_swizzle(name, width) {
                Some(indices) => {
                    let len = indices.len();
                    self.sem.set_member(id, MemberAccess::Swizzle(indices));
                    match u8::try_from(len) {
                        Ok(1) | Err(_) => elem,
                        Ok(n) => self.types.vector(elem, n),
                    }
                }
                None => {
                    let ty = self.type_name(ty);
                    self.error(ErrorCode::E1010, span, format!("invalid swizzle `{name}` on `{ty}`"));
                    TypeId::NONE
                }
            },
            _ => {
                let ty = self.type_name(ty);
                self.error(
                    ErrorCode::E1010,
                    span,
                    format!("cannot access member `{name}` on a value of type `{ty}`"),
                );
                TypeId::NONE
            }
        }
    }

    fn resolve_index(&mut self, object: ExprId, index: ExprId, span: Span) -> TypeId {
        let ty = self.resolve_value(object);
        let index_ty = self.resolve_value(index);
        if !index_ty.is_none()
            && !matches!(Shape::of(self.types, index_ty), Shape::Scalar(TypeId::I32 | TypeId::U32))
        {
            let found = self.type_name(index_ty);
            self.error(
                ErrorCode::E1011,
                self.ast.expr(index).span,
                format!("index must be `i32` or `u32`, found `{found}`"),
            );
        }
        if ty.is_none() {
            return TypeId::NONE;
        }

        let bound = match *self.types.data(self.types.unwrap_all(ty)) {
            TypeData::Vector { width, .. } => Some(u32::from(width)),
            TypeData::Matrix { columns, .. } => Some(u32::from(columns)),
            TypeData::Array {
                count: ArrayCount::Fixed(n),
                ..
            } => Some(n),
            _ => None,
        };
        let constant = match self.ast.expr(index).kind {
            ExprKind::Literal(Literal::I32(v)) => Some(i64::from(v)),
            ExprKind::Literal(Literal::U32(v)) => Some(i64::from(v)),
            _ => None,
        };
        if let (Some(bound), Some(value)) = (bound, constant) {
            if value < 0 || value >= i64::from(bound) {
                let name = self.type_name(ty);
                self.error(
                    ErrorCode::E1011,
                    self.ast.expr(index).span,
                    format!("index {value} is out of bounds for `{name}`"),
                );
            }
        }

        match self.types.index_result(ty) {
            Some(elem) => elem,
            None => {
                let name = self.type_name(ty);
                self.error(ErrorCode::E1011, span, format!("cannot index a value of type `{name}`"));
                TypeId::NONE
            }
        }
    }

    fn resolve_bitcast(&mut self, ty: TypeId, operand: ExprId, span: Span) -> TypeId {
        let from = self.resolve_value(operand);
        if from.is_none() {
            return ty;
        }
        let numeric = |t: TypeId| t != TypeId::BOOL;
        let valid = match (Shape::of(self.types, ty), Shape::of(self.types, from)) {
            (Shape::Scalar(a), Shape::Scalar(b)) => numeric(a) && numeric(b),
            (Shape::Vector(a, n), Shape::Vector(b, m)) => n == m && numeric(a) && numeric(b),
            _ => false,
        };
        if !valid {
            let (from, to) = (self.type_name(from), self.type_name(ty));
            self.error(ErrorCode::E1005, span, format!("cannot bitcast `{from}` to `{to}`"));
        }
        ty
    }
}

/// Component indices for a swizzle, if `name` is valid for a vector of
/// `width` components. Letters come from one set, `xyzw` or `rgba`.
pub(crate) fn parse_swizzle(name: &str, width: u8) -> Option<SmallVec<[u8; 4]>> {
    if name.is_empty() || name.len() > 4 {
        return None;
    }
    ["xyzw", "rgba"].into_iter().find_map(|set| {
        let indices: Option<SmallVec<[u8; 4]>> = name
            .chars()
            .map(|c| set.find(c).and_then(|i| u8::try_from(i).ok()))
            .collect();
        indices.filter(|idx| idx.iter().all(|&i| i < width))
    })
}
