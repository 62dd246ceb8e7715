//! Uniformity of values and control flow.
//!
//! Derivatives are only defined when every invocation in a quad takes the
//! same path. A branch on a non-uniform value makes everything inside it
//! non-uniform control flow.
//!
//! The analysis is local to one function: parameters and mutable locals are
//! assumed non-uniform, literals and uniform-buffer reads are uniform, and
//! `let`/`const` bindings inherit the uniformity of their initializer.

use lumen_ast::{ExprId, ExprKind, VarId, VarKind};
use lumen_ir::StorageClass;

use super::Resolver;
use crate::CallTarget;

impl Resolver<'_> {
    /// Run `f` with control flow marked non-uniform unless `uniform`.
    pub(super) fn with_uniformity(&mut self, uniform: bool, f: impl FnOnce(&mut Self)) {
        if !uniform {
            self.non_uniform_depth += 1;
        }
        f(self);
        if !uniform {
            self.non_uniform_depth -= 1;
        }
    }

    /// Whether `expr` has the same value in every invocation.
    ///
    /// Must be called after `expr` is resolved.
    pub(super) fn is_uniform(&self, expr: ExprId) -> bool {
        let ast = self.ast;
        let all = |list: &[ExprId]| list.iter().all(|&e| self.is_uniform(e));
        match ast.expr(expr).kind {
            ExprKind::Literal(_) => true,
            ExprKind::Ident(_) => self
                .sem
                .resolved_var(expr)
                .is_none_or(|var| self.var_is_uniform(var)),
            ExprKind::Unary { operand, .. } | ExprKind::Bitcast { operand, .. } => self.is_uniform(operand),
            ExprKind::Binary { lhs, rhs, .. } => self.is_uniform(lhs) && self.is_uniform(rhs),
            ExprKind::Call { args, .. } => match self.sem.call_target(expr) {
                Some(CallTarget::Builtin(builtin)) => {
                    !builtin.is_derivative() && all(ast.expr_list(args))
                }
                // User functions may read anything.
                Some(CallTarget::Function(_)) | None => false,
            },
            ExprKind::TypeConstructor { args, .. } => all(ast.expr_list(args)),
            ExprKind::Member { object, .. } => self.is_uniform(object),
            ExprKind::Index { object, index } => self.is_uniform(object) && self.is_uniform(index),
        }
    }

    fn var_is_uniform(&self, var: VarId) -> bool {
        if let Some(&uniform) = self.uniform_vars.get(&var) {
            return uniform;
        }
        let v = self.ast.var(var);
        match v.kind {
            VarKind::Const => true,
            VarKind::Var => match v.storage {
                StorageClass::Uniform | StorageClass::Handle => true,
                StorageClass::Storage => !self.storage_writable(v),
                _ => false,
            },
            VarKind::Let | VarKind::Param => false,
        }
    }
}
