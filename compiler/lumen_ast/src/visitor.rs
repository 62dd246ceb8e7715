//! AST visitor.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits children in source order. Override a `visit_*` method to act on a
//! node and call `walk_*` from it to keep descending.
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, ast: &'ast Ast, id: ExprId) {
//!         if matches!(ast.expr(id).kind, ExprKind::Call { .. }) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, ast, id);
//!     }
//! }
//! ```

use lumen_ir::DeclId;

use crate::{
    AttrRange, Ast, DeclKind, ExprId, ExprKind, MemberId, StmtId, StmtKind, StmtRange, VarId,
};

pub trait Visitor<'ast> {
    /// Visit every module declaration in order.
    fn visit_module(&mut self, ast: &'ast Ast) {
        walk_module(self, ast);
    }

    fn visit_decl(&mut self, ast: &'ast Ast, id: DeclId) {
        walk_decl(self, ast, id);
    }

    fn visit_stmt(&mut self, ast: &'ast Ast, id: StmtId) {
        walk_stmt(self, ast, id);
    }

    fn visit_expr(&mut self, ast: &'ast Ast, id: ExprId) {
        walk_expr(self, ast, id);
    }

    fn visit_var(&mut self, ast: &'ast Ast, id: VarId) {
        walk_var(self, ast, id);
    }

    fn visit_member(&mut self, _ast: &'ast Ast, _id: MemberId) {}

    fn visit_attrs(&mut self, _ast: &'ast Ast, _attrs: AttrRange) {}
}

pub fn walk_module<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast) {
    for &decl in ast.module() {
        visitor.visit_decl(ast, decl);
    }
}

pub fn walk_decl<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: DeclId) {
    match ast.decl(id).kind {
        DeclKind::Struct { members, .. } => {
            for &member in ast.member_list(members) {
                visitor.visit_member(ast, member);
            }
        }
        DeclKind::GlobalVar(var) => visitor.visit_var(ast, var),
        DeclKind::Function(func) => {
            visitor.visit_attrs(ast, func.attrs);
            for &param in ast.var_list(func.params) {
                visitor.visit_var(ast, param);
            }
            visitor.visit_attrs(ast, func.return_attrs);
            walk_block(visitor, ast, func.body);
        }
        DeclKind::Alias { .. } | DeclKind::DiagnosticDirective(_) => {}
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, body: StmtRange) {
    for &stmt in ast.stmt_list(body) {
        visitor.visit_stmt(ast, stmt);
    }
}

pub fn walk_var<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: VarId) {
    let var = ast.var(id);
    visitor.visit_attrs(ast, var.attrs);
    if let Some(init) = var.init {
        visitor.visit_expr(ast, init);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: StmtId) {
    lumen_stack::ensure_sufficient_stack(|| match ast.stmt(id).kind {
        StmtKind::Assign { lhs, rhs } => {
            visitor.visit_expr(ast, lhs);
            visitor.visit_expr(ast, rhs);
        }
        StmtKind::VarDecl(var) => visitor.visit_var(ast, var),
        StmtKind::Block(body) => walk_block(visitor, ast, body),
        StmtKind::If {
            cond,
            body,
            else_stmt,
        } => {
            visitor.visit_expr(ast, cond);
            walk_block(visitor, ast, body);
            if let Some(else_stmt) = else_stmt {
                visitor.visit_stmt(ast, else_stmt);
            }
        }
        StmtKind::Loop { body, continuing } => {
            walk_block(visitor, ast, body);
            if let Some(continuing) = continuing {
                walk_block(visitor, ast, continuing);
            }
        }
        StmtKind::Switch { cond, cases } => {
            visitor.visit_expr(ast, cond);
            for &case in ast.case_list(cases) {
                let case = ast.case(case);
                for &selector in ast.selector_list(case.selectors) {
                    if let Some(expr) = ast.selector(selector).expr {
                        visitor.visit_expr(ast, expr);
                    }
                }
                walk_block(visitor, ast, case.body);
            }
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(ast, value);
            }
        }
        StmtKind::Call(call) => visitor.visit_expr(ast, call),
        StmtKind::Break | StmtKind::Continue | StmtKind::Discard => {}
    });
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: ExprId) {
    lumen_stack::ensure_sufficient_stack(|| match ast.expr(id).kind {
        ExprKind::Literal(_) | ExprKind::Ident(_) => {}
        ExprKind::Unary { operand, .. } | ExprKind::Bitcast { operand, .. } => {
            visitor.visit_expr(ast, operand);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(ast, lhs);
            visitor.visit_expr(ast, rhs);
        }
        ExprKind::Call { args, .. } | ExprKind::TypeConstructor { args, .. } => {
            for &arg in ast.expr_list(args) {
                visitor.visit_expr(ast, arg);
            }
        }
        ExprKind::Member { object, .. } => visitor.visit_expr(ast, object),
        ExprKind::Index { object, index } => {
            visitor.visit_expr(ast, object);
            visitor.visit_expr(ast, index);
        }
    });
}

#[cfg(test)]
mod tests;
