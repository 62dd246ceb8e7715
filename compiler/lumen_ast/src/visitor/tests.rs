use lumen_diagnostic::IceHandler;
use lumen_ir::{GenerationId, Span, StorageClass, Symbol, SymbolTable, TypeId};

use super::*;
use crate::{AttrRange, FunctionDecl, Literal, VarKind, VarRange};

#[derive(Default)]
struct Collect {
    idents: Vec<Symbol>,
    stmts: usize,
    vars: usize,
}

impl<'ast> Visitor<'ast> for Collect {
    fn visit_expr(&mut self, ast: &'ast Ast, id: ExprId) {
        if let ExprKind::Ident(sym) = ast.expr(id).kind {
            self.idents.push(sym);
        }
        walk_expr(self, ast, id);
    }

    fn visit_stmt(&mut self, ast: &'ast Ast, id: StmtId) {
        self.stmts += 1;
        walk_stmt(self, ast, id);
    }

    fn visit_var(&mut self, ast: &'ast Ast, id: VarId) {
        self.vars += 1;
        walk_var(self, ast, id);
    }
}

#[test]
fn walks_in_source_order() {
    let mut symbols = SymbolTable::new(GenerationId::next());
    let main = symbols.register("main").unwrap();
    let a = symbols.register("a").unwrap();
    let b = symbols.register("b").unwrap();
    let mut ast = Ast::new(symbols.generation(), IceHandler::new());

    let one = ast.alloc_expr(ExprKind::Literal(Literal::I32(1)), Span::DUMMY);
    let var_a = ast.alloc_var(
        a,
        VarKind::Var,
        StorageClass::Function,
        Some(TypeId::I32),
        Some(one),
        AttrRange::EMPTY,
        Span::DUMMY,
    );
    let decl_a = ast.alloc_stmt(StmtKind::VarDecl(var_a), Span::DUMMY);

    let lhs = ast.alloc_expr(ExprKind::Ident(a), Span::DUMMY);
    let rhs = ast.alloc_expr(ExprKind::Ident(b), Span::DUMMY);
    let assign = ast.alloc_stmt(StmtKind::Assign { lhs, rhs }, Span::DUMMY);
    let inner = ast.alloc_stmt_list(&[assign]);
    let loop_stmt = ast.alloc_stmt(
        StmtKind::Loop {
            body: inner,
            continuing: None,
        },
        Span::DUMMY,
    );
    let body = ast.alloc_stmt_list(&[decl_a, loop_stmt]);
    let func = ast.alloc_decl(
        DeclKind::Function(FunctionDecl {
            name: main,
            params: VarRange::EMPTY,
            return_type: None,
            return_attrs: AttrRange::EMPTY,
            body,
            attrs: AttrRange::EMPTY,
        }),
        Span::DUMMY,
    );
    ast.push_module_decl(func);

    let mut collect = Collect::default();
    collect.visit_module(&ast);
    assert_eq!(collect.idents, [a, b]);
    assert_eq!(collect.stmts, 3);
    assert_eq!(collect.vars, 1);
}
