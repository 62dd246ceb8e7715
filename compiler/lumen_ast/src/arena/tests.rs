use std::panic::{catch_unwind, AssertUnwindSafe};

use lumen_diagnostic::{CollectingReporter, IceHandler};
use lumen_ir::{GenerationId, StorageClass, SymbolTable, TypeId};
use pretty_assertions::assert_eq;

use super::*;
use crate::{Literal, PipelineStage};

#[test]
fn node_ids_are_sequential_and_tagged() {
    let generation = GenerationId::next();
    let mut ast = Ast::new(generation, IceHandler::new());
    let a = ast.alloc_expr(ExprKind::Literal(Literal::I32(1)), Span::new(0, 1));
    let b = ast.alloc_expr(ExprKind::Literal(Literal::I32(2)), Span::new(2, 3));
    let s = ast.alloc_stmt(StmtKind::Break, Span::new(4, 10));

    assert_eq!(ast.expr(a).id.index(), 0);
    assert_eq!(ast.expr(b).id.index(), 1);
    assert_eq!(ast.stmt(s).id.index(), 2);
    assert_eq!(ast.node_count(), 3);
    assert!(ast.all_node_ids().all(|id| id.generation() == generation));
}

#[test]
fn lists_round_trip() {
    let mut ast = Ast::new(GenerationId::next(), IceHandler::new());
    let exprs: Vec<ExprId> = (0..3)
        .map(|i| ast.alloc_expr(ExprKind::Literal(Literal::U32(i)), Span::DUMMY))
        .collect();
    let first = ast.alloc_expr_list(&exprs[..2]);
    let second = ast.alloc_expr_list(&exprs[2..]);
    let empty = ast.alloc_expr_list(&[]);

    assert_eq!(ast.expr_list(first), &exprs[..2]);
    assert_eq!(ast.expr_list(second), &exprs[2..]);
    assert!(ast.expr_list(empty).is_empty());
}

#[test]
fn module_order_is_independent_of_allocation_order() {
    let mut symbols = SymbolTable::new(GenerationId::next());
    let a = symbols.register("a").unwrap();
    let b = symbols.register("b").unwrap();
    let mut ast = Ast::new(symbols.generation(), IceHandler::new());

    let first = ast.alloc_decl(DeclKind::Alias { name: a, ty: TypeId::F32 }, Span::DUMMY);
    let second = ast.alloc_decl(DeclKind::Alias { name: b, ty: TypeId::I32 }, Span::DUMMY);
    ast.push_module_decl(second);
    ast.push_module_decl(first);

    assert_eq!(ast.module(), &[second, first]);
    assert_eq!(ast.decl_name(first), Some(a));
}

#[test]
fn reserved_decl_is_filled_later() {
    let mut symbols = SymbolTable::new(GenerationId::next());
    let name = symbols.register("S").unwrap();
    let mut ast = Ast::new(symbols.generation(), IceHandler::new());
    let decl = ast.reserve_decl(Span::new(0, 8));
    let members = ast.alloc_member_list(&[]);
    ast.set_decl_kind(
        decl,
        DeclKind::Struct {
            name,
            members,
            ty: TypeId::from_raw(4),
        },
    );
    assert_eq!(ast.decl_name(decl), Some(name));
    assert_eq!(ast.decl(decl).span, Span::new(0, 8));
}

#[test]
fn functions_and_attributes() {
    let mut symbols = SymbolTable::new(GenerationId::next());
    let main = symbols.register("main").unwrap();
    let g = symbols.register("g").unwrap();
    let mut ast = Ast::new(symbols.generation(), IceHandler::new());

    let var = ast.alloc_var(
        g,
        VarKind::Var,
        StorageClass::Private,
        Some(TypeId::F32),
        None,
        AttrRange::EMPTY,
        Span::DUMMY,
    );
    let global = ast.alloc_decl(DeclKind::GlobalVar(var), Span::DUMMY);
    ast.push_module_decl(global);

    let stage = ast.alloc_attr(AttrKind::Stage(PipelineStage::Fragment), Span::DUMMY);
    let attrs = ast.alloc_attr_list(&[stage]);
    let func = ast.alloc_decl(
        DeclKind::Function(FunctionDecl {
            name: main,
            params: VarRange::EMPTY,
            return_type: None,
            return_attrs: AttrRange::EMPTY,
            body: StmtRange::EMPTY,
            attrs,
        }),
        Span::DUMMY,
    );
    ast.push_module_decl(func);

    let funcs: Vec<DeclId> = ast.functions().map(|(id, _)| id).collect();
    assert_eq!(funcs, [func]);
    assert_eq!(ast.decl_name(global), Some(g));

    let found = ast.find_attr(attrs, |kind| match kind {
        AttrKind::Stage(stage) => Some(*stage),
        _ => None,
    });
    assert_eq!(found, Some(PipelineStage::Fragment));
}

#[test]
fn oversized_list_is_an_internal_error() {
    let reporter = CollectingReporter::new();
    let mut ast = Ast::new(GenerationId::next(), IceHandler::with_reporter(reporter.clone()));
    let stmt = ast.alloc_stmt(StmtKind::Break, Span::DUMMY);
    let items = vec![stmt; usize::from(u16::MAX) + 1];

    let result = catch_unwind(AssertUnwindSafe(|| ast.alloc_stmt_list(&items)));
    assert!(result.is_err(), "expected an internal compiler error");
    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "AST list of 65536 nodes exceeds u16::MAX");

    let fits = ast.alloc_stmt_list(&items[..usize::from(u16::MAX)]);
    assert_eq!(ast.stmt_list(fits).len(), usize::from(u16::MAX));
}
