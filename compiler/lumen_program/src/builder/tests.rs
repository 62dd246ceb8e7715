use std::sync::Arc;

use lumen_ast::{DeclKind, StmtKind, VarKind};
use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::{Source, StorageClass, TypeId};
use pretty_assertions::assert_eq;

use crate::test_helpers::{builder, plain_fn, sp};

#[test]
fn every_builder_gets_a_fresh_generation() {
    let a = builder();
    let b = builder();
    assert_ne!(a.generation(), b.generation());
    assert_eq!(a.symbols().generation(), a.generation());
    assert_eq!(a.ast().generation(), a.generation());
}

#[test]
fn interned_names_are_shared_and_unique_names_are_fresh() {
    let mut b = builder();
    let x = b.sym("x");
    assert_eq!(b.sym("x"), x);
    let fresh = b.unique_sym("x");
    assert_ne!(fresh, x);
    assert_eq!(b.symbols().name_for(fresh), Some("x_1"));
    let free = b.unique_sym("y");
    assert_eq!(b.symbols().name_for(free), Some("y"));
}

#[test]
fn struct_type_is_keyed_by_its_declaration() {
    let mut b = builder();
    let x = b.struct_member("x", TypeId::F32, &[], sp(1));
    let y = b.struct_member("y", TypeId::U32, &[], sp(2));
    let (decl, ty) = b.struct_decl("Pair", &[x, y], sp(0));

    assert_eq!(b.types().struct_for_decl(decl), Some(ty));
    assert_eq!(b.ast().module(), &[decl]);
    let DeclKind::Struct { members, .. } = b.ast().decl(decl).kind else {
        panic!("expected a struct declaration");
    };
    assert_eq!(b.ast().member_list(members), &[x, y]);
    assert_eq!(b.types().friendly_name(ty, b.symbols()), "Pair");
}

#[test]
fn alias_declares_a_named_type() {
    let mut b = builder();
    let (decl, ty) = b.alias("Scalar", TypeId::F32, sp(0));
    assert_eq!(b.types().unwrap_alias(ty), TypeId::F32);
    assert_eq!(b.ast().decl_name(decl), b.symbols().get("Scalar"));
}

#[test]
fn locals_pick_storage_from_their_kind() {
    let mut b = builder();
    let one = b.lit_i32(1, sp(1));
    let var = b.local(VarKind::Var, "v", Some(TypeId::I32), None, sp(1));
    let let_ = b.local(VarKind::Let, "l", None, Some(one), sp(2));

    let storage = |stmt| match b.ast().stmt(stmt).kind {
        StmtKind::VarDecl(var) => b.ast().var(var).storage,
        other => panic!("expected a declaration, got {other:?}"),
    };
    assert_eq!(storage(var), StorageClass::Function);
    assert_eq!(storage(let_), StorageClass::None);
}

#[test]
fn module_order_follows_declaration_order() {
    let mut b = builder();
    let f = plain_fn(&mut b, &[]);
    let init = b.lit_f32(1.0, sp(1));
    let c = b.global_const("k", None, init, sp(1));
    let (s, _) = {
        let m = b.struct_member("a", TypeId::I32, &[], sp(2));
        b.struct_decl("S", &[m], sp(2))
    };
    assert_eq!(b.ast().module(), &[f, c, s]);
}

#[test]
fn pushed_diagnostics_survive_build() {
    let mut b = builder();
    b.push_diagnostic(
        Diagnostic::error(ErrorCode::E1001)
            .with_message("reported by the parser")
            .with_span(sp(3)),
    );
    let program = b.build();
    assert!(!program.is_valid());
    assert_eq!(program.diagnostics().len(), 1);
}

#[test]
fn source_is_attached() {
    let source = Arc::new(Source::new("shader.wgsl", "fn f() {}"));
    let b = builder().with_source(Arc::clone(&source));
    let program = b.build();
    assert_eq!(program.source().map(|s| s.name()), Some("shader.wgsl"));
    assert!(program.is_valid());
}
