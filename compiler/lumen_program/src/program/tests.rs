use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use lumen_ast::{AttrKind, PipelineStage, VarKind};
use lumen_diagnostic::{CollectingReporter, Diagnostic, ErrorCode};
use lumen_ir::{Source, TypeId};
use pretty_assertions::assert_eq;

use crate::test_helpers::{builder, fragment_fn, plain_fn, sp};
use crate::{FunctionSig, Program, ProgramBuilder, Session};

const fn assert_send_sync<T: Send + Sync>() {}
const _: () = assert_send_sync::<Program>();

fn valid_program() -> Program {
    let mut b = builder();
    let one = b.lit_f32(1.0, sp(1));
    let decl = b.local(VarKind::Var, "x", Some(TypeId::F32), Some(one), sp(1));
    plain_fn(&mut b, &[decl]);
    fragment_fn(&mut b, &[]);
    b.build()
}

#[test]
fn validity_is_monotonic() {
    let mut program = valid_program();
    assert!(program.is_valid());

    program.push_diagnostic(Diagnostic::warning(ErrorCode::E1011).with_message("just a warning"));
    assert!(program.is_valid());

    program.push_diagnostic(Diagnostic::error(ErrorCode::E1001).with_message("late error"));
    assert!(!program.is_valid());

    program.push_diagnostic(Diagnostic::warning(ErrorCode::E1011).with_message("another warning"));
    assert!(!program.is_valid());
}

#[test]
fn names_and_functions_are_found() {
    let program = valid_program();
    let (decl, func) = program.find_function("frag").expect("frag is declared");
    assert_eq!(program.name(func.name), "frag");
    assert_eq!(program.ast().module()[1], decl);
    assert!(program.find_function("missing").is_none());
    // `x` is a local, not a function.
    assert!(program.find_function("x").is_none());
}

#[test]
fn entry_points_are_exposed() {
    let program = valid_program();
    let entries = program.entry_points();
    assert_eq!(entries.len(), 1);
    assert_eq!(program.name(entries[0].name), "frag");
    assert_eq!(entries[0].stage, PipelineStage::Fragment);
}

#[test]
fn foreign_symbol_is_an_internal_error() {
    let reporter = CollectingReporter::new();
    let session = Session::new().with_ice_reporter(reporter.clone());
    let program = ProgramBuilder::new(&session).build();

    let mut other = builder();
    let foreign = other.sym("elsewhere");

    let result = catch_unwind(AssertUnwindSafe(|| program.name(foreign).to_owned()));
    assert!(result.is_err());
    assert_eq!(reporter.len(), 1);
    assert!(reporter.messages()[0].contains("used with program of generation"));
}

#[test]
fn render_without_source_has_no_location() {
    let mut b = builder();
    let y = b.ident("y", sp(4));
    let decl = b.local(VarKind::Let, "x", None, Some(y), sp(1));
    plain_fn(&mut b, &[decl]);
    let program = b.build();

    assert_eq!(program.render_diagnostics(), "error[E1001]: unknown identifier `y`\n");
}

#[test]
fn render_with_source_locates_each_diagnostic() {
    let text = "fn f() {\n  let x = y;\n}\n";
    let source = Arc::new(Source::new("shader.wgsl", text));
    let mut b = builder().with_source(source);
    // `y` is at line 2, column 11.
    let y = b.ident("y", sp(19));
    let decl = b.local(VarKind::Let, "x", None, Some(y), sp(11));
    plain_fn(&mut b, &[decl]);
    let program = b.build();

    assert_eq!(
        program.render_diagnostics(),
        "shader.wgsl:2:11 error[E1001]: unknown identifier `y`\n"
    );
}

#[test]
fn duplicate_gets_a_new_generation_and_the_same_shape() {
    let program = valid_program();
    let copy = program.duplicate();

    assert_ne!(copy.generation(), program.generation());
    assert!(copy.is_valid());
    assert_eq!(copy.ast().node_count(), program.ast().node_count());
    assert_eq!(copy.ast().module().len(), program.ast().module().len());
    assert_eq!(copy.entry_points().len(), 1);
    assert_eq!(copy.name(copy.entry_points()[0].name), "frag");
    assert!(copy.find_function("f").is_some());
}

#[test]
fn duplicate_keeps_the_source() {
    let source = Arc::new(Source::new("a.wgsl", ""));
    let program = builder().with_source(Arc::clone(&source)).build();
    let copy = program.duplicate();
    assert!(copy.source().is_some_and(|s| Arc::ptr_eq(s, &source)));
}

#[test]
fn duplicate_resolves_again() {
    let mut program = valid_program();
    program.push_diagnostic(Diagnostic::error(ErrorCode::E1001).with_message("late error"));
    assert!(!program.is_valid());
    // Only resolver diagnostics are reproduced.
    assert!(program.duplicate().is_valid());
}

#[test]
fn debug_is_compact() {
    let mut b = builder();
    let stage = b.attr(AttrKind::Stage(PipelineStage::Vertex), sp(0));
    let pos = b.attr(AttrKind::Builtin(lumen_ast::Builtin::Position), sp(0));
    let vec4 = b.types_mut().vector(TypeId::F32, 4);
    let zero = b.lit_f32(0.0, sp(1));
    let value = b.construct(vec4, &[zero], sp(1));
    let ret = b.ret(Some(value), sp(1));
    b.function(
        "vs",
        &FunctionSig::new().with_attr(stage).with_return_type(vec4).with_return_attr(pos),
        &[ret],
        sp(0),
    );
    let program = b.build();
    assert!(program.is_valid(), "{}", program.render_diagnostics());

    let debug = format!("{program:?}");
    assert!(debug.starts_with("Program {"));
    assert!(debug.contains("decls: 1"));
    assert!(debug.ends_with(".. }"));
}
