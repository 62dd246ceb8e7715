//! End-to-end generation through the public API.

use lumen_ast::{AttrKind, PipelineStage, VarKind};
use lumen_emit::{generate, generate_many, EmitError, GeneratorOptions, Target};
use lumen_ir::{Span, TypeId};
use lumen_program::{init_tracing, FunctionSig, Program, ProgramBuilder, Session};
use pretty_assertions::assert_eq;

fn sp(n: u32) -> Span {
    Span::new(n, n + 1)
}

fn compute(b: &mut ProgramBuilder, name: &str, x: u32, at: u32) {
    let stage = b.attr(AttrKind::Stage(PipelineStage::Compute), sp(at));
    let size = b.attr(AttrKind::WorkgroupSize(x, 1, 1), sp(at));
    let sig = FunctionSig::new().with_attr(stage).with_attr(size);
    b.function(name, &sig, &[], sp(at));
}

/// Two compute entry points, `first` and `second`.
fn two_entry_points() -> Program {
    let mut b = ProgramBuilder::new(&Session::new());
    compute(&mut b, "first", 1, 1);
    compute(&mut b, "second", 2, 2);
    b.build()
}

/// `fn f() { var float: f32 = 1.0; let sample = float; }`
fn reserved_names() -> Program {
    let mut b = ProgramBuilder::new(&Session::new());
    let one = b.lit_f32(1.0, sp(1));
    let float = b.local(VarKind::Var, "float", Some(TypeId::F32), Some(one), sp(1));
    let value = b.ident("float", sp(2));
    let sample = b.local(VarKind::Let, "sample", None, Some(value), sp(2));
    b.function("f", &FunctionSig::new(), &[float, sample], sp(0));
    b.build()
}

/// `fn f() { let x: f32; }`, which does not resolve.
fn invalid() -> Program {
    let mut b = ProgramBuilder::new(&Session::new());
    let x = b.local(VarKind::Let, "x", Some(TypeId::F32), None, sp(1));
    b.function("f", &FunctionSig::new(), &[x], sp(0));
    b.build()
}

#[test]
fn invalid_programs_are_refused() {
    init_tracing();
    let program = invalid();
    assert!(!program.is_valid());

    let err = generate(&program, &GeneratorOptions::new(Target::Hlsl)).unwrap_err();
    assert!(matches!(
        err,
        EmitError::InvalidProgram {
            target: Target::Hlsl,
            errors: 1
        }
    ));
    assert_eq!(err.to_string(), "cannot generate HLSL from a program with 1 error(s)");
}

#[test]
fn unknown_entry_point() {
    let program = two_entry_points();
    let options = GeneratorOptions::new(Target::Wgsl).with_entry_point("third");
    let err = generate(&program, &options).unwrap_err();
    assert_eq!(err.to_string(), "entry point `third` not found");
}

#[test]
fn entry_point_filter_leaves_out_other_entry_points() {
    let program = two_entry_points();

    let options = GeneratorOptions::new(Target::Glsl).with_entry_point("second");
    let output = generate(&program, &options).unwrap();
    assert_eq!(
        output.text,
        "\
#version 450

layout(local_size_x = 2, local_size_y = 1, local_size_z = 1) in;

void main() {
}
"
    );
    assert!(output.diagnostics.is_empty());

    let options = GeneratorOptions::new(Target::Wgsl).with_entry_point("first");
    let output = generate(&program, &options).unwrap();
    assert_eq!(output.text, "@compute @workgroup_size(1, 1, 1)\nfn first() {\n}\n");
}

#[test]
fn reserved_identifiers_are_renamed_per_target() {
    let program = reserved_names();

    let hlsl = generate(&program, &GeneratorOptions::new(Target::Hlsl)).unwrap();
    assert_eq!(
        hlsl.text,
        "\
void f() {
  float float_ = 1.0f;
  const float sample_ = float_;
}
"
    );

    let glsl = generate(&program, &GeneratorOptions::new(Target::Glsl)).unwrap();
    assert_eq!(
        glsl.text,
        "\
#version 450

void f() {
  float float_ = 1.0;
  float sample = float_;
}
"
    );

    // The input program keeps its names.
    let wgsl = generate(&program, &GeneratorOptions::new(Target::Wgsl)).unwrap();
    assert_eq!(
        wgsl.text,
        "\
fn f() {
  var float: f32 = 1.0f;
  let sample = float;
}
"
    );
}

#[test]
fn emission_errors_keep_the_partial_text() {
    let program = two_entry_points();
    let err = generate(&program, &GeneratorOptions::new(Target::Glsl)).unwrap_err();
    assert_eq!(err.to_string(), "GLSL generation failed with 1 error(s)");
    let EmitError::Emission {
        target,
        errors,
        partial,
        diagnostics,
    } = err
    else {
        panic!("expected an emission error");
    };
    assert_eq!(target, Target::Glsl);
    assert_eq!(errors, 1);
    assert_eq!(diagnostics.error_count(), 1);
    assert!(partial.starts_with("#version 450\n"));
    assert_eq!(partial.matches("void main() {").count(), 2);
}

#[test]
fn many_programs_keep_their_order() {
    let programs = vec![reserved_names(), invalid(), two_entry_points()];
    let options = GeneratorOptions::new(Target::Hlsl);
    let results = generate_many(&programs, &options);
    assert_eq!(results.len(), 3);

    let single = generate(&programs[0], &options).unwrap();
    assert_eq!(results[0].as_ref().unwrap().text, single.text);
    assert!(matches!(results[1], Err(EmitError::InvalidProgram { .. })));
    let text = &results[2].as_ref().unwrap().text;
    assert!(text.contains("[numthreads(1, 1, 1)]\nvoid first() {\n}\n"));
    assert!(text.contains("[numthreads(2, 1, 1)]\nvoid second() {\n}\n"));
}
