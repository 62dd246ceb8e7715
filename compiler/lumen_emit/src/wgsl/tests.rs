use lumen_ast::{AttrKind, BinaryOp, Builtin, PipelineStage, VarKind};
use lumen_diagnostic::RuleSeverity;
use lumen_ir::{Access, StorageClass, TypeId};
use lumen_program::FunctionSig;
use lumen_types::ArrayCount;
use pretty_assertions::assert_eq;

use crate::test_helpers::{build, builder, compute_fn, emit, plain_fn, sp};
use crate::Target;

#[test]
fn struct_uniform_and_function() {
    let mut b = builder();
    let vec3 = b.types_mut().vector(TypeId::F32, 3);
    let color = b.struct_member("color", vec3, &[], sp(1));
    let power = b.struct_member("power", TypeId::F32, &[], sp(2));
    let (_, light_ty) = b.struct_decl("Light", &[color, power], sp(1));
    let group = b.attr(AttrKind::Group(0), sp(3));
    let binding = b.attr(AttrKind::Binding(1), sp(3));
    b.global_var("light", StorageClass::Uniform, light_ty, None, &[group, binding], sp(3));
    let light = b.ident("light", sp(4));
    let power = b.member_expr(light, "power", sp(4));
    let two = b.lit_f32(2.0, sp(5));
    let product = b.binary(BinaryOp::Mul, power, two, sp(4));
    let ret = b.ret(Some(product), sp(4));
    b.function("brightness", &FunctionSig::new().with_return_type(TypeId::F32), &[ret], sp(4));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Wgsl),
        "\
struct Light {
  color: vec3<f32>,
  power: f32,
}

@group(0) @binding(1) var<uniform> light: Light;

fn brightness() -> f32 {
  return light.power * 2.0f;
}
"
    );
}

#[test]
fn entry_point_attributes() {
    let mut b = builder();
    let vec2 = b.types_mut().vector(TypeId::F32, 2);
    let vec4 = b.types_mut().vector(TypeId::F32, 4);
    let loc = b.attr(AttrKind::Location(0), sp(1));
    let uv = b.param("uv", vec2, &[loc], sp(1));
    let uv_ref = b.ident("uv", sp(2));
    let zero = b.lit_f32(0.0, sp(3));
    let one = b.lit_f32(1.0, sp(4));
    let color = b.construct(vec4, &[uv_ref, zero, one], sp(2));
    let ret = b.ret(Some(color), sp(2));
    let stage = b.attr(AttrKind::Stage(PipelineStage::Fragment), sp(0));
    let out = b.attr(AttrKind::Location(0), sp(0));
    let sig = FunctionSig::new()
        .with_attr(stage)
        .with_param(uv)
        .with_return_type(vec4)
        .with_return_attr(out);
    b.function("frag", &sig, &[ret], sp(0));

    let id = b.attr(AttrKind::Builtin(Builtin::GlobalInvocationId), sp(5));
    let vec3u = b.types_mut().vector(TypeId::U32, 3);
    let gid = b.param("gid", vec3u, &[id], sp(5));
    let stage = b.attr(AttrKind::Stage(PipelineStage::Compute), sp(5));
    let size = b.attr(AttrKind::WorkgroupSize(8, 8, 1), sp(5));
    let sig = FunctionSig::new().with_attr(stage).with_attr(size).with_param(gid);
    b.function("main", &sig, &[], sp(5));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Wgsl),
        "\
@fragment
fn frag(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
  return vec4<f32>(uv, 0.0f, 1.0f);
}

@compute @workgroup_size(8, 8, 1)
fn main(@builtin(global_invocation_id) gid: vec3<u32>) {
}
"
    );
}

#[test]
fn loop_with_continuing_block() {
    let mut b = builder();
    let zero = b.lit_i32(0, sp(1));
    let decl = b.local(VarKind::Var, "i", Some(TypeId::I32), Some(zero), sp(1));
    let i = b.ident("i", sp(2));
    let four = b.lit_i32(4, sp(2));
    let done = b.binary(BinaryOp::GtEq, i, four, sp(2));
    let brk = b.break_stmt(sp(3));
    let check = b.if_stmt(done, &[brk], None, sp(2));
    let lhs = b.ident("i", sp(4));
    let i = b.ident("i", sp(4));
    let one = b.lit_i32(1, sp(4));
    let next = b.binary(BinaryOp::Add, i, one, sp(4));
    let step = b.assign(lhs, next, sp(4));
    let lp = b.loop_stmt(&[check], Some(&[step]), sp(2));
    plain_fn(&mut b, &[decl, lp]);
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Wgsl),
        "\
fn f() {
  var i: i32 = 0i;
  loop {
    if i >= 4i {
      break;
    }
    continuing {
      i = i + 1i;
    }
  }
}
"
    );
}

#[test]
fn switch_cases_and_default() {
    let mut b = builder();
    let zero = b.lit_i32(0, sp(1));
    let decl = b.local(VarKind::Var, "x", Some(TypeId::I32), Some(zero), sp(1));
    let one = b.lit_i32(1, sp(2));
    let two = b.lit_i32(2, sp(3));
    let first = b.selector(Some(one), sp(2));
    let second = b.selector(Some(two), sp(3));
    let lhs = b.ident("x", sp(4));
    let three = b.lit_i32(3, sp(4));
    let set = b.assign(lhs, three, sp(4));
    let numbered = b.case(&[first, second], &[set], sp(2));
    let default = b.selector(None, sp(5));
    let fallback = b.case(&[default], &[], sp(5));
    let cond = b.ident("x", sp(6));
    let switch = b.switch(cond, &[numbered, fallback], sp(6));
    plain_fn(&mut b, &[decl, switch]);
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Wgsl),
        "\
fn f() {
  var x: i32 = 0i;
  switch x {
    case 1i, 2i: {
      x = 3i;
    }
    default: {
    }
  }
}
"
    );
}

#[test]
fn else_if_chain_and_literals() {
    let mut b = builder();
    let half = b.lit_f32(1.5, sp(1));
    let bits = b.bitcast(TypeId::U32, half, sp(1));
    let a = b.local(VarKind::Let, "a", None, Some(bits), sp(1));
    let t = b.lit_bool(true, sp(2));
    let c = b.local(VarKind::Var, "c", Some(TypeId::BOOL), Some(t), sp(2));

    let lhs = b.ident("c", sp(3));
    let f = b.lit_bool(false, sp(3));
    let clear = b.assign(lhs, f, sp(3));
    let a_ref = b.ident("a", sp(4));
    let one = b.lit_u32(1, sp(4));
    let is_one = b.binary(BinaryOp::Eq, a_ref, one, sp(4));
    let lhs = b.ident("c", sp(5));
    let t = b.lit_bool(true, sp(5));
    let set = b.assign(lhs, t, sp(5));
    let ret = b.ret(None, sp(6));
    let last = b.block(&[ret], sp(6));
    let inner = b.if_stmt(is_one, &[set], Some(last), sp(4));
    let cond = b.ident("c", sp(3));
    let outer = b.if_stmt(cond, &[clear], Some(inner), sp(3));
    plain_fn(&mut b, &[a, c, outer]);
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Wgsl),
        "\
fn f() {
  let a = bitcast<u32>(1.5f);
  var c: bool = true;
  if c {
    c = false;
  } else if a == 1u {
    c = true;
  } else {
    return;
  }
}
"
    );
}

#[test]
fn module_scope_declarations() {
    let mut b = builder();
    b.diagnostic_directive(RuleSeverity::Off, "derivative_uniformity", sp(0));
    let (_, scale) = b.alias("Scale", TypeId::F32, sp(1));
    let two = b.lit_f32(2.0, sp(2));
    b.global_const("k", Some(scale), two, sp(2));
    let values = b.types_mut().array(TypeId::F32, ArrayCount::Runtime, None);
    let rw = b.types_mut().access_control(Access::ReadWrite, values);
    let group = b.attr(AttrKind::Group(0), sp(3));
    let binding = b.attr(AttrKind::Binding(0), sp(3));
    b.global_var("values", StorageClass::Storage, rw, None, &[group, binding], sp(3));
    b.global_var("scratch", StorageClass::Workgroup, TypeId::F32, None, &[], sp(4));
    compute_fn(&mut b, "main", [64, 1, 1], &[]);
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Wgsl),
        "\
diagnostic(off, derivative_uniformity);

alias Scale = f32;

const k: Scale = 2.0f;

@group(0) @binding(0) var<storage, read_write> values: array<f32>;

var<workgroup> scratch: f32;

@compute @workgroup_size(64, 1, 1)
fn main() {
}
"
    );
}
