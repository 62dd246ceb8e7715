use lumen_ast::{AttrKind, BinaryOp, Builtin, PipelineStage, UnaryOp, VarKind};
use lumen_ir::{Access, SamplerKind, StorageClass, TypeId};
use lumen_program::{FunctionSig, ProgramBuilder};
use lumen_types::ArrayCount;
use pretty_assertions::assert_eq;

use crate::test_helpers::{build, builder, compute_fn, emit, emit_failure, messages, plain_fn, sp};
use crate::Target;

fn resource(b: &mut ProgramBuilder, group: u32, binding: u32) -> [lumen_ast::AttrId; 2] {
    [
        b.attr(AttrKind::Group(group), sp(0)),
        b.attr(AttrKind::Binding(binding), sp(0)),
    ]
}

#[test]
fn fragment_entry_point_becomes_main() {
    let mut b = builder();
    let vec2 = b.types_mut().vector(TypeId::F32, 2);
    let vec3 = b.types_mut().vector(TypeId::F32, 3);
    let vec4 = b.types_mut().vector(TypeId::F32, 4);
    let color = b.struct_member("color", vec3, &[], sp(1));
    let power = b.struct_member("power", TypeId::F32, &[], sp(1));
    let (_, light_ty) = b.struct_decl("Light", &[color, power], sp(1));
    let attrs = resource(&mut b, 0, 1);
    b.global_var("light", StorageClass::Uniform, light_ty, None, &attrs, sp(2));

    let loc = b.attr(AttrKind::Location(0), sp(3));
    let uv = b.param("uv", vec2, &[loc], sp(3));
    let position = b.attr(AttrKind::Builtin(Builtin::Position), sp(3));
    let coord = b.param("coord", vec4, &[position], sp(3));

    let uv_ref = b.ident("uv", sp(4));
    let u = b.member_expr(uv_ref, "x", sp(4));
    let slope = b.call("dpdx", &[u], sp(4));
    let d = b.local(VarKind::Let, "d", None, Some(slope), sp(4));

    let light = b.ident("light", sp(5));
    let rgb = b.member_expr(light, "color", sp(5));
    let light = b.ident("light", sp(5));
    let power = b.member_expr(light, "power", sp(5));
    let d_ref = b.ident("d", sp(5));
    let alpha = b.binary(BinaryOp::Mul, power, d_ref, sp(5));
    let value = b.construct(vec4, &[rgb, alpha], sp(5));
    let ret = b.ret(Some(value), sp(5));

    let stage = b.attr(AttrKind::Stage(PipelineStage::Fragment), sp(3));
    let target = b.attr(AttrKind::Location(0), sp(3));
    let sig = FunctionSig::new()
        .with_attr(stage)
        .with_param(uv)
        .with_param(coord)
        .with_return_type(vec4)
        .with_return_attr(target);
    b.function("frag", &sig, &[d, ret], sp(3));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Glsl),
        "\
#version 450

struct Light {
  vec3 color;
  float power;
};

layout(std140, set = 0, binding = 1) uniform light_block {
  Light light;
};

layout(location = 0) in vec2 uv;
layout(location = 0) out vec4 frag_out;

void main() {
  vec4 coord = gl_FragCoord;
  float d = dFdx(uv.x);
  frag_out = vec4(light.color, light.power * d);
  return;
}
"
    );
}

#[test]
fn compute_entry_point_with_storage_buffer() {
    let mut b = builder();
    let floats = b.types_mut().array(TypeId::F32, ArrayCount::Runtime, None);
    let rw = b.types_mut().access_control(Access::ReadWrite, floats);
    let attrs = resource(&mut b, 0, 0);
    b.global_var("values", StorageClass::Storage, rw, None, &attrs, sp(1));
    let tile_ty = b.types_mut().array(TypeId::F32, ArrayCount::Fixed(64), None);
    b.global_var("tile", StorageClass::Workgroup, tile_ty, None, &[], sp(2));

    let index_attr = b.attr(AttrKind::Builtin(Builtin::LocalInvocationIndex), sp(3));
    let index = b.param("index", TypeId::U32, &[index_attr], sp(3));
    let values = b.ident("values", sp(4));
    let address = b.unary(UnaryOp::AddressOf, values, sp(4));
    let length = b.call("arrayLength", &[address], sp(4));
    let n = b.local(VarKind::Let, "n", None, Some(length), sp(4));

    let i = b.ident("index", sp(5));
    let n_ref = b.ident("n", sp(5));
    let in_bounds = b.binary(BinaryOp::Lt, i, n_ref, sp(5));
    let values = b.ident("values", sp(6));
    let i = b.ident("index", sp(6));
    let lhs = b.index(values, i, sp(6));
    let tile = b.ident("tile", sp(6));
    let i = b.ident("index", sp(6));
    let rhs = b.index(tile, i, sp(6));
    let copy = b.assign(lhs, rhs, sp(6));
    let guard = b.if_stmt(in_bounds, &[copy], None, sp(5));

    let stage = b.attr(AttrKind::Stage(PipelineStage::Compute), sp(3));
    let size = b.attr(AttrKind::WorkgroupSize(64, 1, 1), sp(3));
    let sig = FunctionSig::new().with_attr(stage).with_attr(size).with_param(index);
    b.function("main", &sig, &[n, guard], sp(3));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Glsl),
        "\
#version 450

layout(std430, set = 0, binding = 0) buffer values_block {
  float values[];
};

shared float tile[64];

layout(local_size_x = 64, local_size_y = 1, local_size_z = 1) in;

void main() {
  uint index = gl_LocalInvocationIndex;
  uint n = uint(values.length());
  if (index < n) {
    values[index] = tile[index];
  }
}
"
    );
}

#[test]
fn vertex_position_output() {
    let mut b = builder();
    let vec4 = b.types_mut().vector(TypeId::F32, 4);
    let vi_attr = b.attr(AttrKind::Builtin(Builtin::VertexIndex), sp(1));
    let vi = b.param("vi", TypeId::U32, &[vi_attr], sp(1));
    let vi_ref = b.ident("vi", sp(2));
    let x = b.construct(TypeId::F32, &[vi_ref], sp(2));
    let zero = b.lit_f32(0.0, sp(2));
    let zero2 = b.lit_f32(0.0, sp(2));
    let one = b.lit_f32(1.0, sp(2));
    let clip = b.construct(vec4, &[x, zero, zero2, one], sp(2));
    let ret = b.ret(Some(clip), sp(2));
    let stage = b.attr(AttrKind::Stage(PipelineStage::Vertex), sp(1));
    let position = b.attr(AttrKind::Builtin(Builtin::Position), sp(1));
    let sig = FunctionSig::new()
        .with_attr(stage)
        .with_param(vi)
        .with_return_type(vec4)
        .with_return_attr(position);
    b.function("vs", &sig, &[ret], sp(1));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Glsl),
        "\
#version 450

void main() {
  uint vi = uint(gl_VertexIndex);
  gl_Position = vec4(float(vi), 0.0, 0.0, 1.0);
  return;
}
"
    );
}

#[test]
fn builtin_functions_and_bitcasts() {
    let mut b = builder();
    let bvec2 = b.types_mut().vector(TypeId::BOOL, 2);
    let x_param = b.param("x", TypeId::F32, &[], sp(1));
    let flags_param = b.param("flags", bvec2, &[], sp(1));

    let x = b.ident("x", sp(2));
    let one = b.lit_f32(1.0, sp(2));
    let flags = b.ident("flags", sp(2));
    let every = b.call("all", &[flags], sp(2));
    let chosen = b.call("select", &[x, one, every], sp(2));
    let y = b.local(VarKind::Let, "y", None, Some(chosen), sp(2));

    let x = b.ident("x", sp(3));
    let half = b.lit_f32(0.5, sp(3));
    let above = b.binary(BinaryOp::Gt, x, half, sp(3));
    let some = b.call("any", &[above], sp(3));
    let w = b.local(VarKind::Let, "w", None, Some(some), sp(3));

    let y_ref = b.ident("y", sp(4));
    let cast = b.bitcast(TypeId::U32, y_ref, sp(4));
    let bits = b.local(VarKind::Let, "bits", None, Some(cast), sp(4));
    let z = b.local(VarKind::Var, "z", Some(TypeId::F32), None, sp(5));
    let y_ref = b.ident("y", sp(6));
    let ret = b.ret(Some(y_ref), sp(6));

    let sig = FunctionSig::new()
        .with_param(x_param)
        .with_param(flags_param)
        .with_return_type(TypeId::F32);
    b.function("f", &sig, &[y, w, bits, z, ret], sp(0));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Glsl),
        "\
#version 450

float f(float x, bvec2 flags) {
  float y = mix(x, 1.0, all(flags));
  bool w = (x > 0.5);
  uint bits = floatBitsToUint(y);
  float z = float(0);
  return y;
}
"
    );
}

#[test]
fn switch_cases_end_in_break() {
    let mut b = builder();
    let zero = b.lit_u32(0, sp(1));
    let decl = b.local(VarKind::Var, "x", Some(TypeId::U32), Some(zero), sp(1));
    let one = b.lit_u32(1, sp(2));
    let first = b.selector(Some(one), sp(2));
    let lhs = b.ident("x", sp(3));
    let two = b.lit_u32(2, sp(3));
    let set = b.assign(lhs, two, sp(3));
    let numbered = b.case(&[first], &[set], sp(2));
    let default = b.selector(None, sp(4));
    let fallback = b.case(&[default], &[], sp(4));
    let cond = b.ident("x", sp(5));
    let switch = b.switch(cond, &[numbered, fallback], sp(5));
    plain_fn(&mut b, &[decl, switch]);
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Glsl),
        "\
#version 450

void f() {
  uint x = 0u;
  switch (x) {
    case 1u: {
      x = 2u;
      break;
    }
    default: {
      break;
    }
  }
}
"
    );
}

#[test]
fn samplers_and_pointers_are_rejected() {
    let mut b = builder();
    let samp_ty = b.types_mut().sampler(SamplerKind::Sampler);
    let attrs = resource(&mut b, 0, 1);
    b.global_var("samp", StorageClass::Handle, samp_ty, None, &attrs, sp(1));
    let ptr = b.types_mut().pointer(TypeId::F32, StorageClass::Function);
    let p = b.param("p", ptr, &[], sp(2));
    b.function("g", &FunctionSig::new().with_param(p), &[], sp(2));
    let program = build(b);

    let (partial, diagnostics) = emit_failure(&program, Target::Glsl);
    assert_eq!(partial, "#version 450\n");
    assert_eq!(
        messages(&diagnostics),
        vec![
            "separate sampler object is not supported by GLSL",
            "pointer parameter `p` is not supported by GLSL",
        ]
    );
    assert_eq!(diagnostics.as_slice()[0].span, sp(1));
}

#[test]
fn one_entry_point_per_module() {
    let mut b = builder();
    compute_fn(&mut b, "first", [1, 1, 1], &[]);
    let stage = b.attr(AttrKind::Stage(PipelineStage::Compute), sp(7));
    let size = b.attr(AttrKind::WorkgroupSize(2, 1, 1), sp(7));
    let sig = FunctionSig::new().with_attr(stage).with_attr(size);
    b.function("second", &sig, &[], sp(7));
    let program = build(b);

    let (partial, diagnostics) = emit_failure(&program, Target::Glsl);
    assert_eq!(
        messages(&diagnostics),
        vec!["more than one entry point in a module is not supported by GLSL"]
    );
    assert_eq!(diagnostics.as_slice()[0].span, sp(7));
    assert!(partial.starts_with("#version 450\n"));
}

#[test]
fn aliased_arrays_keep_their_dimensions() {
    let mut b = builder();
    let cells = b.types_mut().array(TypeId::F32, ArrayCount::Fixed(8), None);
    let (_, tile) = b.alias("Tile", cells, sp(1));
    b.global_var("grid", StorageClass::Private, tile, None, &[], sp(2));
    let uints = b.types_mut().array(TypeId::U32, ArrayCount::Runtime, None);
    let (_, list) = b.alias("List", uints, sp(3));
    let read = b.types_mut().access_control(Access::Read, list);
    let attrs = resource(&mut b, 0, 2);
    b.global_var("ids", StorageClass::Storage, read, None, &attrs, sp(4));
    let program = build(b);

    assert_eq!(
        emit(&program, Target::Glsl),
        "\
#version 450

float grid[8];

layout(std430, set = 0, binding = 2) readonly buffer ids_block {
  uint ids[];
};
"
    );
}
