use lumen_diagnostic::IceHandler;
use lumen_ir::{Access, GenerationId, SamplerKind, StorageClass, SymbolTable, TextureDimension, TypeId};
use lumen_types::{ArrayCount, Pool, TextureKind, TextureType};
use pretty_assertions::assert_eq;

use super::{BuiltinFn, Shape};

fn setup() -> (Pool, SymbolTable) {
    (Pool::new(IceHandler::new()), SymbolTable::new(GenerationId::next()))
}

#[test]
fn names_round_trip() {
    for builtin in BuiltinFn::ALL {
        assert_eq!(BuiltinFn::from_name(builtin.as_str()), Some(builtin));
    }
    assert_eq!(BuiltinFn::from_name("arrayLength"), Some(BuiltinFn::ArrayLength));
    assert_eq!(BuiltinFn::from_name("array_length"), None);
}

#[test]
fn derivatives() {
    let derivatives: Vec<_> = BuiltinFn::ALL.into_iter().filter(|b| b.is_derivative()).collect();
    assert_eq!(
        derivatives,
        vec![
            BuiltinFn::TextureSample,
            BuiltinFn::Dpdx,
            BuiltinFn::Dpdy,
            BuiltinFn::Fwidth,
        ]
    );
}

#[test]
fn numeric_builtins() {
    let (mut pool, symbols) = setup();
    let ivec2 = pool.vector(TypeId::I32, 2);
    assert_eq!(BuiltinFn::Abs.check(&mut pool, &symbols, &[ivec2]), Ok(ivec2));
    assert_eq!(BuiltinFn::Min.check(&mut pool, &symbols, &[TypeId::U32, TypeId::U32]), Ok(TypeId::U32));
    assert_eq!(
        BuiltinFn::Max.check(&mut pool, &symbols, &[TypeId::U32, TypeId::I32]),
        Err("arguments must have the same type, found `u32` and `i32`".to_owned())
    );
    assert_eq!(
        BuiltinFn::Clamp.check(&mut pool, &symbols, &[TypeId::F32, TypeId::F32]),
        Err("expected 3 argument(s), found 2".to_owned())
    );
    assert_eq!(
        BuiltinFn::Abs.check(&mut pool, &symbols, &[TypeId::BOOL]),
        Err("expected a numeric scalar or vector, found `bool`".to_owned())
    );
}

#[test]
fn float_builtins() {
    let (mut pool, symbols) = setup();
    let vec3 = pool.vector(TypeId::F32, 3);
    assert_eq!(BuiltinFn::Sqrt.check(&mut pool, &symbols, &[vec3]), Ok(vec3));
    assert_eq!(BuiltinFn::Length.check(&mut pool, &symbols, &[vec3]), Ok(TypeId::F32));
    assert_eq!(BuiltinFn::Normalize.check(&mut pool, &symbols, &[vec3]), Ok(vec3));
    assert_eq!(
        BuiltinFn::Normalize.check(&mut pool, &symbols, &[TypeId::F32]),
        Err("expected a vector, found `f32`".to_owned())
    );
    assert_eq!(
        BuiltinFn::Floor.check(&mut pool, &symbols, &[TypeId::I32]),
        Err("expected `f32` or a vector of it, found `i32`".to_owned())
    );
}

#[test]
fn vector_builtins() {
    let (mut pool, symbols) = setup();
    let vec3 = pool.vector(TypeId::F32, 3);
    let vec2 = pool.vector(TypeId::F32, 2);
    let uvec4 = pool.vector(TypeId::U32, 4);
    assert_eq!(BuiltinFn::Dot.check(&mut pool, &symbols, &[uvec4, uvec4]), Ok(TypeId::U32));
    assert_eq!(BuiltinFn::Cross.check(&mut pool, &symbols, &[vec3, vec3]), Ok(vec3));
    assert_eq!(
        BuiltinFn::Cross.check(&mut pool, &symbols, &[vec2, vec2]),
        Err("expected `vec3<f32>`, found `vec2<f32>`".to_owned())
    );
}

#[test]
fn select_all_any() {
    let (mut pool, symbols) = setup();
    let vec3 = pool.vector(TypeId::F32, 3);
    let bvec3 = pool.vector(TypeId::BOOL, 3);
    let bvec2 = pool.vector(TypeId::BOOL, 2);
    assert_eq!(BuiltinFn::Select.check(&mut pool, &symbols, &[vec3, vec3, bvec3]), Ok(vec3));
    assert_eq!(BuiltinFn::Select.check(&mut pool, &symbols, &[vec3, vec3, TypeId::BOOL]), Ok(vec3));
    assert!(BuiltinFn::Select.check(&mut pool, &symbols, &[vec3, vec3, bvec2]).is_err());
    assert_eq!(BuiltinFn::All.check(&mut pool, &symbols, &[bvec2]), Ok(TypeId::BOOL));
    assert_eq!(
        BuiltinFn::Any.check(&mut pool, &symbols, &[vec3]),
        Err("expected a bool vector, found `vec3<f32>`".to_owned())
    );
}

#[test]
fn array_length_needs_pointer_to_runtime_array() {
    let (mut pool, symbols) = setup();
    let runtime = pool.array(TypeId::F32, ArrayCount::Runtime, None);
    let rw = pool.access_control(Access::ReadWrite, runtime);
    let ptr = pool.pointer(rw, StorageClass::Storage);
    assert_eq!(BuiltinFn::ArrayLength.check(&mut pool, &symbols, &[ptr]), Ok(TypeId::U32));

    let fixed = pool.array(TypeId::F32, ArrayCount::Fixed(4), None);
    let fixed_ptr = pool.pointer(fixed, StorageClass::Function);
    assert!(BuiltinFn::ArrayLength.check(&mut pool, &symbols, &[fixed_ptr]).is_err());
    assert!(BuiltinFn::ArrayLength.check(&mut pool, &symbols, &[runtime]).is_err());
}

#[test]
fn texture_sample() {
    let (mut pool, symbols) = setup();
    let tex_2d = pool.texture(TextureType {
        dim: TextureDimension::D2,
        kind: TextureKind::Sampled(TypeId::F32),
    });
    let depth_array = pool.texture(TextureType {
        dim: TextureDimension::D2Array,
        kind: TextureKind::Depth,
    });
    let sampler = pool.sampler(SamplerKind::Sampler);
    let comparison = pool.sampler(SamplerKind::Comparison);
    let vec2 = pool.vector(TypeId::F32, 2);
    let vec3 = pool.vector(TypeId::F32, 3);
    let vec4 = pool.vector(TypeId::F32, 4);

    assert_eq!(
        BuiltinFn::TextureSample.check(&mut pool, &symbols, &[tex_2d, sampler, vec2]),
        Ok(vec4)
    );
    assert_eq!(
        BuiltinFn::TextureSample.check(&mut pool, &symbols, &[depth_array, sampler, vec2, TypeId::I32]),
        Ok(TypeId::F32)
    );
    assert_eq!(
        BuiltinFn::TextureSample.check(&mut pool, &symbols, &[depth_array, sampler, vec2]),
        Err("array textures take an integer array index".to_owned())
    );
    assert_eq!(
        BuiltinFn::TextureSample.check(&mut pool, &symbols, &[tex_2d, sampler, vec3]),
        Err("expected 2 f32 coordinate component(s), found `vec3<f32>`".to_owned())
    );
    assert_eq!(
        BuiltinFn::TextureSample.check(&mut pool, &symbols, &[tex_2d, comparison, vec2]),
        Err("expected a `sampler`, found `sampler_comparison`".to_owned())
    );
}

#[test]
fn shape_looks_through_aliases_and_none() {
    let (mut pool, mut symbols) = setup();
    let vec2 = pool.vector(TypeId::U32, 2);
    let name = symbols.register("Pair").unwrap();
    let alias = pool.alias(name, vec2);
    assert_eq!(Shape::of(&pool, alias), Shape::Vector(TypeId::U32, 2));
    assert_eq!(Shape::of(&pool, TypeId::NONE), Shape::Other);
    let mat = pool.matrix(4, 3, TypeId::F32);
    assert_eq!(Shape::of(&pool, mat), Shape::Matrix(4, 3));
}
