//! Builtin functions.
//!
//! Each builtin checks its own argument types and computes its result type.
//! A failed check returns a short message; the resolver wraps it in an
//! `E1006` diagnostic.

use std::fmt;

use lumen_ir::{SamplerKind, SymbolTable, TypeId};
use lumen_types::{ArrayCount, Pool, TextureKind, TypeData};

/// Functions every program can call without declaring them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinFn {
    Abs,
    Min,
    Max,
    Clamp,
    Sqrt,
    Sin,
    Cos,
    Floor,
    Fract,
    Normalize,
    Length,
    Dot,
    Cross,
    Select,
    All,
    Any,
    ArrayLength,
    TextureSample,
    Dpdx,
    Dpdy,
    Fwidth,
}

impl BuiltinFn {
    pub const ALL: [BuiltinFn; 21] = [
        BuiltinFn::Abs,
        BuiltinFn::Min,
        BuiltinFn::Max,
        BuiltinFn::Clamp,
        BuiltinFn::Sqrt,
        BuiltinFn::Sin,
        BuiltinFn::Cos,
        BuiltinFn::Floor,
        BuiltinFn::Fract,
        BuiltinFn::Normalize,
        BuiltinFn::Length,
        BuiltinFn::Dot,
        BuiltinFn::Cross,
        BuiltinFn::Select,
        BuiltinFn::All,
        BuiltinFn::Any,
        BuiltinFn::ArrayLength,
        BuiltinFn::TextureSample,
        BuiltinFn::Dpdx,
        BuiltinFn::Dpdy,
        BuiltinFn::Fwidth,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Source spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            BuiltinFn::Abs => "abs",
            BuiltinFn::Min => "min",
            BuiltinFn::Max => "max",
            BuiltinFn::Clamp => "clamp",
            BuiltinFn::Sqrt => "sqrt",
            BuiltinFn::Sin => "sin",
            BuiltinFn::Cos => "cos",
            BuiltinFn::Floor => "floor",
            BuiltinFn::Fract => "fract",
            BuiltinFn::Normalize => "normalize",
            BuiltinFn::Length => "length",
            BuiltinFn::Dot => "dot",
            BuiltinFn::Cross => "cross",
            BuiltinFn::Select => "select",
            BuiltinFn::All => "all",
            BuiltinFn::Any => "any",
            BuiltinFn::ArrayLength => "arrayLength",
            BuiltinFn::TextureSample => "textureSample",
            BuiltinFn::Dpdx => "dpdx",
            BuiltinFn::Dpdy => "dpdy",
            BuiltinFn::Fwidth => "fwidth",
        }
    }

    /// Computes a screen-space derivative, explicitly or implicitly.
    ///
    /// These must only be called from uniform control flow.
    pub const fn is_derivative(self) -> bool {
        matches!(
            self,
            BuiltinFn::Dpdx | BuiltinFn::Dpdy | BuiltinFn::Fwidth | BuiltinFn::TextureSample
        )
    }

    /// Check argument types and compute the result type.
    pub(crate) fn check(
        self,
        pool: &mut Pool,
        symbols: &SymbolTable,
        args: &[TypeId],
    ) -> Result<TypeId, String> {
        match self {
            BuiltinFn::Abs => {
                let [x] = arity(args)?;
                numeric(pool, symbols, x)?;
                Ok(x)
            }
            BuiltinFn::Min | BuiltinFn::Max => {
                let [a, b] = arity(args)?;
                numeric(pool, symbols, a)?;
                same(pool, symbols, a, b)?;
                Ok(a)
            }
            BuiltinFn::Clamp => {
                let [x, lo, hi] = arity(args)?;
                numeric(pool, symbols, x)?;
                same(pool, symbols, x, lo)?;
                same(pool, symbols, x, hi)?;
                Ok(x)
            }
            BuiltinFn::Sqrt
            | BuiltinFn::Sin
            | BuiltinFn::Cos
            | BuiltinFn::Floor
            | BuiltinFn::Fract
            | BuiltinFn::Dpdx
            | BuiltinFn::Dpdy
            | BuiltinFn::Fwidth => {
                let [x] = arity(args)?;
                float(pool, symbols, x)?;
                Ok(x)
            }
            BuiltinFn::Normalize => {
                let [v] = arity(args)?;
                float(pool, symbols, v)?;
                match Shape::of(pool, v) {
                    Shape::Vector(..) => Ok(v),
                    _ => Err(format!("expected a vector, found `{}`", pool.friendly_name(v, symbols))),
                }
            }
            BuiltinFn::Length => {
                let [x] = arity(args)?;
                float(pool, symbols, x)?;
                Ok(pool.f32())
            }
            BuiltinFn::Dot => {
                let [a, b] = arity(args)?;
                same(pool, symbols, a, b)?;
                match Shape::of(pool, a) {
                    Shape::Vector(elem, _) if elem != TypeId::BOOL => Ok(elem),
                    _ => Err(format!("expected a numeric vector, found `{}`", pool.friendly_name(a, symbols))),
                }
            }
            BuiltinFn::Cross => {
                let [a, b] = arity(args)?;
                same(pool, symbols, a, b)?;
                match Shape::of(pool, a) {
                    Shape::Vector(TypeId::F32, 3) => Ok(a),
                    _ => Err(format!("expected `vec3<f32>`, found `{}`", pool.friendly_name(a, symbols))),
                }
            }
            BuiltinFn::Select => {
                let [f, t, cond] = arity(args)?;
                same(pool, symbols, f, t)?;
                let ok = match (Shape::of(pool, f), Shape::of(pool, cond)) {
                    (Shape::Scalar(_) | Shape::Vector(..), Shape::Scalar(TypeId::BOOL)) => true,
                    (Shape::Vector(_, n), Shape::Vector(TypeId::BOOL, m)) => n == m,
                    _ => false,
                };
                if ok {
                    Ok(f)
                } else {
                    Err("condition must be `bool` or a bool vector of the same width".to_owned())
                }
            }
            BuiltinFn::All | BuiltinFn::Any => {
                let [x] = arity(args)?;
                match Shape::of(pool, x) {
                    Shape::Scalar(TypeId::BOOL) | Shape::Vector(TypeId::BOOL, _) => Ok(pool.bool()),
                    _ => Err(format!("expected a bool vector, found `{}`", pool.friendly_name(x, symbols))),
                }
            }
            BuiltinFn::ArrayLength => {
                let [p] = arity(args)?;
                let runtime = pool
                    .pointee(p)
                    .map(|(pointee, _)| pool.unwrap_all(pointee))
                    .is_some_and(|arr| {
                        matches!(
                            pool.data(arr),
                            TypeData::Array {
                                count: ArrayCount::Runtime,
                                ..
                            }
                        )
                    });
                if runtime {
                    Ok(pool.u32())
                } else {
                    Err("expected a pointer to a runtime-sized array".to_owned())
                }
            }
            BuiltinFn::TextureSample => texture_sample(pool, symbols, args),
        }
    }
}

impl fmt::Display for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn texture_sample(pool: &mut Pool, symbols: &SymbolTable, args: &[TypeId]) -> Result<TypeId, String> {
    let (texture, sampler, coords, rest) = match args {
        [t, s, c, rest @ ..] => (*t, *s, *c, rest),
        _ => return Err(format!("expected at least 3 arguments, found {}", args.len())),
    };
    let TypeData::Texture(tex) = *pool.data(pool.unwrap_all(texture)) else {
        return Err(format!("expected a texture, found `{}`", pool.friendly_name(texture, symbols)));
    };
    let result = match tex.kind {
        TextureKind::Sampled(_) => pool.vector(pool.f32(), 4),
        TextureKind::Depth => pool.f32(),
        TextureKind::Multisampled(_) | TextureKind::Storage { .. } => {
            return Err("texture cannot be sampled".to_owned());
        }
    };
    match pool.data(pool.unwrap_all(sampler)) {
        TypeData::Sampler(SamplerKind::Sampler) => {}
        _ => return Err(format!("expected a `sampler`, found `{}`", pool.friendly_name(sampler, symbols))),
    }
    let width = tex.dim.coordinate_width();
    let coords_ok = match Shape::of(pool, coords) {
        Shape::Scalar(TypeId::F32) => width == 1,
        Shape::Vector(TypeId::F32, n) => n == width,
        _ => false,
    };
    if !coords_ok {
        return Err(format!(
            "expected {width} f32 coordinate component(s), found `{}`",
            pool.friendly_name(coords, symbols)
        ));
    }
    match (tex.dim.is_array(), rest) {
        (false, []) => Ok(result),
        (true, [index]) if matches!(Shape::of(pool, *index), Shape::Scalar(TypeId::I32 | TypeId::U32)) => {
            Ok(result)
        }
        (true, _) => Err("array textures take an integer array index".to_owned()),
        (false, _) => Err(format!("expected 3 arguments, found {}", args.len())),
    }
}

/// Coarse classification of a value type, looking through aliases and
/// access control.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Shape {
    Scalar(TypeId),
    Vector(TypeId, u8),
    Matrix(u8, u8),
    Other,
}

impl Shape {
    pub(crate) fn of(pool: &Pool, ty: TypeId) -> Shape {
        if ty.is_none() {
            return Shape::Other;
        }
        let ty = pool.unwrap_all(ty);
        match *pool.data(ty) {
            TypeData::Bool | TypeData::I32 | TypeData::U32 | TypeData::F32 => Shape::Scalar(ty),
            TypeData::Vector { elem, width } => Shape::Vector(elem, width),
            TypeData::Matrix { columns, rows, .. } => Shape::Matrix(columns, rows),
            _ => Shape::Other,
        }
    }
}

fn arity<const N: usize>(args: &[TypeId]) -> Result<[TypeId; N], String> {
    <[TypeId; N]>::try_from(args)
        .map_err(|_| format!("expected {N} argument(s), found {}", args.len()))
}

fn numeric(pool: &Pool, symbols: &SymbolTable, ty: TypeId) -> Result<(), String> {
    match Shape::of(pool, ty) {
        Shape::Scalar(t) | Shape::Vector(t, _) if t != TypeId::BOOL => Ok(()),
        _ => Err(format!("expected a numeric scalar or vector, found `{}`", pool.friendly_name(ty, symbols))),
    }
}

fn float(pool: &Pool, symbols: &SymbolTable, ty: TypeId) -> Result<(), String> {
    match Shape::of(pool, ty) {
        Shape::Scalar(TypeId::F32) | Shape::Vector(TypeId::F32, _) => Ok(()),
        _ => Err(format!("expected `f32` or a vector of it, found `{}`", pool.friendly_name(ty, symbols))),
    }
}

fn same(pool: &Pool, symbols: &SymbolTable, a: TypeId, b: TypeId) -> Result<(), String> {
    if pool.unwrap_all(a) == pool.unwrap_all(b) {
        Ok(())
    } else {
        Err(format!(
            "arguments must have the same type, found `{}` and `{}`",
            pool.friendly_name(a, symbols),
            pool.friendly_name(b, symbols)
        ))
    }
}

#[cfg(test)]
mod tests;
