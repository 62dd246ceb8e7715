//! Renaming of identifiers that collide with a target language's reserved
//! words.

use rustc_hash::FxHashSet;

use super::{finish, Transform, TransformError};
use crate::{BuiltinFn, CloneContext, Program, ProgramBuilder};

const HLSL_RESERVED: &[&str] = &[
    "asfloat", "asint", "asuint", "bool1", "bool2", "bool3", "bool4", "break", "buffer", "cbuffer", "centroid",
    "class", "column_major", "compile", "const", "continue", "ddx", "ddy", "default", "do", "double", "else",
    "export", "extern", "float", "float2", "float3", "float4", "float2x2", "float3x3", "float4x4", "for",
    "frac", "groupshared", "half", "if", "in", "inline", "inout", "int", "int2", "int3", "int4", "interface",
    "lerp", "line", "matrix", "min16float", "mul", "namespace", "nointerpolation", "out", "packoffset",
    "pass", "point", "precise", "register", "return", "row_major", "RWByteAddressBuffer", "RWTexture2D",
    "sample", "sampler", "SamplerComparisonState", "SamplerState", "saturate", "shared", "snorm", "static",
    "string", "struct", "switch", "tbuffer", "technique", "texture", "Texture2D", "Texture2DArray",
    "TextureCube", "typedef", "uint", "uint2", "uint3", "uint4", "uniform", "unorm", "unsigned", "vector",
    "void", "volatile", "while",
];

const GLSL_RESERVED: &[&str] = &[
    "active", "attribute", "buffer", "bvec2", "bvec3", "bvec4", "centroid", "coherent", "const", "dFdx",
    "dFdy", "default", "discard", "do", "double", "else", "flat", "float", "for", "fract", "highp", "if",
    "in", "inout", "input", "int", "invariant", "ivec2", "ivec3", "ivec4", "layout", "lowp", "main", "mat2",
    "mat3", "mat4", "mediump", "noperspective", "out", "output", "precision", "readonly", "restrict",
    "return", "sampler", "sampler2D", "sampler2DArray", "sampler2DShadow", "samplerCube", "shared",
    "smooth", "struct", "subroutine", "switch", "texture", "uint", "uniform", "uvec2", "uvec3", "uvec4",
    "varying", "vec2", "vec3", "vec4", "void", "volatile", "while", "writeonly",
];

/// Renames every identifier that a target language reserves.
///
/// A colliding name `x` becomes `x_` (or `x__1`, ... if taken). Builtin
/// function names are never renamed.
#[derive(Clone, Debug)]
pub struct Renamer {
    name: &'static str,
    reserved: FxHashSet<&'static str>,
    reserved_prefix: Option<&'static str>,
}

impl Renamer {
    pub fn hlsl() -> Self {
        Renamer {
            name: "renamer(hlsl)",
            reserved: HLSL_RESERVED.iter().copied().collect(),
            reserved_prefix: None,
        }
    }

    pub fn glsl() -> Self {
        Renamer {
            name: "renamer(glsl)",
            reserved: GLSL_RESERVED.iter().copied().collect(),
            reserved_prefix: Some("gl_"),
        }
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.reserved_prefix.is_some_and(|prefix| name.starts_with(prefix))
    }

    fn needs_rename(&self, name: &str) -> bool {
        self.is_reserved(name) && BuiltinFn::from_name(name).is_none()
    }
}

impl Transform for Renamer {
    fn name(&self) -> &'static str {
        self.name
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = self.name))]
    fn run(&self, program: &Program) -> Result<Program, TransformError> {
        if !program.is_valid() {
            return Err(TransformError::InvalidProgram { name: self.name });
        }

        let mut builder = ProgramBuilder::new(program.session());
        if let Some(source) = program.source() {
            builder = builder.with_source(source.clone());
        }
        // Fresh names must not collide with names the program keeps.
        for (_, name) in program.symbols().iter() {
            if !self.needs_rename(name) {
                builder.sym(name);
            }
        }

        let mut renamed = 0usize;
        CloneContext::new(program, &mut builder)
            .with_symbol_renamer(|name| {
                if self.needs_rename(name) {
                    renamed += 1;
                    Some(format!("{name}_"))
                } else {
                    None
                }
            })
            .clone_all();
        tracing::debug!(renamed, "renamed reserved identifiers");

        finish(self.name, builder.build())
    }
}
