//! HLSL output for Shader Model 5.1 register spaces.
//!
//! Resources map to `register(<class><binding>, space<group>)`. Uniform
//! buffers become one `cbuffer` per variable and runtime-sized storage
//! arrays become structured buffers. Pointers have no HLSL spelling and are
//! reported as unsupported.

use lumen_ast::{
    AttrKind, AttrRange, BinaryOp, Builtin, CaseRange, ExprId, ExprRange, FunctionDecl, Literal,
    MemberDecl, MemberRange, PipelineStage, StmtId, StmtRange, UnaryOp, VarId, VarKind, Variable,
};
use lumen_diagnostic::{ice, DiagnosticControl, ErrorGuaranteed};
use lumen_ir::{Access, DeclId, SamplerKind, Span, StorageClass, Symbol, TexelFormat, TextureDimension, TypeId};
use lumen_program::{BuiltinFn, CallTarget};
use lumen_types::{ArrayCount, Pool, TextureKind, TextureType, TypeData};

use crate::c_like::CLikePrinter;
use crate::printer::{float_text, storage_access};
use crate::{EmitResult, Printer, PrinterContext};

pub struct HlslPrinter<'p> {
    cx: PrinterContext<'p>,
    loops: Vec<Option<StmtRange>>,
}

impl<'p> HlslPrinter<'p> {
    pub fn new(cx: PrinterContext<'p>) -> Self {
        HlslPrinter { cx, loops: Vec::new() }
    }

    pub fn into_context(self) -> PrinterContext<'p> {
        self.cx
    }

    // === Types ===

    fn type_name(&mut self, ty: TypeId, span: Span) -> Result<String, ErrorGuaranteed> {
        let program = self.program();
        let types = program.types();
        let name = match *types.data(ty) {
            TypeData::Bool => "bool".to_owned(),
            TypeData::I32 => "int".to_owned(),
            TypeData::U32 => "uint".to_owned(),
            TypeData::F32 => "float".to_owned(),
            TypeData::Vector { elem, width } => format!("{}{width}", self.type_name(elem, span)?),
            TypeData::Matrix { columns, rows, elem } => {
                format!("{}{columns}x{rows}", self.type_name(elem, span)?)
            }
            TypeData::Pointer { storage, .. } => {
                let what = if storage == StorageClass::Workgroup {
                    "pointer to workgroup memory".to_owned()
                } else {
                    format!("pointer type `{}`", types.friendly_name(ty, program.symbols()))
                };
                return Err(self.unsupported(span, &what));
            }
            TypeData::Sampler(SamplerKind::Sampler) => "SamplerState".to_owned(),
            TypeData::Sampler(SamplerKind::Comparison) => "SamplerComparisonState".to_owned(),
            TypeData::Texture(texture) => self.texture_name(texture, span)?,
            TypeData::Struct(ref st) => self.name(st.name).to_owned(),
            TypeData::Alias { name, .. } => self.name(name).to_owned(),
            TypeData::AccessControl { inner, .. } => self.type_name(inner, span)?,
            TypeData::Array { .. } => {
                let what = format!(
                    "array type `{}` outside a declaration",
                    types.friendly_name(ty, program.symbols())
                );
                return Err(self.unsupported(span, &what));
            }
        };
        Ok(name)
    }

    fn texture_name(&mut self, texture: TextureType, span: Span) -> Result<String, ErrorGuaranteed> {
        let dim = dim_suffix(texture.dim);
        let name = match texture.kind {
            TextureKind::Sampled(sample) => format!("Texture{dim}<{}4>", self.type_name(sample, span)?),
            TextureKind::Multisampled(sample) => {
                format!("Texture{dim}MS<{}4>", self.type_name(sample, span)?)
            }
            TextureKind::Depth => format!("Texture{dim}"),
            TextureKind::Storage { format, access } => {
                let prefix = if access == Access::Read { "" } else { "RW" };
                format!("{prefix}Texture{dim}<{}>", texel_type(format))
            }
        };
        Ok(name)
    }

    /// `T name` with array dimensions moved after the name.
    fn declarator(&mut self, ty: TypeId, name: &str, span: Span) -> Result<String, ErrorGuaranteed> {
        let types = self.program().types();
        let mut dims = String::new();
        let mut elem = ty;
        while let TypeData::Array { elem: inner, count, .. } = *types.data(types.unwrap_all(elem)) {
            match count {
                ArrayCount::Fixed(n) => dims.push_str(&format!("[{n}]")),
                ArrayCount::Runtime => return Err(self.unsupported(span, "runtime-sized array")),
            }
            elem = inner;
        }
        Ok(format!("{} {name}{dims}", self.type_name(elem, span)?))
    }

    /// ` : SEMANTIC` for an IO attribute in `attrs`, or nothing.
    fn semantic(&mut self, attrs: AttrRange, fragment_output: bool, span: Span) -> Result<String, ErrorGuaranteed> {
        let ast = self.program().ast();
        for &attr in ast.attr_list(attrs) {
            match ast.attr(attr).kind {
                AttrKind::Builtin(builtin) => {
                    let Some(value) = system_value(builtin) else {
                        let what = format!("@builtin({})", builtin.as_str());
                        return Err(self.unsupported(span, &what));
                    };
                    return Ok(format!(" : {value}"));
                }
                AttrKind::Location(n) if fragment_output => return Ok(format!(" : SV_Target{n}")),
                AttrKind::Location(n) => return Ok(format!(" : TEXCOORD{n}")),
                _ => {}
            }
        }
        Ok(String::new())
    }

    // === Declarations ===

    fn resource_binding(&self, var: &Variable) -> (u32, u32) {
        let ast = self.program().ast();
        let group = ast.find_attr(var.attrs, |kind| match *kind {
            AttrKind::Group(group) => Some(group),
            _ => None,
        });
        let binding = ast.find_attr(var.attrs, |kind| match *kind {
            AttrKind::Binding(binding) => Some(binding),
            _ => None,
        });
        match (group, binding) {
            (Some(group), Some(binding)) => (group, binding),
            _ => ice!(
                self.program().session().ice(),
                "resource variable `{}` has no binding",
                self.name(var.name)
            ),
        }
    }

    /// Whether a fragment entry point returns the struct `ty`, making its
    /// locations render targets.
    fn is_fragment_output(&self, ty: TypeId) -> bool {
        let program = self.program();
        let types = program.types();
        program
            .ast()
            .functions()
            .filter(|(decl, _)| {
                program
                    .sem()
                    .entry_point(*decl)
                    .is_some_and(|entry| entry.stage == PipelineStage::Fragment)
            })
            .any(|(_, func)| func.return_type.map(|ret| types.unwrap_alias(ret)) == Some(ty))
    }

    fn emit_struct_member(&mut self, member: &MemberDecl, fragment_output: bool) -> EmitResult {
        let decl = self.declarator(member.ty, self.name(member.name), member.span)?;
        let semantic = self.semantic(member.attrs, fragment_output, member.span)?;
        self.text().line(&format!("{decl}{semantic};"));
        Ok(())
    }

    fn emit_storage_buffer(&mut self, var: &Variable, ty: TypeId) -> EmitResult {
        let program = self.program();
        let types = program.types();
        let name = self.name(var.name);
        let TypeData::Array {
            elem,
            count: ArrayCount::Runtime,
            ..
        } = *types.data(types.unwrap_all(ty))
        else {
            let what = format!(
                "storage buffer `{name}` of type `{}`",
                types.friendly_name(ty, program.symbols())
            );
            return Err(self.unsupported(var.span, &what));
        };
        let elem = self.type_name(elem, var.span)?;
        let (group, binding) = self.resource_binding(var);
        let line = if storage_access(types, ty) == Access::Read {
            format!("StructuredBuffer<{elem}> {name} : register(t{binding}, space{group});")
        } else {
            format!("RWStructuredBuffer<{elem}> {name} : register(u{binding}, space{group});")
        };
        self.text().line(&line);
        Ok(())
    }

    fn emit_initializer(&mut self, init: Option<ExprId>) -> EmitResult {
        if let Some(init) = init {
            self.write(" = ");
            self.emit_expression(init)?;
        }
        Ok(())
    }

    // === Expressions ===

    fn emit_builtin_call(&mut self, builtin: BuiltinFn, args: ExprRange, span: Span) -> EmitResult {
        let program = self.program();
        let list = program.ast().expr_list(args);
        match builtin {
            BuiltinFn::Select => {
                let &[if_false, if_true, cond] = list else {
                    ice!(program.session().ice(), "select called with {} arguments", list.len());
                };
                self.write("(");
                self.emit_operand(cond)?;
                self.write(" ? ");
                self.emit_operand(if_true)?;
                self.write(" : ");
                self.emit_operand(if_false)?;
                self.write(")");
                Ok(())
            }
            BuiltinFn::ArrayLength => Err(self.unsupported(span, "arrayLength")),
            BuiltinFn::TextureSample => self.emit_texture_sample(list, span),
            _ => {
                let name = match builtin {
                    BuiltinFn::Fract => "frac",
                    BuiltinFn::Dpdx => "ddx",
                    BuiltinFn::Dpdy => "ddy",
                    other => other.as_str(),
                };
                self.write(name);
                self.write("(");
                self.emit_args(args)?;
                self.write(")");
                Ok(())
            }
        }
    }

    /// `t.Sample(s, coords)`; an array index is appended to the coordinates.
    fn emit_texture_sample(&mut self, args: &[ExprId], _span: Span) -> EmitResult {
        let program = self.program();
        let types = program.types();
        let [texture, sampler, coords, rest @ ..] = args else {
            ice!(program.session().ice(), "textureSample called with {} arguments", args.len());
        };
        let texture_ty = types.unwrap_all(program.sem().expr_type(*texture));
        let TypeData::Texture(tex) = *types.data(texture_ty) else {
            ice!(program.session().ice(), "textureSample of non-texture type {texture_ty:?}");
        };
        self.emit_operand(*texture)?;
        self.write(".Sample(");
        self.emit_expression(*sampler)?;
        self.write(", ");
        match rest {
            [index] => {
                let width = tex.dim.coordinate_width() + 1;
                self.write(&format!("float{width}("));
                self.emit_expression(*coords)?;
                self.write(", float(");
                self.emit_expression(*index)?;
                self.write("))");
            }
            _ => self.emit_expression(*coords)?,
        }
        self.write(")");
        if tex.kind == TextureKind::Depth {
            self.write(".x");
        }
        Ok(())
    }
}

impl<'p> Printer<'p> for HlslPrinter<'p> {
    fn cx(&self) -> &PrinterContext<'p> {
        &self.cx
    }

    fn cx_mut(&mut self) -> &mut PrinterContext<'p> {
        &mut self.cx
    }

    // === Declarations ===

    fn emit_struct(&mut self, name: Symbol, members: MemberRange, ty: TypeId, _span: Span) -> EmitResult {
        let ast = self.program().ast();
        let fragment_output = self.is_fragment_output(ty);
        let header = format!("struct {} {{", self.name(name));
        self.text().line(&header);
        self.text().increment_indent();
        let mut result = Ok(());
        for &member in ast.member_list(members) {
            result = result.and(self.emit_struct_member(ast.member(member), fragment_output));
        }
        self.text().decrement_indent();
        self.text().line("};");
        result
    }

    fn emit_global_var(&mut self, id: VarId) -> EmitResult {
        let program = self.program();
        let var = program.ast().var(id);
        let ty = program.sem().var_type(id);
        let name = self.name(var.name);

        if var.kind == VarKind::Const {
            let decl = self.declarator(ty, name, var.span)?;
            self.text().indent();
            self.write("static const ");
            self.write(&decl);
            self.emit_initializer(var.init)?;
            self.write(";\n");
            return Ok(());
        }

        match var.storage {
            StorageClass::Uniform => {
                let decl = self.declarator(ty, name, var.span)?;
                let (group, binding) = self.resource_binding(var);
                self.text()
                    .line(&format!("cbuffer {name}_block : register(b{binding}, space{group}) {{"));
                self.text().increment_indent();
                self.text().line(&format!("{decl};"));
                self.text().decrement_indent();
                self.text().line("};");
                Ok(())
            }
            StorageClass::Storage => self.emit_storage_buffer(var, ty),
            StorageClass::Handle => {
                let decl = self.declarator(ty, name, var.span)?;
                let (group, binding) = self.resource_binding(var);
                let class = register_class(program.types(), ty);
                self.text()
                    .line(&format!("{decl} : register({class}{binding}, space{group});"));
                Ok(())
            }
            StorageClass::Private | StorageClass::Workgroup => {
                let decl = self.declarator(ty, name, var.span)?;
                self.text().indent();
                if var.storage == StorageClass::Private {
                    self.write("static ");
                } else {
                    self.write("groupshared ");
                }
                self.write(&decl);
                self.emit_initializer(var.init)?;
                self.write(";\n");
                Ok(())
            }
            StorageClass::None | StorageClass::Function => ice!(
                program.session().ice(),
                "module-scope variable `{name}` has no address space"
            ),
        }
    }

    fn emit_function(&mut self, id: DeclId, func: &FunctionDecl, span: Span) -> EmitResult {
        let program = self.program();
        let ast = program.ast();
        let entry = program.sem().entry_point(id).copied();

        let ret = match func.return_type {
            Some(ty) => self.type_name(ty, span)?,
            None => "void".to_owned(),
        };
        let mut params = Vec::new();
        for &param in ast.var_list(func.params) {
            let ty = program.sem().var_type(param);
            let param = ast.var(param);
            let name = self.name(param.name);
            if program.types().pointee(ty).is_some() {
                return Err(self.unsupported(param.span, &format!("pointer parameter `{name}`")));
            }
            let mut text = self.declarator(ty, name, param.span)?;
            if entry.is_some() {
                text.push_str(&self.semantic(param.attrs, false, param.span)?);
            }
            params.push(text);
        }
        let ret_semantic = match entry {
            Some(entry) if func.return_type.is_some() => {
                self.semantic(func.return_attrs, entry.stage == PipelineStage::Fragment, span)?
            }
            _ => String::new(),
        };

        if let Some(entry) = entry.filter(|e| e.stage == PipelineStage::Compute) {
            let [x, y, z] = entry.workgroup_size.unwrap_or([1, 1, 1]);
            self.text().line(&format!("[numthreads({x}, {y}, {z})]"));
        }
        let header = format!(
            "{ret} {}({}){ret_semantic} {{",
            self.name(func.name),
            params.join(", ")
        );
        self.text().line(&header);
        let result = self.emit_body(func.body);
        self.text().line("}");
        result
    }

    fn emit_alias(&mut self, name: Symbol, ty: TypeId, span: Span) -> EmitResult {
        let types = self.program().types();
        let TypeData::Alias { target, .. } = *types.data(ty) else {
            ice!(types.ice(), "alias declaration carries a non-alias type {ty:?}");
        };
        let decl = self.declarator(target, self.name(name), span)?;
        self.text().line(&format!("typedef {decl};"));
        Ok(())
    }

    fn emit_diagnostic_directive(&mut self, _control: DiagnosticControl) -> EmitResult {
        Ok(())
    }

    fn emit_type(&mut self, ty: TypeId, span: Span) -> EmitResult {
        let name = self.type_name(ty, span)?;
        self.write(&name);
        Ok(())
    }

    // === Statements ===

    fn emit_local(&mut self, id: VarId) -> EmitResult {
        let program = self.program();
        let types = program.types();
        let var = program.ast().var(id);
        let ty = program.sem().var_type(id);
        let decl = self.declarator(ty, self.name(var.name), var.span)?;
        self.text().indent();
        if var.kind != VarKind::Var {
            self.write("const ");
        }
        self.write(&decl);
        match var.init {
            Some(init) => {
                self.write(" = ");
                self.emit_expression(init)?;
            }
            None if !types.is_array(types.unwrap_alias(ty)) => {
                let name = self.type_name(ty, var.span)?;
                self.write(&format!(" = ({name})0"));
            }
            None => {}
        }
        self.write(";\n");
        Ok(())
    }

    fn emit_if(&mut self, cond: ExprId, body: StmtRange, else_stmt: Option<StmtId>) -> EmitResult {
        self.c_if(cond, body, else_stmt)
    }

    fn emit_loop(&mut self, body: StmtRange, continuing: Option<StmtRange>) -> EmitResult {
        self.c_loop(body, continuing)
    }

    fn emit_switch(&mut self, cond: ExprId, cases: CaseRange) -> EmitResult {
        self.c_switch(cond, cases)
    }

    fn emit_continue(&mut self) -> EmitResult {
        self.c_continue()
    }

    // === Expressions ===

    fn emit_literal(&mut self, lit: Literal, span: Span) -> EmitResult {
        let text = match lit {
            Literal::Bool(value) => value.to_string(),
            // `2147483648` does not fit the literal type, so it cannot be negated.
            Literal::I32(i32::MIN) => "(-2147483647 - 1)".to_owned(),
            Literal::I32(value) => value.to_string(),
            Literal::U32(value) => format!("{value}u"),
            Literal::F32(bits) => match float_text(f32::from_bits(bits)) {
                Some(text) => format!("{text}f"),
                None => return Err(self.unsupported(span, "a non-finite float literal")),
            },
        };
        self.write(&text);
        Ok(())
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> EmitResult {
        if matches!(op, UnaryOp::AddressOf | UnaryOp::Deref) {
            return Err(self.unsupported(span, "pointer expression"));
        }
        self.write(op.as_symbol());
        self.emit_operand(operand)
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> EmitResult {
        let program = self.program();
        let types = program.types();
        let shape = |expr| types.unwrap_all(program.sem().expr_type(expr));
        let (l, r) = (shape(lhs), shape(rhs));
        let linear = (types.is_matrix(l) && !r.is_scalar()) || (types.is_matrix(r) && !l.is_scalar());
        if op != BinaryOp::Mul || !linear {
            self.emit_operand(lhs)?;
            self.write(" ");
            self.write(op.as_symbol());
            self.write(" ");
            return self.emit_operand(rhs);
        }
        // Matrices are declared transposed, so the operands swap.
        self.write("mul(");
        self.emit_expression(rhs)?;
        self.write(", ");
        self.emit_expression(lhs)?;
        self.write(")");
        Ok(())
    }

    fn emit_call(&mut self, expr: ExprId, callee: Symbol, args: ExprRange, span: Span) -> EmitResult {
        if let Some(CallTarget::Builtin(builtin)) = self.program().sem().call_target(expr) {
            return self.emit_builtin_call(builtin, args, span);
        }
        let name = self.name(callee);
        self.write(name);
        self.write("(");
        self.emit_args(args)?;
        self.write(")");
        Ok(())
    }

    fn emit_constructor(&mut self, ty: TypeId, args: ExprRange, span: Span) -> EmitResult {
        let program = self.program();
        let types = program.types();
        let list = program.ast().expr_list(args);
        let target = types.unwrap_alias(ty);

        if list.is_empty() {
            let name = self.type_name(ty, span)?;
            self.write(&format!("(({name})0)"));
            return Ok(());
        }
        match types.data(target) {
            TypeData::Struct(_) => return Err(self.unsupported(span, "struct constructor with arguments")),
            TypeData::Array { .. } => return Err(self.unsupported(span, "array constructor")),
            _ => {}
        }
        if let &[arg] = list {
            // A vector built from one scalar repeats it in every component.
            let splat = types.is_vector(target) && types.vector_width(program.sem().expr_type(arg)).is_none();
            if splat {
                let name = self.type_name(ty, span)?;
                self.write(&format!("(({name})"));
                self.emit_operand(arg)?;
                self.write(")");
                return Ok(());
            }
        }
        self.emit_type(ty, span)?;
        self.write("(");
        self.emit_args(args)?;
        self.write(")");
        Ok(())
    }

    fn emit_bitcast(&mut self, ty: TypeId, operand: ExprId, span: Span) -> EmitResult {
        let func = match self.program().types().scalar_of(ty) {
            Some(TypeId::F32) => "asfloat",
            Some(TypeId::I32) => "asint",
            Some(TypeId::U32) => "asuint",
            _ => return Err(self.unsupported(span, "bitcast to a non-numeric type")),
        };
        self.write(func);
        self.write("(");
        self.emit_expression(operand)?;
        self.write(")");
        Ok(())
    }
}

impl<'p> CLikePrinter<'p> for HlslPrinter<'p> {
    fn loops(&mut self) -> &mut Vec<Option<StmtRange>> {
        &mut self.loops
    }
}

fn dim_suffix(dim: TextureDimension) -> &'static str {
    match dim {
        TextureDimension::D1 => "1D",
        TextureDimension::D2 => "2D",
        TextureDimension::D2Array => "2DArray",
        TextureDimension::D3 => "3D",
        TextureDimension::Cube => "Cube",
        TextureDimension::CubeArray => "CubeArray",
    }
}

/// Element type of a typed UAV for `format`.
fn texel_type(format: TexelFormat) -> &'static str {
    match format {
        TexelFormat::Rgba8Unorm | TexelFormat::Rgba8Snorm | TexelFormat::Rgba16Float | TexelFormat::Rgba32Float => {
            "float4"
        }
        TexelFormat::Rgba8Uint | TexelFormat::Rgba32Uint => "uint4",
        TexelFormat::Rgba8Sint | TexelFormat::Rgba32Sint => "int4",
        TexelFormat::R32Uint => "uint",
        TexelFormat::R32Sint => "int",
        TexelFormat::R32Float => "float",
        TexelFormat::Rg32Float => "float2",
    }
}

/// Register class of a handle: `s` for samplers, `u` for writable
/// textures, `t` otherwise.
fn register_class(types: &Pool, ty: TypeId) -> char {
    match types.data(types.unwrap_all(ty)) {
        TypeData::Sampler(_) => 's',
        TypeData::Texture(TextureType {
            kind: TextureKind::Storage { access, .. },
            ..
        }) if *access != Access::Read => 'u',
        _ => 't',
    }
}

fn system_value(builtin: Builtin) -> Option<&'static str> {
    Some(match builtin {
        Builtin::Position => "SV_Position",
        Builtin::VertexIndex => "SV_VertexID",
        Builtin::InstanceIndex => "SV_InstanceID",
        Builtin::FrontFacing => "SV_IsFrontFace",
        Builtin::FragDepth => "SV_Depth",
        Builtin::SampleIndex => "SV_SampleIndex",
        Builtin::LocalInvocationId => "SV_GroupThreadID",
        Builtin::LocalInvocationIndex => "SV_GroupIndex",
        Builtin::GlobalInvocationId => "SV_DispatchThreadID",
        Builtin::WorkgroupId => "SV_GroupID",
        Builtin::NumWorkgroups => return None,
    })
}
