//! Vulkan GLSL 4.50 output.
//!
//! GLSL has one `main` per shader, so a module may contain at most one
//! entry point once the entry point filter is applied. Entry point IO moves
//! to module-scope `in`/`out` declarations and `gl_*` builtins; the entry
//! function itself becomes `void main()`.
//!
//! Separate sampler objects and pointers are not expressible and are
//! reported as unsupported.

use lumen_ast::{
    AttrKind, Builtin, CaseRange, ExprId, ExprKind, ExprRange, FunctionDecl, Literal, MemberRange,
    PipelineStage, StmtId, StmtRange, UnaryOp, VarId, VarKind, Variable,
};
use lumen_diagnostic::{ice, DiagnosticControl, ErrorGuaranteed};
use lumen_ir::{Access, DeclId, Span, StorageClass, Symbol, TexelFormat, TextureDimension, TypeId};
use lumen_program::{BuiltinFn, CallTarget, EntryPoint};
use lumen_types::{ArrayCount, TextureKind, TextureType, TypeData};

use crate::c_like::CLikePrinter;
use crate::printer::{float_text, storage_access};
use crate::{EmitResult, Printer, PrinterContext};

pub struct GlslPrinter<'p> {
    cx: PrinterContext<'p>,
    loops: Vec<Option<StmtRange>>,
    /// Variable receiving the entry point's return value while its body is
    /// emitted.
    output: Option<String>,
}

/// Entry point IO attribute.
#[derive(Copy, Clone)]
enum Io {
    Builtin(Builtin),
    Location(u32),
}

fn io_of(kind: &AttrKind) -> Option<Io> {
    match *kind {
        AttrKind::Builtin(builtin) => Some(Io::Builtin(builtin)),
        AttrKind::Location(n) => Some(Io::Location(n)),
        _ => None,
    }
}

impl<'p> GlslPrinter<'p> {
    pub fn new(cx: PrinterContext<'p>) -> Self {
        GlslPrinter {
            cx,
            loops: Vec::new(),
            output: None,
        }
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
            TypeData::Vector { elem, width } => format!("{}vec{width}", vector_prefix(elem)),
            TypeData::Matrix { columns, rows, .. } if columns == rows => format!("mat{columns}"),
            TypeData::Matrix { columns, rows, .. } => format!("mat{columns}x{rows}"),
            TypeData::Pointer { .. } => {
                let what = format!("pointer type `{}`", types.friendly_name(ty, program.symbols()));
                return Err(self.unsupported(span, &what));
            }
            TypeData::Sampler(_) => return Err(self.unsupported(span, "separate sampler object")),
            TypeData::Texture(texture) => texture_name(texture),
            TypeData::Struct(ref st) => self.name(st.name).to_owned(),
            TypeData::Alias { target, .. } => self.type_name(target, span)?,
            TypeData::AccessControl { inner, .. } => self.type_name(inner, span)?,
            TypeData::Array { elem, count, .. } => {
                let elem = self.type_name(elem, span)?;
                match count {
                    ArrayCount::Fixed(n) => format!("{elem}[{n}]"),
                    ArrayCount::Runtime => format!("{elem}[]"),
                }
            }
        };
        Ok(name)
    }

    /// `T name` with array dimensions moved after the name.
    fn declarator(&mut self, ty: TypeId, name: &str, span: Span) -> Result<String, ErrorGuaranteed> {
        let types = self.program().types();
        let mut dims = String::new();
        let mut elem = types.unwrap_all(ty);
        while let TypeData::Array { elem: inner, count, .. } = *types.data(elem) {
            match count {
                ArrayCount::Fixed(n) => dims.push_str(&format!("[{n}]")),
                ArrayCount::Runtime => dims.push_str("[]"),
            }
            elem = types.unwrap_all(inner);
        }
        Ok(format!("{} {name}{dims}", self.type_name(elem, span)?))
    }

    fn layout_binding(&self, var: &Variable) -> String {
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
            (Some(group), Some(binding)) => format!("set = {group}, binding = {binding}"),
            _ => ice!(
                self.program().session().ice(),
                "resource variable `{}` has no binding",
                self.name(var.name)
            ),
        }
    }

    // === Declarations ===

    /// `layout(...) uniform|buffer name_block { T name; };`
    fn emit_interface_block(&mut self, var: &Variable, ty: TypeId) -> EmitResult {
        let name = self.name(var.name);
        let decl = self.declarator(ty, name, var.span)?;
        let binding = self.layout_binding(var);
        let header = if var.storage == StorageClass::Uniform {
            format!("layout(std140, {binding}) uniform {name}_block {{")
        } else {
            let readonly = if storage_access(self.program().types(), ty) == Access::Read {
                "readonly "
            } else {
                ""
            };
            format!("layout(std430, {binding}) {readonly}buffer {name}_block {{")
        };
        self.text().line(&header);
        self.text().increment_indent();
        self.text().line(&format!("{decl};"));
        self.text().decrement_indent();
        self.text().line("};");
        Ok(())
    }

    fn emit_handle(&mut self, var: &Variable, ty: TypeId) -> EmitResult {
        let types = self.program().types();
        let decl = self.declarator(ty, self.name(var.name), var.span)?;
        let binding = self.layout_binding(var);
        let line = match *types.data(types.unwrap_all(ty)) {
            TypeData::Texture(TextureType {
                kind: TextureKind::Storage { format, access },
                ..
            }) => {
                let access = match access {
                    Access::Read => "readonly ",
                    Access::Write => "writeonly ",
                    Access::ReadWrite => "",
                };
                format!("layout({}, {binding}) {access}uniform {decl};", format_qualifier(format))
            }
            _ => format!("layout({binding}) uniform {decl};"),
        };
        self.text().line(&line);
        Ok(())
    }

    /// IO declarations and `void main()` for the entry point.
    fn emit_entry_point(&mut self, entry: EntryPoint, func: &FunctionDecl, span: Span) -> EmitResult {
        let program = self.program();
        let ast = program.ast();
        let types = program.types();

        let mut globals = Vec::new();
        let mut copies = Vec::new();
        for &param in ast.var_list(func.params) {
            let ty = program.sem().var_type(param);
            let param = ast.var(param);
            let name = self.name(param.name);
            match ast.find_attr(param.attrs, io_of) {
                Some(Io::Location(n)) => {
                    let integer = matches!(types.scalar_of(ty), Some(TypeId::I32 | TypeId::U32));
                    let flat = if integer && entry.stage == PipelineStage::Fragment {
                        "flat "
                    } else {
                        ""
                    };
                    let decl = self.declarator(ty, name, param.span)?;
                    globals.push(format!("layout(location = {n}) {flat}in {decl};"));
                }
                Some(Io::Builtin(builtin)) => {
                    let Some(value) = builtin_input(builtin, entry.stage) else {
                        let what = format!("@builtin({}) as an input", builtin.as_str());
                        return Err(self.unsupported(param.span, &what));
                    };
                    let decl = self.declarator(ty, name, param.span)?;
                    copies.push(format!("{decl} = {value};"));
                }
                None => {
                    let what = format!("struct-typed entry point parameter `{name}`");
                    return Err(self.unsupported(param.span, &what));
                }
            }
        }

        let output = match func.return_type {
            None => None,
            Some(ret) => match ast.find_attr(func.return_attrs, io_of) {
                Some(Io::Builtin(Builtin::Position)) => Some("gl_Position".to_owned()),
                Some(Io::Builtin(Builtin::FragDepth)) => Some("gl_FragDepth".to_owned()),
                Some(Io::Builtin(other)) => {
                    let what = format!("@builtin({}) as an output", other.as_str());
                    return Err(self.unsupported(span, &what));
                }
                Some(Io::Location(n)) => {
                    let out = format!("{}_out", self.name(func.name));
                    let decl = self.declarator(ret, &out, span)?;
                    globals.push(format!("layout(location = {n}) out {decl};"));
                    Some(out)
                }
                None => return Err(self.unsupported(span, "struct-typed entry point result")),
            },
        };

        if entry.stage == PipelineStage::Compute {
            let [x, y, z] = entry.workgroup_size.unwrap_or([1, 1, 1]);
            globals.push(format!(
                "layout(local_size_x = {x}, local_size_y = {y}, local_size_z = {z}) in;"
            ));
        }
        for line in &globals {
            self.text().line(line);
        }
        if !globals.is_empty() {
            self.text().separate();
        }

        self.text().line("void main() {");
        self.text().increment_indent();
        for line in &copies {
            self.text().line(line);
        }
        self.text().decrement_indent();
        self.output = output;
        let result = self.emit_body(func.body);
        self.output = None;
        self.text().line("}");
        result
    }

    // === Expressions ===

    fn emit_builtin_call(&mut self, builtin: BuiltinFn, args: ExprRange, span: Span) -> EmitResult {
        let program = self.program();
        let list = program.ast().expr_list(args);
        match builtin {
            BuiltinFn::Select => {
                self.write("mix(");
                self.emit_args(args)?;
                self.write(")");
                Ok(())
            }
            BuiltinFn::All | BuiltinFn::Any => {
                let &[arg] = list else {
                    ice!(program.session().ice(), "{builtin} called with {} arguments", list.len());
                };
                // GLSL only defines all/any on vectors.
                if program.types().vector_width(program.sem().expr_type(arg)).is_none() {
                    self.write("(");
                    self.emit_expression(arg)?;
                    self.write(")");
                    return Ok(());
                }
                self.write(builtin.as_str());
                self.write("(");
                self.emit_expression(arg)?;
                self.write(")");
                Ok(())
            }
            BuiltinFn::ArrayLength => {
                let array = match list {
                    &[arg] => match program.ast().expr(arg).kind {
                        ExprKind::Unary {
                            op: UnaryOp::AddressOf,
                            operand,
                        } => operand,
                        _ => return Err(self.unsupported(span, "arrayLength of a pointer value")),
                    },
                    _ => ice!(program.session().ice(), "arrayLength called with {} arguments", list.len()),
                };
                self.write("uint(");
                self.emit_operand(array)?;
                self.write(".length())");
                Ok(())
            }
            BuiltinFn::TextureSample => Err(self.unsupported(span, "textureSample with a separate sampler")),
            _ => {
                let name = match builtin {
                    BuiltinFn::Dpdx => "dFdx",
                    BuiltinFn::Dpdy => "dFdy",
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
}

impl<'p> Printer<'p> for GlslPrinter<'p> {
    fn cx(&self) -> &PrinterContext<'p> {
        &self.cx
    }

    fn cx_mut(&mut self) -> &mut PrinterContext<'p> {
        &mut self.cx
    }

    fn emit_prelude(&mut self) -> EmitResult {
        self.text().line("#version 450");
        let program = self.program();
        let cx = self.cx();
        let extra = program
            .entry_points()
            .iter()
            .filter(|entry| !cx.skips(entry.decl))
            .nth(1);
        if let Some(extra) = extra {
            let span = program.ast().decl(extra.decl).span;
            return Err(self.unsupported(span, "more than one entry point in a module"));
        }
        Ok(())
    }

    // === Declarations ===

    fn emit_struct(&mut self, name: Symbol, members: MemberRange, _ty: TypeId, _span: Span) -> EmitResult {
        let ast = self.program().ast();
        let header = format!("struct {} {{", self.name(name));
        self.text().line(&header);
        self.text().increment_indent();
        let mut result = Ok(());
        for &member in ast.member_list(members) {
            let member = ast.member(member);
            match self.declarator(member.ty, self.name(member.name), member.span) {
                Ok(decl) => self.text().line(&format!("{decl};")),
                Err(err) => result = result.and(Err(err)),
            }
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

        let qualifier = match (var.kind, var.storage) {
            (VarKind::Const, _) => "const ",
            (_, StorageClass::Uniform | StorageClass::Storage) => return self.emit_interface_block(var, ty),
            (_, StorageClass::Handle) => return self.emit_handle(var, ty),
            (_, StorageClass::Workgroup) => "shared ",
            (_, StorageClass::Private) => "",
            (_, StorageClass::None | StorageClass::Function) => ice!(
                program.session().ice(),
                "module-scope variable `{name}` has no address space"
            ),
        };
        let decl = self.declarator(ty, name, var.span)?;
        self.text().indent();
        self.write(qualifier);
        self.write(&decl);
        if let Some(init) = var.init {
            self.write(" = ");
            self.emit_expression(init)?;
        }
        self.write(";\n");
        Ok(())
    }

    fn emit_function(&mut self, id: DeclId, func: &FunctionDecl, span: Span) -> EmitResult {
        let program = self.program();
        if let Some(&entry) = program.sem().entry_point(id) {
            return self.emit_entry_point(entry, func, span);
        }
        let ast = program.ast();
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
            params.push(self.declarator(ty, name, param.span)?);
        }
        let header = format!("{ret} {}({}) {{", self.name(func.name), params.join(", "));
        self.text().line(&header);
        let result = self.emit_body(func.body);
        self.text().line("}");
        result
    }

    /// Aliases are resolved at every use.
    fn emit_alias(&mut self, _name: Symbol, _ty: TypeId, _span: Span) -> EmitResult {
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
        let var = program.ast().var(id);
        let ty = program.sem().var_type(id);
        let decl = self.declarator(ty, self.name(var.name), var.span)?;
        self.text().indent();
        self.write(&decl);
        match var.init {
            Some(init) => {
                self.write(" = ");
                self.emit_expression(init)?;
            }
            None if program.types().scalar_of(ty).is_some() => {
                let name = self.type_name(ty, var.span)?;
                self.write(&format!(" = {name}(0)"));
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

    /// Inside `main`, a returned value is stored to the output first.
    fn emit_return(&mut self, value: Option<ExprId>, _span: Span) -> EmitResult {
        self.text().indent();
        match (self.output.clone(), value) {
            (Some(output), Some(value)) => {
                self.write(&output);
                self.write(" = ");
                self.emit_expression(value)?;
                self.write(";\n");
                self.text().line("return;");
            }
            (_, value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.emit_expression(value)?;
                }
                self.write(";\n");
            }
        }
        Ok(())
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
                Some(text) => text,
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
        let types = self.program().types();
        if args.is_empty() {
            if types.scalar_of(ty).is_none() {
                let what = format!(
                    "zero value of type `{}`",
                    types.friendly_name(ty, self.program().symbols())
                );
                return Err(self.unsupported(span, &what));
            }
            self.emit_type(ty, span)?;
            self.write("(0)");
            return Ok(());
        }
        self.emit_type(ty, span)?;
        self.write("(");
        self.emit_args(args)?;
        self.write(")");
        Ok(())
    }

    fn emit_bitcast(&mut self, ty: TypeId, operand: ExprId, span: Span) -> EmitResult {
        let program = self.program();
        let types = program.types();
        let from = types.scalar_of(program.sem().expr_type(operand));
        let func = match (from, types.scalar_of(ty)) {
            (Some(TypeId::F32), Some(TypeId::I32)) => "floatBitsToInt",
            (Some(TypeId::F32), Some(TypeId::U32)) => "floatBitsToUint",
            (Some(TypeId::I32), Some(TypeId::F32)) => "intBitsToFloat",
            (Some(TypeId::U32), Some(TypeId::F32)) => "uintBitsToFloat",
            (Some(_), Some(_)) => {
                // Same width integers convert bit-exactly.
                self.emit_type(ty, span)?;
                self.write("(");
                self.emit_expression(operand)?;
                self.write(")");
                return Ok(());
            }
            _ => return Err(self.unsupported(span, "bitcast to a non-numeric type")),
        };
        self.write(func);
        self.write("(");
        self.emit_expression(operand)?;
        self.write(")");
        Ok(())
    }
}

impl<'p> CLikePrinter<'p> for GlslPrinter<'p> {
    fn loops(&mut self) -> &mut Vec<Option<StmtRange>> {
        &mut self.loops
    }
}

fn vector_prefix(elem: TypeId) -> &'static str {
    match elem {
        TypeId::BOOL => "b",
        TypeId::I32 => "i",
        TypeId::U32 => "u",
        _ => "",
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

fn texture_name(texture: TextureType) -> String {
    let dim = dim_suffix(texture.dim);
    match texture.kind {
        TextureKind::Sampled(sample) => format!("{}sampler{dim}", vector_prefix(sample)),
        TextureKind::Multisampled(sample) => format!("{}sampler{dim}MS", vector_prefix(sample)),
        TextureKind::Depth => format!("sampler{dim}Shadow"),
        TextureKind::Storage { format, .. } => {
            let prefix = match format {
                TexelFormat::Rgba8Uint | TexelFormat::R32Uint | TexelFormat::Rgba32Uint => "u",
                TexelFormat::Rgba8Sint | TexelFormat::R32Sint | TexelFormat::Rgba32Sint => "i",
                _ => "",
            };
            format!("{prefix}image{dim}")
        }
    }
}

fn format_qualifier(format: TexelFormat) -> &'static str {
    match format {
        TexelFormat::Rgba8Unorm => "rgba8",
        TexelFormat::Rgba8Snorm => "rgba8_snorm",
        TexelFormat::Rgba8Uint => "rgba8ui",
        TexelFormat::Rgba8Sint => "rgba8i",
        TexelFormat::Rgba16Float => "rgba16f",
        TexelFormat::R32Uint => "r32ui",
        TexelFormat::R32Sint => "r32i",
        TexelFormat::R32Float => "r32f",
        TexelFormat::Rg32Float => "rg32f",
        TexelFormat::Rgba32Uint => "rgba32ui",
        TexelFormat::Rgba32Sint => "rgba32i",
        TexelFormat::Rgba32Float => "rgba32f",
    }
}

/// GLSL spelling of a builtin input, converted to the declared type.
fn builtin_input(builtin: Builtin, stage: PipelineStage) -> Option<&'static str> {
    Some(match builtin {
        Builtin::Position if stage == PipelineStage::Fragment => "gl_FragCoord",
        Builtin::VertexIndex => "uint(gl_VertexIndex)",
        Builtin::InstanceIndex => "uint(gl_InstanceIndex)",
        Builtin::FrontFacing => "gl_FrontFacing",
        Builtin::SampleIndex => "uint(gl_SampleID)",
        Builtin::LocalInvocationId => "gl_LocalInvocationID",
        Builtin::LocalInvocationIndex => "gl_LocalInvocationIndex",
        Builtin::GlobalInvocationId => "gl_GlobalInvocationID",
        Builtin::WorkgroupId => "gl_WorkGroupID",
        Builtin::NumWorkgroups => "gl_NumWorkGroups",
        Builtin::Position | Builtin::FragDepth => return None,
    })
}

#[cfg(test)]
mod tests;
