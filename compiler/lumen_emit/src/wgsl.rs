//! WGSL output.
//!
//! Every node kind has a WGSL spelling, so this printer never reports an
//! unsupported construct except for non-finite float literals.

use lumen_ast::{
    AttrKind, AttrRange, CaseRange, ExprId, ExprRange, FunctionDecl, Literal, MemberRange, SelectorId,
    StmtId, StmtRange, VarId, VarKind, Variable,
};
use lumen_diagnostic::{ice, DiagnosticControl};
use lumen_ir::{Access, DeclId, Span, StorageClass, Symbol, TypeId};
use lumen_types::TypeData;

use crate::printer::{emit_if_chain, float_text, storage_access};
use crate::{EmitResult, Printer, PrinterContext};

pub struct WgslPrinter<'p> {
    cx: PrinterContext<'p>,
}

impl<'p> WgslPrinter<'p> {
    pub fn new(cx: PrinterContext<'p>) -> Self {
        WgslPrinter { cx }
    }

    pub fn into_context(self) -> PrinterContext<'p> {
        self.cx
    }

    fn attr_text(&self, kind: &AttrKind) -> String {
        match kind {
            AttrKind::Stage(stage) => format!("@{stage}"),
            AttrKind::WorkgroupSize(x, y, z) => format!("@workgroup_size({x}, {y}, {z})"),
            AttrKind::Location(n) => format!("@location({n})"),
            AttrKind::Builtin(builtin) => format!("@builtin({})", builtin.as_str()),
            AttrKind::Group(n) => format!("@group({n})"),
            AttrKind::Binding(n) => format!("@binding({n})"),
            AttrKind::Diagnostic(control) => {
                format!("@diagnostic({}, {})", control.severity, self.name(control.rule_name))
            }
        }
    }

    /// Every attribute of `attrs`, each followed by `sep`.
    fn write_attrs(&mut self, attrs: AttrRange, sep: &str) {
        let ast = self.program().ast();
        for &attr in ast.attr_list(attrs) {
            let text = self.attr_text(&ast.attr(attr).kind);
            self.write(&text);
            self.write(sep);
        }
    }

    /// `var<...>`, `let` or `const`.
    fn var_keyword(&self, var: &Variable) -> String {
        match var.kind {
            VarKind::Let => "let".to_owned(),
            VarKind::Const => "const".to_owned(),
            VarKind::Var => match var.storage {
                StorageClass::Private | StorageClass::Workgroup | StorageClass::Uniform => {
                    format!("var<{}>", var.storage)
                }
                StorageClass::Storage => {
                    let access = var.ty.map_or(Access::Read, |ty| storage_access(self.program().types(), ty));
                    format!("var<storage, {access}>")
                }
                StorageClass::None | StorageClass::Function | StorageClass::Handle => "var".to_owned(),
            },
            VarKind::Param => ice!(
                self.program().session().ice(),
                "parameter `{}` emitted as a variable",
                self.name(var.name)
            ),
        }
    }

    /// `kind name[: T][ = init];` without indentation or attributes.
    fn emit_var_tail(&mut self, var: &Variable) -> EmitResult {
        let keyword = self.var_keyword(var);
        self.write(&keyword);
        self.write(" ");
        let name = self.name(var.name);
        self.write(name);
        if let Some(ty) = var.ty {
            self.write(": ");
            self.emit_type(ty, var.span)?;
        }
        if let Some(init) = var.init {
            self.write(" = ");
            self.emit_expression(init)?;
        }
        self.write(";\n");
        Ok(())
    }
}

impl<'p> Printer<'p> for WgslPrinter<'p> {
    fn cx(&self) -> &PrinterContext<'p> {
        &self.cx
    }

    fn cx_mut(&mut self) -> &mut PrinterContext<'p> {
        &mut self.cx
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
            self.text().indent();
            self.write_attrs(member.attrs, " ");
            let name = self.name(member.name);
            self.write(name);
            self.write(": ");
            result = result.and(self.emit_type(member.ty, member.span));
            self.write(",\n");
        }
        self.text().decrement_indent();
        self.text().line("}");
        result
    }

    fn emit_global_var(&mut self, var: VarId) -> EmitResult {
        let var = self.program().ast().var(var);
        self.text().indent();
        self.write_attrs(var.attrs, " ");
        self.emit_var_tail(var)
    }

    fn emit_function(&mut self, _id: DeclId, func: &FunctionDecl, span: Span) -> EmitResult {
        let ast = self.program().ast();
        if !func.attrs.is_empty() {
            self.text().indent();
            let attrs: Vec<String> = ast
                .attr_list(func.attrs)
                .iter()
                .map(|&attr| self.attr_text(&ast.attr(attr).kind))
                .collect();
            self.write(&attrs.join(" "));
            self.text().newline();
        }

        self.text().indent();
        self.write("fn ");
        let name = self.name(func.name);
        self.write(name);
        self.write("(");
        for (i, &param) in ast.var_list(func.params).iter().enumerate() {
            let param = ast.var(param);
            if i > 0 {
                self.write(", ");
            }
            self.write_attrs(param.attrs, " ");
            let name = self.name(param.name);
            self.write(name);
            self.write(": ");
            match param.ty {
                Some(ty) => self.emit_type(ty, param.span)?,
                None => ice!(self.program().session().ice(), "parameter `{name}` has no type"),
            }
        }
        self.write(")");
        if let Some(ret) = func.return_type {
            self.write(" -> ");
            self.write_attrs(func.return_attrs, " ");
            self.emit_type(ret, span)?;
        }
        self.write(" {\n");
        let result = self.emit_body(func.body);
        self.text().line("}");
        result
    }

    fn emit_alias(&mut self, name: Symbol, ty: TypeId, span: Span) -> EmitResult {
        let types = self.program().types();
        let TypeData::Alias { target, .. } = *types.data(ty) else {
            ice!(types.ice(), "alias declaration carries a non-alias type {ty:?}");
        };
        self.text().indent();
        self.write("alias ");
        let name = self.name(name);
        self.write(name);
        self.write(" = ");
        self.emit_type(target, span)?;
        self.write(";\n");
        Ok(())
    }

    fn emit_diagnostic_directive(&mut self, control: DiagnosticControl) -> EmitResult {
        let line = format!("diagnostic({}, {});", control.severity, self.name(control.rule_name));
        self.text().line(&line);
        Ok(())
    }

    fn emit_type(&mut self, ty: TypeId, _span: Span) -> EmitResult {
        let program = self.program();
        let types = program.types();
        // The access mode of a storage buffer is spelled on the `var`.
        let ty = match *types.data(ty) {
            TypeData::AccessControl { inner, .. } => inner,
            _ => ty,
        };
        let name = types.friendly_name(ty, program.symbols());
        self.write(&name);
        Ok(())
    }

    // === Statements ===

    fn emit_local(&mut self, var: VarId) -> EmitResult {
        let var = self.program().ast().var(var);
        self.text().indent();
        self.emit_var_tail(var)
    }

    fn emit_if(&mut self, cond: ExprId, body: StmtRange, else_stmt: Option<StmtId>) -> EmitResult {
        emit_if_chain(self, cond, body, else_stmt, "if ", " {")
    }

    fn emit_loop(&mut self, body: StmtRange, continuing: Option<StmtRange>) -> EmitResult {
        self.text().line("loop {");
        let mut result = self.emit_body(body);
        if let Some(continuing) = continuing {
            self.text().increment_indent();
            self.text().line("continuing {");
            result = result.and(self.emit_body(continuing));
            self.text().line("}");
            self.text().decrement_indent();
        }
        self.text().line("}");
        result
    }

    fn emit_switch(&mut self, cond: ExprId, cases: CaseRange) -> EmitResult {
        let ast = self.program().ast();
        self.text().indent();
        self.write("switch ");
        self.emit_expression(cond)?;
        self.write(" {\n");
        self.text().increment_indent();
        let mut result = Ok(());
        for &case in ast.case_list(cases) {
            let case = ast.case(case);
            let selectors = ast.selector_list(case.selectors);
            self.text().indent();
            let only_default = matches!(selectors, [only] if ast.selector(*only).expr.is_none());
            if only_default {
                self.write("default");
            } else {
                self.write("case ");
                result = result.and(self.emit_selector_list(selectors));
            }
            self.write(": {\n");
            result = result.and(self.emit_body(case.body));
            self.text().line("}");
        }
        self.text().decrement_indent();
        self.text().line("}");
        result
    }

    // === Expressions ===

    fn emit_literal(&mut self, lit: Literal, span: Span) -> EmitResult {
        let text = match lit {
            Literal::Bool(value) => value.to_string(),
            // `2147483648` does not fit the literal type, so it cannot be negated.
            Literal::I32(i32::MIN) => "(-2147483647i - 1i)".to_owned(),
            Literal::I32(value) => format!("{value}i"),
            Literal::U32(value) => format!("{value}u"),
            Literal::F32(bits) => match float_text(f32::from_bits(bits)) {
                Some(text) => format!("{text}f"),
                None => return Err(self.unsupported(span, "a non-finite float literal")),
            },
        };
        self.write(&text);
        Ok(())
    }

    fn emit_call(&mut self, _expr: ExprId, callee: Symbol, args: ExprRange, _span: Span) -> EmitResult {
        let name = self.name(callee);
        self.write(name);
        self.write("(");
        self.emit_args(args)?;
        self.write(")");
        Ok(())
    }

    fn emit_constructor(&mut self, ty: TypeId, args: ExprRange, span: Span) -> EmitResult {
        self.emit_type(ty, span)?;
        self.write("(");
        self.emit_args(args)?;
        self.write(")");
        Ok(())
    }

    fn emit_bitcast(&mut self, ty: TypeId, operand: ExprId, span: Span) -> EmitResult {
        self.write("bitcast<");
        self.emit_type(ty, span)?;
        self.write(">(");
        self.emit_expression(operand)?;
        self.write(")");
        Ok(())
    }
}

impl WgslPrinter<'_> {
    /// `1i, 2i, default` for one case clause.
    fn emit_selector_list(&mut self, selectors: &[SelectorId]) -> EmitResult {
        let ast = self.program().ast();
        for (i, &selector) in selectors.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match ast.selector(selector).expr {
                Some(expr) => self.emit_expression(expr)?,
                None => self.write("default"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
