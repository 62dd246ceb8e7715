//! The per-node-kind dispatch table shared by every dialect.
//!
//! [`Printer::emit_declaration`], [`Printer::emit_statement`] and
//! [`Printer::emit_expression`] match exhaustively on the node kind and
//! call one method per kind. Methods whose syntax is the same in every
//! supported dialect (assignment, blocks, `return`, operators, member and
//! index access) have default bodies; everything else is required, so a
//! new dialect is one `impl Printer` against the same resolved program.
//!
//! Emission never stops at the first problem. A statement or declaration
//! that fails leaves its partial text in place, the line is closed, and the
//! next one is emitted. The first error is what the caller gets back.

use lumen_ast::{
    BinaryOp, CaseRange, DeclKind, ExprId, ExprKind, ExprRange, FunctionDecl, Literal,
    MemberRange, StmtId, StmtKind, StmtRange, UnaryOp, VarId,
};
use lumen_diagnostic::{Diagnostic, DiagnosticControl, DiagnosticList, ErrorCode, ErrorGuaranteed};
use lumen_ir::{Access, DeclId, Span, Symbol, TypeId};
use lumen_program::Program;
use lumen_stack::ensure_sufficient_stack;
use lumen_types::{Pool, TypeData};

use crate::{Target, TextGenerator};

/// Result of emitting one node. The error is proof that a diagnostic was
/// recorded on the printer.
pub type EmitResult = Result<(), ErrorGuaranteed>;

/// State every printer carries: the program, the output and the entry
/// point filter.
#[derive(Debug)]
pub struct PrinterContext<'p> {
    program: &'p Program,
    text: TextGenerator,
    target: Target,
    entry_point: Option<DeclId>,
}

impl<'p> PrinterContext<'p> {
    pub fn new(program: &'p Program, target: Target) -> Self {
        PrinterContext {
            program,
            text: TextGenerator::new(program.session().ice().clone()),
            target,
            entry_point: None,
        }
    }

    /// Emit only this entry point; other entry point functions are skipped.
    #[must_use]
    pub fn with_entry_point(mut self, decl: DeclId) -> Self {
        self.entry_point = Some(decl);
        self
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn entry_point(&self) -> Option<DeclId> {
        self.entry_point
    }

    pub fn text(&self) -> &TextGenerator {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextGenerator {
        &mut self.text
    }

    /// Whether `decl` is an entry point other than the selected one.
    pub fn skips(&self, decl: DeclId) -> bool {
        match self.entry_point {
            Some(keep) => decl != keep && self.program.sem().entry_point(decl).is_some(),
            None => false,
        }
    }

    pub fn finish(self) -> (String, DiagnosticList) {
        self.text.finish()
    }
}

pub trait Printer<'p> {
    fn cx(&self) -> &PrinterContext<'p>;

    fn cx_mut(&mut self) -> &mut PrinterContext<'p>;

    // === Accessors ===

    fn program(&self) -> &'p Program {
        self.cx().program()
    }

    fn text<'a>(&'a mut self) -> &'a mut TextGenerator
    where
        'p: 'a,
    {
        self.cx_mut().text_mut()
    }

    fn write(&mut self, text: &str) {
        self.text().write(text);
    }

    fn name(&self, symbol: Symbol) -> &'p str {
        self.program().name(symbol)
    }

    /// Record that the target cannot express `what`.
    fn unsupported(&mut self, span: Span, what: &str) -> ErrorGuaranteed {
        let target = self.cx().target();
        tracing::debug!(%target, what, "unsupported construct");
        self.text().error(
            Diagnostic::error(ErrorCode::E2001)
                .with_message(format!("{what} is not supported by {target}"))
                .with_span(span),
        )
    }

    // === Program ===

    /// Emit every module declaration in order.
    fn emit_program(&mut self) -> EmitResult {
        let program = self.program();
        let mut result = self.emit_prelude();
        for &decl in program.ast().module() {
            if self.cx().skips(decl) {
                continue;
            }
            self.text().separate();
            let emitted = self.emit_declaration(decl);
            if emitted.is_err() {
                self.text().finish_line();
            }
            result = result.and(emitted);
        }
        result
    }

    /// Text ahead of the first declaration.
    fn emit_prelude(&mut self) -> EmitResult {
        Ok(())
    }

    // === Dispatch ===

    fn emit_declaration(&mut self, id: DeclId) -> EmitResult {
        let decl = self.program().ast().decl(id);
        match decl.kind {
            DeclKind::Struct { name, members, ty } => self.emit_struct(name, members, ty, decl.span),
            DeclKind::GlobalVar(var) => self.emit_global_var(var),
            DeclKind::Function(ref func) => self.emit_function(id, func, decl.span),
            DeclKind::Alias { name, ty } => self.emit_alias(name, ty, decl.span),
            DeclKind::DiagnosticDirective(control) => self.emit_diagnostic_directive(control),
        }
    }

    fn emit_statement(&mut self, id: StmtId) -> EmitResult {
        ensure_sufficient_stack(|| {
            let stmt = self.program().ast().stmt(id);
            let result = match stmt.kind {
                StmtKind::Assign { lhs, rhs } => self.emit_assign(lhs, rhs),
                StmtKind::VarDecl(var) => self.emit_local(var),
                StmtKind::Block(body) => self.emit_block(body),
                StmtKind::If {
                    cond,
                    body,
                    else_stmt,
                } => self.emit_if(cond, body, else_stmt),
                StmtKind::Loop { body, continuing } => self.emit_loop(body, continuing),
                StmtKind::Switch { cond, cases } => self.emit_switch(cond, cases),
                StmtKind::Return(value) => self.emit_return(value, stmt.span),
                StmtKind::Break => self.emit_break(),
                StmtKind::Continue => self.emit_continue(),
                StmtKind::Discard => self.emit_discard(),
                StmtKind::Call(call) => self.emit_call_statement(call),
            };
            if result.is_err() {
                self.text().finish_line();
            }
            result
        })
    }

    fn emit_expression(&mut self, id: ExprId) -> EmitResult {
        ensure_sufficient_stack(|| {
            let expr = self.program().ast().expr(id);
            match expr.kind {
                ExprKind::Literal(lit) => self.emit_literal(lit, expr.span),
                ExprKind::Ident(symbol) => self.emit_ident(symbol),
                ExprKind::Unary { op, operand } => self.emit_unary(op, operand, expr.span),
                ExprKind::Binary { op, lhs, rhs } => self.emit_binary(op, lhs, rhs),
                ExprKind::Call { callee, args } => self.emit_call(id, callee, args, expr.span),
                ExprKind::TypeConstructor { ty, args } => self.emit_constructor(ty, args, expr.span),
                ExprKind::Member { object, member } => self.emit_member(object, member),
                ExprKind::Index { object, index } => self.emit_index(object, index),
                ExprKind::Bitcast { ty, operand } => self.emit_bitcast(ty, operand, expr.span),
            }
        })
    }

    // === Declarations (dialect-specific) ===

    fn emit_struct(&mut self, name: Symbol, members: MemberRange, ty: TypeId, span: Span) -> EmitResult;

    fn emit_global_var(&mut self, var: VarId) -> EmitResult;

    fn emit_function(&mut self, id: DeclId, func: &FunctionDecl, span: Span) -> EmitResult;

    fn emit_alias(&mut self, name: Symbol, ty: TypeId, span: Span) -> EmitResult;

    fn emit_diagnostic_directive(&mut self, control: DiagnosticControl) -> EmitResult;

    /// Spelling of a type in type position.
    fn emit_type(&mut self, ty: TypeId, span: Span) -> EmitResult;

    // === Statements ===

    fn emit_local(&mut self, var: VarId) -> EmitResult;

    fn emit_if(&mut self, cond: ExprId, body: StmtRange, else_stmt: Option<StmtId>) -> EmitResult;

    fn emit_loop(&mut self, body: StmtRange, continuing: Option<StmtRange>) -> EmitResult;

    fn emit_switch(&mut self, cond: ExprId, cases: CaseRange) -> EmitResult;

    /// `lhs = rhs;` at the current indentation.
    fn emit_assign(&mut self, lhs: ExprId, rhs: ExprId) -> EmitResult {
        self.text().indent();
        self.emit_expression(lhs)?;
        self.write(" = ");
        self.emit_expression(rhs)?;
        self.write(";\n");
        Ok(())
    }

    fn emit_block(&mut self, body: StmtRange) -> EmitResult {
        self.text().line("{");
        let result = self.emit_body(body);
        self.text().line("}");
        result
    }

    /// Statements of `body`, one level deeper.
    fn emit_body(&mut self, body: StmtRange) -> EmitResult {
        let program = self.program();
        self.text().increment_indent();
        let mut result = Ok(());
        for &stmt in program.ast().stmt_list(body) {
            result = result.and(self.emit_statement(stmt));
        }
        self.text().decrement_indent();
        result
    }

    fn emit_return(&mut self, value: Option<ExprId>, _span: Span) -> EmitResult {
        self.text().indent();
        self.write("return");
        if let Some(value) = value {
            self.write(" ");
            self.emit_expression(value)?;
        }
        self.write(";\n");
        Ok(())
    }

    fn emit_break(&mut self) -> EmitResult {
        self.text().line("break;");
        Ok(())
    }

    fn emit_continue(&mut self) -> EmitResult {
        self.text().line("continue;");
        Ok(())
    }

    fn emit_discard(&mut self) -> EmitResult {
        self.text().line("discard;");
        Ok(())
    }

    fn emit_call_statement(&mut self, call: ExprId) -> EmitResult {
        self.text().indent();
        self.emit_expression(call)?;
        self.write(";\n");
        Ok(())
    }

    // === Expressions ===

    fn emit_literal(&mut self, lit: Literal, span: Span) -> EmitResult;

    fn emit_call(&mut self, expr: ExprId, callee: Symbol, args: ExprRange, span: Span) -> EmitResult;

    fn emit_constructor(&mut self, ty: TypeId, args: ExprRange, span: Span) -> EmitResult;

    fn emit_bitcast(&mut self, ty: TypeId, operand: ExprId, span: Span) -> EmitResult;

    fn emit_ident(&mut self, symbol: Symbol) -> EmitResult {
        let name = self.name(symbol);
        self.write(name);
        Ok(())
    }

    fn emit_unary(&mut self, op: UnaryOp, operand: ExprId, _span: Span) -> EmitResult {
        self.write(op.as_symbol());
        self.emit_operand(operand)
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> EmitResult {
        self.emit_operand(lhs)?;
        self.write(" ");
        self.write(op.as_symbol());
        self.write(" ");
        self.emit_operand(rhs)
    }

    fn emit_member(&mut self, object: ExprId, member: Symbol) -> EmitResult {
        self.emit_operand(object)?;
        self.write(".");
        let name = self.name(member);
        self.write(name);
        Ok(())
    }

    fn emit_index(&mut self, object: ExprId, index: ExprId) -> EmitResult {
        self.emit_operand(object)?;
        self.write("[");
        self.emit_expression(index)?;
        self.write("]");
        Ok(())
    }

    /// An operand of an operator or accessor. Operator expressions are
    /// parenthesized so precedence never has to be reconstructed, and so are
    /// negative literals, whose sign would otherwise fuse with a preceding
    /// `-` into `--`.
    fn emit_operand(&mut self, id: ExprId) -> EmitResult {
        let nested = match self.program().ast().expr(id).kind {
            ExprKind::Unary { .. } | ExprKind::Binary { .. } => true,
            ExprKind::Literal(Literal::I32(value)) => value < 0,
            ExprKind::Literal(Literal::F32(bits)) => f32::from_bits(bits).is_sign_negative(),
            _ => false,
        };
        if nested {
            self.write("(");
            self.emit_expression(id)?;
            self.write(")");
            Ok(())
        } else {
            self.emit_expression(id)
        }
    }

    /// Comma-separated arguments, without the parentheses.
    fn emit_args(&mut self, args: ExprRange) -> EmitResult {
        let program = self.program();
        for (i, &arg) in program.ast().expr_list(args).iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expression(arg)?;
        }
        Ok(())
    }
}

/// `if` with its `else if` / `else` chain. `open` and `close` surround the
/// condition, e.g. `"if ("` and `") {"`.
pub(crate) fn emit_if_chain<'p, P: Printer<'p> + ?Sized>(
    printer: &mut P,
    cond: ExprId,
    body: StmtRange,
    else_stmt: Option<StmtId>,
    open: &str,
    close: &str,
) -> EmitResult {
    let ast = printer.program().ast();
    printer.text().indent();
    printer.write(open);
    printer.emit_expression(cond)?;
    printer.write(close);
    printer.text().newline();
    let mut result = printer.emit_body(body);

    let mut next = else_stmt;
    while let Some(stmt) = next {
        next = None;
        printer.text().indent();
        match ast.stmt(stmt).kind {
            StmtKind::If {
                cond,
                body,
                else_stmt,
            } => {
                printer.write("} else ");
                printer.write(open);
                printer.emit_expression(cond)?;
                printer.write(close);
                printer.text().newline();
                result = result.and(printer.emit_body(body));
                next = else_stmt;
            }
            StmtKind::Block(body) => {
                printer.write("} else {\n");
                result = result.and(printer.emit_body(body));
            }
            _ => {
                printer.write("} else {\n");
                printer.text().increment_indent();
                result = result.and(printer.emit_statement(stmt));
                printer.text().decrement_indent();
            }
        }
    }
    printer.text().line("}");
    result
}

/// Decimal spelling of a float that every dialect accepts, or `None` for
/// infinities and NaN.
pub(crate) fn float_text(value: f32) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    // Debug keeps a fractional part or an exponent: `1.0`, `1e-7`.
    Some(format!("{value:?}"))
}

/// Access mode of a storage buffer type; `read` unless wrapped in access
/// control.
pub(crate) fn storage_access(types: &Pool, ty: TypeId) -> Access {
    match *types.data(types.unwrap_alias(ty)) {
        TypeData::AccessControl { access, .. } => access,
        _ => Access::Read,
    }
}
