//! Control flow shared by the C-family dialects (HLSL and GLSL).
//!
//! Neither dialect has a `continuing` block. A loop becomes `while (true)`;
//! the continuing statements are emitted at the end of the body and again
//! before every `continue` that targets the loop. Switch cases get an
//! explicit `break;` since C cases fall through.

use lumen_ast::{Ast, CaseRange, ExprId, StmtId, StmtRange};

use crate::printer::emit_if_chain;
use crate::{EmitResult, Printer};

/// Whether the last statement of `body` leaves the block.
fn ends_with_terminator(ast: &Ast, body: StmtRange) -> bool {
    ast.stmt_list(body)
        .last()
        .is_some_and(|&stmt| ast.stmt(stmt).kind.is_terminator())
}

pub(crate) trait CLikePrinter<'p>: Printer<'p> {
    /// Continuing block of each enclosing loop, innermost last.
    fn loops(&mut self) -> &mut Vec<Option<StmtRange>>;

    fn c_if(&mut self, cond: ExprId, body: StmtRange, else_stmt: Option<StmtId>) -> EmitResult {
        emit_if_chain(self, cond, body, else_stmt, "if (", ") {")
    }

    fn c_loop(&mut self, body: StmtRange, continuing: Option<StmtRange>) -> EmitResult {
        let ast = self.program().ast();
        self.text().line("while (true) {");
        self.loops().push(continuing);
        let mut result = self.emit_body(body);
        if let Some(continuing) = continuing {
            if !ends_with_terminator(ast, body) {
                result = result.and(self.emit_body(continuing));
            }
        }
        self.loops().pop();
        self.text().line("}");
        result
    }

    fn c_continue(&mut self) -> EmitResult {
        let ast = self.program().ast();
        let mut result = Ok(());
        if let Some(continuing) = self.loops().last().copied().flatten() {
            for &stmt in ast.stmt_list(continuing) {
                result = result.and(self.emit_statement(stmt));
            }
        }
        self.text().line("continue;");
        result
    }

    fn c_switch(&mut self, cond: ExprId, cases: CaseRange) -> EmitResult {
        let ast = self.program().ast();
        self.text().indent();
        self.write("switch (");
        self.emit_expression(cond)?;
        self.write(") {\n");
        self.text().increment_indent();

        let mut result = Ok(());
        for &case in ast.case_list(cases) {
            let case = ast.case(case);
            let selectors = ast.selector_list(case.selectors);
            for (i, &selector) in selectors.iter().enumerate() {
                self.text().indent();
                match ast.selector(selector).expr {
                    Some(expr) => {
                        self.write("case ");
                        result = result.and(self.emit_expression(expr));
                        self.write(":");
                    }
                    None => self.write("default:"),
                }
                if i + 1 == selectors.len() {
                    self.write(" {");
                }
                self.text().newline();
            }
            result = result.and(self.emit_body(case.body));
            if !ends_with_terminator(ast, case.body) {
                self.text().increment_indent();
                self.text().line("break;");
                self.text().decrement_indent();
            }
            self.text().line("}");
        }

        self.text().decrement_indent();
        self.text().line("}");
        result
    }
}
