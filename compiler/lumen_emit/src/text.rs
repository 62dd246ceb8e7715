//! Indented text output.

use lumen_diagnostic::{ice, Diagnostic, DiagnosticList, ErrorGuaranteed, IceHandler};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 2;

/// Output buffer of one printer invocation.
///
/// Indentation is explicit: nothing here indents on its own, callers bump
/// the level around nested bodies. Emission diagnostics are kept alongside
/// the text and never touch the program being printed.
#[derive(Debug)]
pub struct TextGenerator {
    buffer: String,
    indent: usize,
    /// A blank line is owed before the next text.
    separate: bool,
    diagnostics: DiagnosticList,
    ice: IceHandler,
}

impl TextGenerator {
    pub fn new(ice: IceHandler) -> Self {
        TextGenerator {
            buffer: String::new(),
            indent: 0,
            separate: false,
            diagnostics: DiagnosticList::new(),
            ice,
        }
    }

    // === Indentation ===

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn increment_indent(&mut self) {
        self.indent += 1;
    }

    /// # Panics
    /// Raises an internal compiler error when the level is already zero.
    pub fn decrement_indent(&mut self) {
        if self.indent == 0 {
            ice!(self.ice, "indentation decremented below zero");
        }
        self.indent -= 1;
    }

    // === Writing ===

    pub fn write(&mut self, text: &str) {
        self.flush_separator();
        self.buffer.push_str(text);
    }

    /// Write the current indentation.
    pub fn indent(&mut self) {
        self.flush_separator();
        let spaces = self.indent * INDENT_WIDTH;
        for _ in 0..spaces {
            self.buffer.push(' ');
        }
    }

    pub fn newline(&mut self) {
        self.flush_separator();
        self.buffer.push('\n');
    }

    /// Put a blank line before the next text, if any text follows and
    /// something was written before.
    pub fn separate(&mut self) {
        self.separate = !self.buffer.is_empty();
    }

    fn flush_separator(&mut self) {
        if std::mem::take(&mut self.separate) {
            self.buffer.push('\n');
        }
    }

    /// Write one indented line.
    pub fn line(&mut self, text: &str) {
        self.indent();
        self.write(text);
        self.newline();
    }

    /// Terminate a line left open by a failed emission.
    pub fn finish_line(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.newline();
        }
    }

    pub fn output(&self) -> &str {
        &self.buffer
    }

    // === Diagnostics ===

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.diagnostics.emit_error(diag)
    }

    pub fn push_diagnostic(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn ice(&self) -> &IceHandler {
        &self.ice
    }

    /// Split into text and diagnostics.
    pub fn finish(self) -> (String, DiagnosticList) {
        (self.buffer, self.diagnostics)
    }
}
