//! Resolved programs.

use std::sync::Arc;

use lumen_ast::{Ast, FunctionDecl};
use lumen_diagnostic::{ice, render, Diagnostic, DiagnosticList};
use lumen_ir::{DeclId, GenerationId, Source, Symbol, SymbolTable};
use lumen_types::Pool;

use crate::{CloneContext, EntryPoint, ProgramBuilder, Sem, Session};

/// One generation's symbols, types, AST and diagnostics, after semantic
/// analysis.
///
/// A program is the unit of input to every backend. Backends read it and
/// never insert nodes or types; transforms clone it into a new builder
/// instead.
///
/// Validity is monotonic: once an error diagnostic is recorded the program
/// stays invalid.
pub struct Program {
    session: Session,
    generation: GenerationId,
    symbols: SymbolTable,
    types: Pool,
    ast: Ast,
    sem: Sem,
    diagnostics: DiagnosticList,
    source: Option<Arc<Source>>,
}

impl Program {
    #[expect(clippy::too_many_arguments, reason = "one argument per field, called from build() only")]
    pub(crate) fn new(
        session: Session,
        generation: GenerationId,
        symbols: SymbolTable,
        types: Pool,
        ast: Ast,
        sem: Sem,
        diagnostics: DiagnosticList,
        source: Option<Arc<Source>>,
    ) -> Self {
        Program {
            session,
            generation,
            symbols,
            types,
            ast,
            sem,
            diagnostics,
            source,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn types(&self) -> &Pool {
        &self.types
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn sem(&self) -> &Sem {
        &self.sem
    }

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn source(&self) -> Option<&Arc<Source>> {
        self.source.as_ref()
    }

    /// True until the first error diagnostic is recorded.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.contains_errors()
    }

    /// Append a diagnostic found after construction.
    pub fn push_diagnostic(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    /// Spelling of a symbol of this program.
    ///
    /// A symbol from another generation is an internal compiler error.
    pub fn name(&self, symbol: Symbol) -> &str {
        match self.symbols.name_for(symbol) {
            Some(name) => name,
            None => ice!(
                self.session.ice(),
                "symbol {symbol:?} used with program of generation {:?}",
                self.generation
            ),
        }
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        self.sem.entry_points()
    }

    /// Module function with the given spelling.
    pub fn find_function(&self, name: &str) -> Option<(DeclId, &FunctionDecl)> {
        let symbol = self.symbols.get(name)?;
        self.ast.functions().find(|(_, func)| func.name == symbol)
    }

    /// All diagnostics as text, located against the source if one is
    /// attached.
    pub fn render_diagnostics(&self) -> String {
        render::render_list(&self.diagnostics, self.source.as_deref())
    }

    /// Deep-copy into a fresh generation and resolve the copy.
    ///
    /// Diagnostics pushed after construction are not carried over; the
    /// copy's diagnostics come from resolving it again.
    #[tracing::instrument(level = "debug", skip_all, fields(generation = ?self.generation))]
    pub fn duplicate(&self) -> Program {
        let mut builder = ProgramBuilder::new(&self.session);
        if let Some(source) = &self.source {
            builder = builder.with_source(Arc::clone(source));
        }
        CloneContext::new(self, &mut builder).clone_all();
        builder.build()
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("generation", &self.generation)
            .field("decls", &self.ast.module().len())
            .field("types", &self.types.len())
            .field("diagnostics", &self.diagnostics.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
