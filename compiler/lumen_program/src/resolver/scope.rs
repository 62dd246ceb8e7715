//! Lexical scopes for local variables.

use lumen_ast::VarId;
use lumen_ir::Symbol;
use rustc_hash::FxHashMap;

/// Stack of block scopes inside one function.
///
/// Module-scope names live in the resolver's module table; this only holds
/// parameters and locals.
#[derive(Default, Debug)]
pub(super) struct Scopes {
    frames: Vec<FxHashMap<Symbol, VarId>>,
}

impl Scopes {
    pub(super) fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub(super) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Bind `name` in the innermost scope.
    ///
    /// Returns the previous binding if `name` was already declared in that
    /// same scope. Shadowing an outer scope is allowed.
    pub(super) fn declare(&mut self, name: Symbol, var: VarId) -> Option<VarId> {
        let frame = self.frames.last_mut()?;
        match frame.get(&name) {
            Some(&prev) => Some(prev),
            None => {
                frame.insert(name, var);
                None
            }
        }
    }

    pub(super) fn lookup(&self, name: Symbol) -> Option<VarId> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name).copied())
    }

    pub(super) fn clear(&mut self) {
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests;
