//! Interned identifiers scoped to one program generation.
//!
//! A `Symbol` is a small `Copy` token standing for a spelled identifier.
//! Within one `SymbolTable` equal spellings always map to the same symbol.
//! Symbols remember their generation, so a table refuses to resolve a
//! symbol minted by a different program.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::GenerationId;

/// Interned identifier token.
///
/// Layout: 8 bytes, generation + local index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Symbol {
    generation: GenerationId,
    id: u32,
}

impl Symbol {
    /// The null symbol. Never returned by a symbol table.
    pub const INVALID: Symbol = Symbol {
        generation: GenerationId::NONE,
        id: u32::MAX,
    };

    /// Generation that minted this symbol.
    #[inline]
    pub const fn generation(self) -> GenerationId {
        self.generation
    }

    /// Index within the owning table.
    #[inline]
    pub const fn index(self) -> usize {
        self.id as usize
    }

    /// Check if this is a real symbol.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.id != u32::MAX
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Symbol({}, {:?})", self.id, self.generation)
        } else {
            write!(f, "Symbol::INVALID")
        }
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Per-generation identifier interner.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    generation: GenerationId,
    map: FxHashMap<String, u32>,
    names: Vec<String>,
}

impl SymbolTable {
    /// Create an empty table for `generation`.
    pub fn new(generation: GenerationId) -> Self {
        SymbolTable {
            generation,
            map: FxHashMap::default(),
            names: Vec::new(),
        }
    }

    /// Generation this table belongs to.
    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    /// Intern `name`, returning the existing symbol if it was seen before.
    ///
    /// `None` once the table holds `u32::MAX - 1` names.
    pub fn register(&mut self, name: &str) -> Option<Symbol> {
        if let Some(&id) = self.map.get(name) {
            return Some(self.symbol(id));
        }
        let id = u32::try_from(self.names.len()).ok().filter(|&id| id != u32::MAX)?;
        self.names.push(name.to_owned());
        self.map.insert(name.to_owned(), id);
        Some(self.symbol(id))
    }

    /// Look up a previously registered name.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).map(|&id| self.symbol(id))
    }

    /// Spelling of `symbol`, or `None` if it belongs to another generation.
    pub fn name_for(&self, symbol: Symbol) -> Option<&str> {
        if symbol.generation != self.generation {
            return None;
        }
        self.names.get(symbol.index()).map(String::as_str)
    }

    /// Check whether `symbol` was minted by this table.
    pub fn owns(&self, symbol: Symbol) -> bool {
        symbol.generation == self.generation && symbol.index() < self.names.len()
    }

    /// Register a fresh name derived from `prefix` that is not yet in use.
    ///
    /// Tries `prefix` first, then `prefix_1`, `prefix_2`, ...
    pub fn new_unique(&mut self, prefix: &str) -> Option<Symbol> {
        if !self.map.contains_key(prefix) {
            return self.register(prefix);
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{prefix}_{suffix}");
            if !self.map.contains_key(&candidate) {
                return self.register(&candidate);
            }
            suffix += 1;
        }
    }

    /// Every interned symbol with its spelling, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.names.iter().enumerate().map(|(idx, name)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "register() refuses to grow past u32::MAX"
            )]
            let id = idx as u32;
            (self.symbol(id), name.as_str())
        })
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn symbol(&self, id: u32) -> Symbol {
        Symbol {
            generation: self.generation,
            id,
        }
    }
}

#[cfg(test)]
mod tests;
