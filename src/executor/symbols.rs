//! Symbol table
//!
//! A fixed-capacity, append-only array. Every symbol records the scope depth
//! it was created at; depth 0 is global. There is no environment chain:
//! a call bumps the depth, binds its parameters at the end of the table and
//! truncates back to its watermark on return.

use super::errors::{self, Fault};
use super::types::{NameList, StmtId, Val};
use super::vm::VM;
use crate::arena::StrId;

/// Native function callable from scripts
///
/// Arguments are popped from the VM value stack (last argument first) and at
/// most one result is pushed with `push_int` / `push_string`.
pub type NativeFn = fn(&mut VM) -> Result<(), Fault>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    /// Negative counts mark a variadic function
    pub fn from_count(count: i32) -> Self {
        if count < 0 {
            Arity::Variadic
        } else {
            Arity::Fixed(count as usize)
        }
    }

    pub fn accepts(&self, argc: usize) -> bool {
        match self {
            Arity::Fixed(n) => *n == argc,
            Arity::Variadic => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SymbolKind {
    Function { params: NameList, body: StmtId },
    Native { func: NativeFn, arity: Arity },
    Int(i32),
    Str(StrId),
}

impl SymbolKind {
    pub fn from_value(value: Val) -> Self {
        match value {
            Val::Int(n) => SymbolKind::Int(n),
            Val::Str(s) => SymbolKind::Str(s),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, SymbolKind::Int(_) | SymbolKind::Str(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    pub name: StrId,
    pub kind: SymbolKind,
    pub depth: usize,
}

impl Symbol {
    /// Current value, for variables only
    pub fn value(&self) -> Option<Val> {
        match self.kind {
            SymbolKind::Int(n) => Some(Val::Int(n)),
            SymbolKind::Str(s) => Some(Val::Str(s)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    capacity: usize,
    depth: usize,
}

impl SymbolTable {
    pub fn new(capacity: usize) -> Self {
        SymbolTable {
            symbols: Vec::with_capacity(capacity),
            capacity,
            depth: 0,
        }
    }

    /// Append a symbol at the current depth
    pub fn create(&mut self, name: StrId, kind: SymbolKind) -> Result<usize, Fault> {
        if self.symbols.len() >= self.capacity {
            return Err(Fault::runtime(
                errors::SYMBOL_TABLE_FULL,
                format!("Symbol table full ({} symbols)", self.capacity),
            ));
        }
        self.symbols.push(Symbol {
            name,
            kind,
            depth: self.depth,
        });
        Ok(self.symbols.len() - 1)
    }

    /// Most recent symbol named `name` that is global or belongs to the
    /// current depth
    pub fn lookup(&self, name: StrId) -> Option<usize> {
        self.symbols
            .iter()
            .rposition(|s| s.name == name && (s.depth == 0 || s.depth == self.depth))
    }

    /// Most recent symbol named `name` created at exactly the current depth
    pub fn lookup_local(&self, name: StrId) -> Option<usize> {
        self.symbols
            .iter()
            .rposition(|s| s.name == name && s.depth == self.depth)
    }

    /// Overwrite the symbol visible at the current depth, or create one
    pub fn define(&mut self, name: StrId, kind: SymbolKind) -> Result<usize, Fault> {
        match self.lookup_local(name) {
            Some(id) => {
                self.symbols[id].kind = kind;
                Ok(id)
            }
            None => self.create(name, kind),
        }
    }

    pub fn get(&self, id: usize) -> &Symbol {
        &self.symbols[id]
    }

    pub fn get_mut(&mut self, id: usize) -> &mut Symbol {
        &mut self.symbols[id]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Drop every symbol created after `mark`
    pub fn truncate(&mut self, mark: usize) {
        self.symbols.truncate(mark);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    pub fn leave_scope(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
        self.depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::StringStore;

    fn names(store: &mut StringStore) -> (StrId, StrId) {
        (store.intern("x").unwrap(), store.intern("y").unwrap())
    }

    #[test]
    fn test_lookup_prefers_latest() {
        let mut store = StringStore::with_capacity(64);
        let (x, _) = names(&mut store);
        let mut table = SymbolTable::new(8);

        table.create(x, SymbolKind::Int(1)).unwrap();
        let second = table.create(x, SymbolKind::Int(2)).unwrap();

        assert_eq!(table.lookup(x), Some(second));
        assert_eq!(table.get(second).value(), Some(Val::Int(2)));
    }

    #[test]
    fn test_lookup_skips_outer_locals() {
        let mut store = StringStore::with_capacity(64);
        let (x, y) = names(&mut store);
        let mut table = SymbolTable::new(8);

        let global = table.create(x, SymbolKind::Int(1)).unwrap();
        table.enter_scope();
        table.create(y, SymbolKind::Int(2)).unwrap();
        table.enter_scope();

        // depth 1 local is invisible from depth 2, the global is not
        assert_eq!(table.lookup(y), None);
        assert_eq!(table.lookup(x), Some(global));
    }

    #[test]
    fn test_shadowing_and_truncate() {
        let mut store = StringStore::with_capacity(64);
        let (x, _) = names(&mut store);
        let mut table = SymbolTable::new(8);

        let global = table.create(x, SymbolKind::Int(1)).unwrap();
        let mark = table.len();
        table.enter_scope();
        let local = table.define(x, SymbolKind::Int(2)).unwrap();
        assert_ne!(local, global);
        assert_eq!(table.lookup(x), Some(local));

        table.truncate(mark);
        table.leave_scope();
        assert_eq!(table.lookup(x), Some(global));
        assert_eq!(table.get(global).value(), Some(Val::Int(1)));
    }

    #[test]
    fn test_define_overwrites_at_same_depth() {
        let mut store = StringStore::with_capacity(64);
        let (x, _) = names(&mut store);
        let mut table = SymbolTable::new(8);

        let first = table.define(x, SymbolKind::Int(1)).unwrap();
        let second = table.define(x, SymbolKind::Int(5)).unwrap();

        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(first).value(), Some(Val::Int(5)));
    }

    #[test]
    fn test_capacity_exhausted() {
        let mut store = StringStore::with_capacity(64);
        let (x, y) = names(&mut store);
        let mut table = SymbolTable::new(1);

        table.create(x, SymbolKind::Int(1)).unwrap();
        let err = table.create(y, SymbolKind::Int(2)).unwrap_err();
        assert_eq!(err.code(), Some(errors::SYMBOL_TABLE_FULL));
    }

    #[test]
    fn test_arity() {
        assert_eq!(Arity::from_count(-1), Arity::Variadic);
        assert_eq!(Arity::from_count(2), Arity::Fixed(2));
        assert!(Arity::Variadic.accepts(7));
        assert!(!Arity::Fixed(1).accepts(0));
    }
}
