//! Arena-backed string storage
//!
//! Source lexemes and runtime strings are copied into a byte arena. Identifiers
//! are interned so two names are equal exactly when their `StrId`s are equal;
//! string values produced at runtime are not interned.

use super::{Arena, ArenaResult, Block};

/// Handle to a string stored in a `StringStore`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StrId {
    block: Block,
    len: u32,
}

impl StrId {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone)]
pub struct StringStore {
    bytes: Arena<u8>,
    interned: Vec<StrId>,
}

impl StringStore {
    pub fn with_capacity(bytes: usize) -> Self {
        StringStore {
            bytes: Arena::with_capacity(bytes),
            interned: Vec::new(),
        }
    }

    /// Copy `s` into the arena
    pub fn alloc(&mut self, s: &str) -> ArenaResult<StrId> {
        let block = self.bytes.allocate(s.len())?;
        self.bytes.get_mut(block)[..s.len()].copy_from_slice(s.as_bytes());
        Ok(StrId {
            block,
            len: s.len() as u32,
        })
    }

    /// Return the existing handle for `s`, storing it on first use
    pub fn intern(&mut self, s: &str) -> ArenaResult<StrId> {
        if let Some(id) = self.find(s) {
            return Ok(id);
        }
        let id = self.alloc(s)?;
        self.interned.push(id);
        Ok(id)
    }

    /// Look up an interned string without storing it
    pub fn find(&self, s: &str) -> Option<StrId> {
        self.interned
            .iter()
            .copied()
            .find(|id| self.get(*id) == s)
    }

    /// Concatenate two stored strings into a new one
    pub fn concat(&mut self, left: StrId, right: StrId) -> ArenaResult<StrId> {
        let len = left.len() + right.len();
        let block = self.bytes.allocate(len)?;

        self.bytes.copy_into(left.block, left.len(), block, 0);
        self.bytes.copy_into(right.block, right.len(), block, left.len());

        Ok(StrId {
            block,
            len: len as u32,
        })
    }

    /// Give back a string nobody refers to any more
    pub fn release(&mut self, id: StrId) -> ArenaResult<()> {
        self.bytes.release(id.block)
    }

    pub fn get(&self, id: StrId) -> &str {
        // Only ever filled from `&str` slices, so the bytes are valid UTF-8
        std::str::from_utf8(&self.bytes.get(id.block)[..id.len()]).unwrap_or_default()
    }

    pub fn used(&self) -> usize {
        self.bytes.used()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn reset(&mut self) {
        self.bytes.reset();
        self.interned.clear();
    }
}
