//! # Arena - fixed-budget region allocator
//!
//! Every piece of memory the runtime hands out (statement nodes, evaluation
//! plans, parameter lists, string bytes) lives in an `Arena`. An arena is one
//! contiguous region of `capacity` slots, subdivided into blocks:
//!
//! - **allocate**: first block in the free list that is large enough wins; it is
//!   split when the leftover is at least `MIN_BLOCK` slots
//! - **release**: the block goes back into the free list in address order and is
//!   merged with its neighbours when they touch
//! - **reallocate**: grow in place into a free successor, otherwise allocate,
//!   copy and release
//! - **reset**: the whole region becomes a single free block again
//!
//! There is no growth strategy. Running out of space is an `ArenaError` that the
//! interpreter treats as fatal, so hosts size arenas for the worst case up front.
//!
//! Blocks are handles (offset + size) into the region instead of pointers, so a
//! stale handle can at worst read stale data; it can never touch memory outside
//! the region.

pub mod strings;

#[cfg(test)]
mod tests;

use std::ops::Range;
use thiserror::Error;

pub use strings::{StrId, StringStore};

/// Blocks are never split into a remainder smaller than this many slots.
pub const MIN_BLOCK: usize = 4;

/* ===================== Errors ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena exhausted: requested {requested} slots, largest free block is {largest_free}")]
    OutOfMemory { requested: usize, largest_free: usize },

    #[error("block at offset {offset} (size {size}) overlaps free space")]
    InvalidRelease { offset: usize, size: usize },
}

pub type ArenaResult<T> = Result<T, ArenaError>;

/* ===================== Blocks ===================== */

/// Handle to a block of slots inside an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block {
    offset: u32,
    size: u32,
}

impl Block {
    /// The empty block: owns nothing, releasing it is a no-op
    pub const EMPTY: Block = Block { offset: 0, size: 0 };

    fn new(offset: usize, size: usize) -> Self {
        Block {
            offset: offset as u32,
            size: size as u32,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    /// Number of slots owned by this block (may exceed what was requested)
    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn end(&self) -> usize {
        self.offset() + self.size()
    }

    fn range(&self) -> Range<usize> {
        self.offset()..self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FreeBlock {
    offset: usize,
    size: usize,
}

impl FreeBlock {
    fn end(&self) -> usize {
        self.offset + self.size
    }
}

/* ===================== Arena ===================== */

/// Region allocator over slots of `T`
///
/// The free list is kept sorted by offset, so coalescing only ever has to look
/// at the two neighbours of the block being released.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    region: Vec<T>,
    free: Vec<FreeBlock>,
}

impl<T: Copy + Default> Arena<T> {
    /// Create an arena with a fixed number of slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Arena {
            region: vec![T::default(); capacity],
            free: Vec::new(),
        };
        arena.reset();
        arena
    }

    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Slots currently available across all free blocks
    pub fn available(&self) -> usize {
        self.free.iter().map(|f| f.size).sum()
    }

    /// Slots currently handed out
    pub fn used(&self) -> usize {
        self.capacity() - self.available()
    }

    /// Free list as `(offset, size)` pairs, in address order
    pub fn free_blocks(&self) -> Vec<(usize, usize)> {
        self.free.iter().map(|f| (f.offset, f.size)).collect()
    }

    fn largest_free(&self) -> usize {
        self.free.iter().map(|f| f.size).max().unwrap_or(0)
    }

    /// Allocate a block of at least `size` slots
    pub fn allocate(&mut self, size: usize) -> ArenaResult<Block> {
        if size == 0 {
            return Ok(Block::EMPTY);
        }

        let Some(idx) = self.free.iter().position(|f| f.size >= size) else {
            return Err(ArenaError::OutOfMemory {
                requested: size,
                largest_free: self.largest_free(),
            });
        };

        let chosen = self.free[idx];
        if chosen.size - size >= MIN_BLOCK {
            self.free[idx] = FreeBlock {
                offset: chosen.offset + size,
                size: chosen.size - size,
            };
            Ok(Block::new(chosen.offset, size))
        } else {
            // Leftover too small to track: hand out the whole block
            self.free.remove(idx);
            Ok(Block::new(chosen.offset, chosen.size))
        }
    }

    /// Return a block to the free list, merging it with adjacent free blocks
    pub fn release(&mut self, block: Block) -> ArenaResult<()> {
        if block.is_empty() {
            return Ok(());
        }

        let idx = self.free.partition_point(|f| f.offset < block.offset());
        let overlaps_next = idx < self.free.len() && block.end() > self.free[idx].offset;
        let overlaps_prev = idx > 0 && self.free[idx - 1].end() > block.offset();
        if overlaps_next || overlaps_prev || block.end() > self.capacity() {
            return Err(ArenaError::InvalidRelease {
                offset: block.offset(),
                size: block.size(),
            });
        }

        let mut merged = FreeBlock {
            offset: block.offset(),
            size: block.size(),
        };

        if idx < self.free.len() && merged.end() == self.free[idx].offset {
            merged.size += self.free[idx].size;
            self.free.remove(idx);
        }

        if idx > 0 && self.free[idx - 1].end() == merged.offset {
            self.free[idx - 1].size += merged.size;
        } else {
            self.free.insert(idx, merged);
        }

        Ok(())
    }

    /// Resize a block, keeping its first `min(old, new)` slots
    pub fn reallocate(&mut self, block: Block, new_size: usize) -> ArenaResult<Block> {
        if block.is_empty() {
            return self.allocate(new_size);
        }

        if new_size <= block.size() {
            if block.size() - new_size >= MIN_BLOCK {
                self.release(Block::new(block.offset() + new_size, block.size() - new_size))?;
                return Ok(Block::new(block.offset(), new_size));
            }
            return Ok(block);
        }

        // Grow in place when the successor is free and big enough
        if let Ok(idx) = self.free.binary_search_by_key(&block.end(), |f| f.offset) {
            let next = self.free[idx];
            let needed = new_size - block.size();
            if next.size >= needed {
                if next.size - needed >= MIN_BLOCK {
                    self.free[idx] = FreeBlock {
                        offset: next.offset + needed,
                        size: next.size - needed,
                    };
                    return Ok(Block::new(block.offset(), new_size));
                }
                self.free.remove(idx);
                return Ok(Block::new(block.offset(), block.size() + next.size));
            }
        }

        let moved = self.allocate(new_size)?;
        self.region.copy_within(block.range(), moved.offset());
        self.release(block)?;
        Ok(moved)
    }

    /// Release everything at once
    pub fn reset(&mut self) {
        self.free.clear();
        if !self.region.is_empty() {
            self.free.push(FreeBlock {
                offset: 0,
                size: self.region.len(),
            });
        }
    }

    /// Copy the first `count` slots of `src` into `dst`, starting at slot `at`
    pub fn copy_into(&mut self, src: Block, count: usize, dst: Block, at: usize) {
        let from = src.offset()..src.offset() + count.min(src.size());
        self.region.copy_within(from, dst.offset() + at);
    }

    pub fn get(&self, block: Block) -> &[T] {
        &self.region[block.range()]
    }

    pub fn get_mut(&mut self, block: Block) -> &mut [T] {
        &mut self.region[block.range()]
    }
}
