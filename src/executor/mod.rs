//! # Executor - Resumable Statement Scheduler
//!
//! Runs a compiled statement graph in small increments driven by the host.
//!
//! ## Core Principles
//!
//! 1. **No native recursion**: nested expressions, calls and loops live on
//!    explicit stacks (`frames`, `calls`, `loops`), never on the Rust stack
//! 2. **One unit of work per step**: one statement dispatch or one plan
//!    micro-op
//! 3. **Continuations**: a statement that needs a value installs a plan plus
//!    a continuation and is finished by that continuation later
//! 4. **Fixed budget**: all program memory comes from arenas sized up front

pub mod calls;
pub mod errors;
pub mod exec_loop;
pub mod expressions;
pub mod heap;
pub mod output;
pub mod statements;
pub mod stdlib;
pub mod symbols;
pub mod types;
pub mod vm;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use errors::Fault;
pub use exec_loop::{run_until_done, step};
pub use heap::{Heap, HeapUsage};
pub use output::{Output, Transcript};
pub use symbols::{Arity, NativeFn, SymbolKind, SymbolTable};
pub use types::{State, Val};
pub use vm::VM;
