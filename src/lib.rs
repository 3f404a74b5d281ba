pub mod arena;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod executor;
pub mod host;
pub mod lexer;

// Re-export the embedding API
pub use config::{Config, HostConfig, RuntimeConfig};
pub use executor::{run_until_done, step, Arity, Fault, NativeFn, Output, State, Transcript, Val, VM};
pub use host::{Host, Outcome};
