//! Error codes and the fault type shared by compiler and executor
//!
//! Every compile or run-time failure unwinds to the top of the current `init`
//! or `step` call as a `Fault`. Codes are stable strings so hosts and tests can
//! match on them without parsing messages.

use thiserror::Error;

use crate::arena::ArenaError;

/* ===================== Compile-time codes ===================== */

pub const UNEXPECTED_TOKEN: &str = "UNEXPECTED_TOKEN";
pub const UNTERMINATED_STRING: &str = "UNTERMINATED_STRING";
pub const NUMBER_TOO_LARGE: &str = "NUMBER_TOO_LARGE";
pub const RETURN_OUTSIDE_FUNCTION: &str = "RETURN_OUTSIDE_FUNCTION";

/* ===================== Run-time codes ===================== */

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN_SYMBOL";
pub const NOT_A_FUNCTION: &str = "NOT_A_FUNCTION";
pub const NOT_A_VARIABLE: &str = "NOT_A_VARIABLE";
pub const WRONG_ARG_COUNT: &str = "WRONG_ARG_COUNT";
pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
pub const DIVISION_BY_ZERO: &str = "DIVISION_BY_ZERO";
pub const STACK_UNDERFLOW: &str = "STACK_UNDERFLOW";
pub const STACK_OVERFLOW: &str = "STACK_OVERFLOW";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/* ===================== Shared codes ===================== */

pub const OUT_OF_MEMORY: &str = "OUT_OF_MEMORY";
pub const SYMBOL_TABLE_FULL: &str = "SYMBOL_TABLE_FULL";

/* ===================== Fault ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("Compile error (line {line}): {message}")]
    Compile {
        code: &'static str,
        line: usize,
        message: String,
    },

    #[error("Runtime error{}: {message}", line_suffix(.line))]
    Runtime {
        code: &'static str,
        line: Option<usize>,
        message: String,
    },

    /// Raised by `EXIT()`: a clean termination, never reported as an error
    #[error("Program exited")]
    Exit,
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

impl Fault {
    pub fn compile(code: &'static str, line: usize, message: impl Into<String>) -> Self {
        Fault::Compile {
            code,
            line,
            message: message.into(),
        }
    }

    pub fn runtime(code: &'static str, message: impl Into<String>) -> Self {
        Fault::Runtime {
            code,
            line: None,
            message: message.into(),
        }
    }

    /// Attach a source line to a run-time fault that does not carry one yet
    pub fn at_line(self, at: usize) -> Self {
        match self {
            Fault::Runtime {
                code,
                line: None,
                message,
            } => Fault::Runtime {
                code,
                line: Some(at),
                message,
            },
            other => other,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            Fault::Compile { code, .. } | Fault::Runtime { code, .. } => Some(*code),
            Fault::Exit => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Fault::Compile { line, .. } => Some(*line),
            Fault::Runtime { line, .. } => *line,
            Fault::Exit => None,
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Fault::Exit)
    }
}

impl From<ArenaError> for Fault {
    fn from(err: ArenaError) -> Self {
        match err {
            ArenaError::OutOfMemory { .. } => Fault::runtime(OUT_OF_MEMORY, err.to_string()),
            ArenaError::InvalidRelease { .. } => Fault::runtime(INTERNAL_ERROR, err.to_string()),
        }
    }
}

/// Shorthand for internal invariant violations
pub fn internal(message: impl Into<String>) -> Fault {
    Fault::runtime(INTERNAL_ERROR, message)
}
