//! Runtime value types

use crate::arena::StrId;

/// Runtime value type
///
/// Strings are handles into the string arena; copying a value never copies
/// the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Val {
    Int(i32),
    Str(StrId),
}

impl Val {
    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Int(_) => "number",
            Val::Str(_) => "string",
        }
    }

    pub fn from_bool(b: bool) -> Self {
        Val::Int(b as i32)
    }
}

impl Default for Val {
    fn default() -> Self {
        Val::Int(0)
    }
}
