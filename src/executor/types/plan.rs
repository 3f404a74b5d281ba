//! Evaluation plans
//!
//! An expression is flattened at compile time into a post-order list of
//! micro-ops. Running a plan needs no recursion: the only state is the index of
//! the next op, so evaluation can stop after any op and pick up later.

use crate::arena::{Block, StrId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// One micro-operation of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanOp {
    #[default]
    Nop,
    PushNumber(i32),
    PushString(StrId),
    PushVar(StrId),
    Unary(UnaryOp),
    Binary(BinaryOp),
    /// Left operand of `AND`/`OR` is on the stack. If it already decides the
    /// result, replace it with 0/1 and continue at `target`.
    ShortCircuit { op: BinaryOp, target: u32 },
    /// Call with `argc` arguments on the stack. `stmt` marks a bare call
    /// statement, whose result is never used.
    Call { name: StrId, argc: u32, stmt: bool },
}

/// Handle to a plan in the op arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Plan {
    pub block: Block,
    pub len: u32,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
