//! Continuations and execution frame types

use super::ast::StmtId;
use super::plan::Plan;
use crate::arena::StrId;

/* ===================== Scheduler State ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Dispatch on the statement at `pc`
    Running,
    /// An expression plan is in flight
    ExprEvaluation,
    /// Blocked until elapsed time reaches the wake-up time
    Sleeping,
    /// Program finished, failed or exited; the VM has been torn down
    Finished,
}

/* ===================== Continuations ===================== */

/// What the statement that requested an evaluation does with the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Store into a variable, then continue at `next`
    Assign { var: StrId, next: Option<StmtId> },
    /// Pick a branch on truthiness
    Branch {
        then: Option<StmtId>,
        otherwise: Option<StmtId>,
    },
    /// Throw the value away, then continue at `next`
    Discard { next: Option<StmtId> },
    /// Lower bound of a `FOR` header; evaluates the upper bound next
    LoopMin { header: StmtId },
    /// Upper bound of a `FOR` header; sets up the loop variable
    LoopMax { header: StmtId, min: i32 },
    /// `WHILE` condition
    WhileCond {
        body: Option<StmtId>,
        exit: Option<StmtId>,
    },
    /// Value of a `RETURN`; the function exit node comes next
    Return { exit: Option<StmtId> },
}

/* ===================== Frames ===================== */

/// A plan being evaluated, or parked while a called function runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprFrame {
    pub plan: Plan,
    /// Next micro-op to execute
    pub index: usize,
    /// Value stack length when the plan started; always a valid truncation point
    pub base: usize,
    pub continuation: Continuation,
}

/// One active user function invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnCall {
    /// Where the program counter goes after the function exit node
    pub return_to: Option<StmtId>,
    /// Symbol table length before the parameters were bound
    pub symbol_mark: usize,
    /// Loop stack length at call time
    pub loop_mark: usize,
    /// Called from inside an expression: the result is pushed and the parked
    /// frame resumed, instead of continuing at a statement
    pub expr_call: bool,
}

/// Bookkeeping for an active `FOR` loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopFrame {
    /// Symbol slot of the loop variable
    pub slot: usize,
    /// Exclusive upper bound
    pub max: i32,
    /// Symbol table length before the loop variable was created
    pub symbol_mark: usize,
}
