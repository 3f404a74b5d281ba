//! Type definitions for the executor
//!
//! - Statement graph (Stmt, StmtKind)
//! - Evaluation plans (Plan, PlanOp)
//! - Runtime values (Val)
//! - Continuations and frames (Continuation, ExprFrame, ReturnCall, LoopFrame)

pub mod ast;
pub mod control;
pub mod plan;
pub mod values;

pub use ast::{NameList, Stmt, StmtId, StmtKind};
pub use control::{Continuation, ExprFrame, LoopFrame, ReturnCall, State};
pub use plan::{BinaryOp, Plan, PlanOp, UnaryOp};
pub use values::Val;
