//! Evaluation plan emission
//!
//! `build_expr_plan` flattens an expression tree in post-order. The plan lives
//! in the op arena: it starts small, doubles through `reallocate` while
//! emitting and is shrunk to its final length at the end.

use super::expr::Expr;
use crate::arena::{Arena, ArenaResult, Block};
use crate::executor::types::{BinaryOp, Plan, PlanOp};

const INITIAL_PLAN_OPS: usize = 8;

struct PlanBuilder<'a> {
    ops: &'a mut Arena<PlanOp>,
    block: Block,
    len: usize,
}

impl<'a> PlanBuilder<'a> {
    fn new(ops: &'a mut Arena<PlanOp>) -> ArenaResult<Self> {
        let block = ops.allocate(INITIAL_PLAN_OPS)?;
        Ok(PlanBuilder { ops, block, len: 0 })
    }

    /// Append an op, returning its index
    fn push(&mut self, op: PlanOp) -> ArenaResult<usize> {
        if self.len == self.block.size() {
            self.block = self.ops.reallocate(self.block, self.block.size() * 2)?;
        }
        self.ops.get_mut(self.block)[self.len] = op;
        self.len += 1;
        Ok(self.len - 1)
    }

    fn patch(&mut self, index: usize, op: PlanOp) {
        self.ops.get_mut(self.block)[index] = op;
    }

    fn emit(&mut self, expr: &Expr) -> ArenaResult<()> {
        match expr {
            Expr::Number(n) => {
                self.push(PlanOp::PushNumber(*n))?;
            }
            Expr::Str(s) => {
                self.push(PlanOp::PushString(*s))?;
            }
            Expr::Var(name) => {
                self.push(PlanOp::PushVar(*name))?;
            }
            Expr::Unary(op, operand) => {
                self.emit(operand)?;
                self.push(PlanOp::Unary(*op))?;
            }
            Expr::Binary(op @ (BinaryOp::And | BinaryOp::Or), left, right) => {
                // left, short-circuit, right, op: a decided left operand jumps
                // past the right operand's ops
                self.emit(left)?;
                let jump = self.push(PlanOp::ShortCircuit { op: *op, target: 0 })?;
                self.emit(right)?;
                self.push(PlanOp::Binary(*op))?;
                let target = self.len as u32;
                self.patch(jump, PlanOp::ShortCircuit { op: *op, target });
            }
            Expr::Binary(op, left, right) => {
                self.emit(left)?;
                self.emit(right)?;
                self.push(PlanOp::Binary(*op))?;
            }
            Expr::Call { name, args } => {
                for arg in args {
                    self.emit(arg)?;
                }
                self.push(PlanOp::Call {
                    name: *name,
                    argc: args.len() as u32,
                    stmt: false,
                })?;
            }
        }
        Ok(())
    }

    fn finish(self) -> ArenaResult<Plan> {
        let block = self.ops.reallocate(self.block, self.len)?;
        Ok(Plan {
            block,
            len: self.len as u32,
        })
    }
}

/// Flatten `expr` into a plan
///
/// With `as_statement` set and `expr` a call, the final call op is marked as
/// a statement call.
pub fn build_expr_plan(
    expr: &Expr,
    ops: &mut Arena<PlanOp>,
    as_statement: bool,
) -> ArenaResult<Plan> {
    let mut builder = PlanBuilder::new(ops)?;
    builder.emit(expr)?;

    if as_statement {
        let last = builder.len - 1;
        if let PlanOp::Call { name, argc, .. } = builder.ops.get(builder.block)[last] {
            builder.patch(last, PlanOp::Call { name, argc, stmt: true });
        }
    }

    builder.finish()
}
