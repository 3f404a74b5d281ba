//! Expression stepper
//!
//! Evaluation runs one micro-op of the active plan per step. Operands live on
//! the shared value stack. When the plan is exhausted its single result is
//! handed to the frame's continuation, which finishes the statement that
//! asked for the value.

use super::calls::call;
use super::errors::{self, Fault};
use super::statements::{assign, enter_for};
use super::types::{
    BinaryOp, Continuation, ExprFrame, Plan, PlanOp, State, StmtId, StmtKind, UnaryOp, Val,
};
use super::vm::VM;
use crate::arena::StrId;

/* ===================== Frames ===================== */

/// Start evaluating `plan`; `continuation` receives the result
pub fn begin_eval(vm: &mut VM, plan: Plan, continuation: Continuation) -> Result<(), Fault> {
    vm.frames.push(ExprFrame {
        plan,
        index: 0,
        base: vm.stack.len(),
        continuation,
    });
    vm.state = State::ExprEvaluation;
    Ok(())
}

/// Execute one micro-op of the active frame, or resolve its continuation
pub fn step_expression(vm: &mut VM) -> Result<(), Fault> {
    let Some(frame) = vm.frames.last_mut() else {
        return Err(errors::internal("expression evaluation without an active frame"));
    };

    if frame.index >= frame.plan.len() {
        return complete_plan(vm);
    }

    let op = vm.heap.plan_op(frame.plan, frame.index);
    frame.index += 1;

    match op {
        PlanOp::Nop => Ok(()),
        PlanOp::PushNumber(n) => vm.push(Val::Int(n)),
        PlanOp::PushString(s) => vm.push(Val::Str(s)),
        PlanOp::PushVar(name) => {
            let value = read_variable(vm, name)?;
            vm.push(value)
        }
        PlanOp::Unary(op) => {
            let operand = vm.pop()?;
            let result = unary(vm, op, operand)?;
            vm.push(result)
        }
        PlanOp::Binary(op) => {
            let right = vm.pop()?;
            let left = vm.pop()?;
            let result = binary(vm, op, left, right)?;
            vm.push(result)
        }
        PlanOp::ShortCircuit { op, target } => short_circuit(vm, op, target as usize),
        PlanOp::Call { name, argc, stmt } => call(vm, name, argc as usize, stmt),
    }
}

/// Hand the plan's result to its continuation
fn complete_plan(vm: &mut VM) -> Result<(), Fault> {
    let Some(frame) = vm.frames.pop() else {
        return Err(errors::internal("no frame to complete"));
    };
    if vm.stack.len() <= frame.base {
        return Err(Fault::runtime(
            errors::STACK_UNDERFLOW,
            "Expression produced no value",
        ));
    }
    let value = vm.pop()?;
    vm.stack.truncate(frame.base);

    match frame.continuation {
        Continuation::Assign { var, next } => {
            assign(vm, var, value)?;
            resume_at(vm, next);
        }
        Continuation::Branch { then, otherwise } => {
            let target = if truthy(vm, value) { then } else { otherwise };
            resume_at(vm, target);
        }
        Continuation::Discard { next } => resume_at(vm, next),
        Continuation::LoopMin { header } => {
            let min = expect_int(value, "FOR lower bound")?;
            let StmtKind::For { max, .. } = vm.heap.stmt(header).kind else {
                return Err(errors::internal("loop bound continuation on a non-FOR statement"));
            };
            begin_eval(vm, max, Continuation::LoopMax { header, min })?;
        }
        Continuation::LoopMax { header, min } => {
            let max = expect_int(value, "FOR upper bound")?;
            enter_for(vm, header, min, max)?;
        }
        Continuation::WhileCond { body, exit } => {
            let target = if truthy(vm, value) { body } else { exit };
            resume_at(vm, target);
        }
        Continuation::Return { exit } => {
            vm.return_value = value;
            resume_at(vm, exit);
        }
    }
    Ok(())
}

fn resume_at(vm: &mut VM, pc: Option<StmtId>) {
    vm.pc = pc;
    vm.state = State::Running;
}

/* ===================== Operands ===================== */

fn read_variable(vm: &VM, name: StrId) -> Result<Val, Fault> {
    let Some(id) = vm.symbols.lookup(name) else {
        return Err(Fault::runtime(
            errors::UNKNOWN_SYMBOL,
            format!("Unknown symbol '{}'", vm.heap.str(name)),
        ));
    };
    vm.symbols.get(id).value().ok_or_else(|| {
        Fault::runtime(
            errors::NOT_A_VARIABLE,
            format!("'{}' is a function, not a variable", vm.heap.str(name)),
        )
    })
}

/// Numbers are true when non-zero, strings when non-empty
pub fn truthy(vm: &VM, value: Val) -> bool {
    match value {
        Val::Int(n) => n != 0,
        Val::Str(s) => !vm.heap.str(s).is_empty(),
    }
}

fn expect_int(value: Val, what: &str) -> Result<i32, Fault> {
    match value {
        Val::Int(n) => Ok(n),
        other => Err(Fault::runtime(
            errors::TYPE_MISMATCH,
            format!("{} must be a number, got {}", what, other.type_name()),
        )),
    }
}

/* ===================== Operators ===================== */

fn short_circuit(vm: &mut VM, op: BinaryOp, target: usize) -> Result<(), Fault> {
    let Some(&left) = vm.stack.last() else {
        return Err(Fault::runtime(errors::STACK_UNDERFLOW, "Missing left operand"));
    };
    let left = truthy(vm, left);
    let decided = match op {
        BinaryOp::And => !left,
        BinaryOp::Or => left,
        _ => return Err(errors::internal("short circuit on a non-logical operator")),
    };

    if decided {
        vm.pop()?;
        vm.push(Val::from_bool(left))?;
        if let Some(frame) = vm.frames.last_mut() {
            frame.index = target;
        }
    }
    Ok(())
}

fn unary(vm: &VM, op: UnaryOp, operand: Val) -> Result<Val, Fault> {
    match (op, operand) {
        (UnaryOp::Negate, Val::Int(n)) => Ok(Val::Int(n.wrapping_neg())),
        (UnaryOp::Negate, other) => Err(mismatch_unary("-", other)),
        (UnaryOp::Not, value) => Ok(Val::from_bool(!truthy(vm, value))),
    }
}

fn binary(vm: &mut VM, op: BinaryOp, left: Val, right: Val) -> Result<Val, Fault> {
    use BinaryOp::*;

    match (op, left, right) {
        (Add, Val::Int(a), Val::Int(b)) => Ok(Val::Int(a.wrapping_add(b))),
        (Add, _, _) => concat(vm, left, right),

        (Sub, Val::Int(a), Val::Int(b)) => Ok(Val::Int(a.wrapping_sub(b))),
        (Mul, Val::Int(a), Val::Int(b)) => Ok(Val::Int(a.wrapping_mul(b))),
        (Div, Val::Int(_), Val::Int(0)) => {
            Err(Fault::runtime(errors::DIVISION_BY_ZERO, "Division by zero"))
        }
        (Div, Val::Int(a), Val::Int(b)) => Ok(Val::Int(a.wrapping_div(b))),

        (Eq, _, _) => Ok(Val::from_bool(values_equal(vm, left, right))),
        (Neq, _, _) => Ok(Val::from_bool(!values_equal(vm, left, right))),

        (Lt | Lte | Gt | Gte, _, _) => {
            let ordering = match (left, right) {
                (Val::Int(a), Val::Int(b)) => a.cmp(&b),
                (Val::Str(a), Val::Str(b)) => vm.heap.str(a).cmp(vm.heap.str(b)),
                _ => return Err(mismatch(op, left, right)),
            };
            let result = match op {
                Lt => ordering.is_lt(),
                Lte => ordering.is_le(),
                Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            };
            Ok(Val::from_bool(result))
        }

        (And, _, _) => Ok(Val::from_bool(truthy(vm, left) && truthy(vm, right))),
        (Or, _, _) => Ok(Val::from_bool(truthy(vm, left) || truthy(vm, right))),

        (Sub | Mul | Div, _, _) => Err(mismatch(op, left, right)),
    }
}

fn values_equal(vm: &VM, left: Val, right: Val) -> bool {
    match (left, right) {
        (Val::Int(a), Val::Int(b)) => a == b,
        (Val::Str(a), Val::Str(b)) => vm.heap.str(a) == vm.heap.str(b),
        _ => false,
    }
}

/// `+` with at least one string operand
///
/// A number operand is rendered into a temporary arena string that is
/// released again once the result exists.
fn concat(vm: &mut VM, left: Val, right: Val) -> Result<Val, Fault> {
    let (left_id, left_temp) = as_string(vm, left)?;
    let (right_id, right_temp) = as_string(vm, right)?;

    let result = vm.heap.strings.concat(left_id, right_id);

    if left_temp {
        vm.heap.strings.release(left_id)?;
    }
    if right_temp {
        vm.heap.strings.release(right_id)?;
    }
    Ok(Val::Str(result?))
}

fn as_string(vm: &mut VM, value: Val) -> Result<(StrId, bool), Fault> {
    match value {
        Val::Str(s) => Ok((s, false)),
        Val::Int(n) => Ok((vm.heap.strings.alloc(&n.to_string())?, true)),
    }
}

fn mismatch(op: BinaryOp, left: Val, right: Val) -> Fault {
    Fault::runtime(
        errors::TYPE_MISMATCH,
        format!(
            "Cannot apply '{}' to {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ),
    )
}

fn mismatch_unary(op: &str, operand: Val) -> Fault {
    Fault::runtime(
        errors::TYPE_MISMATCH,
        format!("Cannot apply '{}' to {}", op, operand.type_name()),
    )
}
