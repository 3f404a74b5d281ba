//! Statement execution handlers
//!
//! Statements that need no value move the program counter themselves.
//! The others install a plan with a continuation and switch the VM to
//! expression evaluation; the continuation finishes the statement later.

use tracing::{debug, trace};

use super::errors::{self, Fault};
use super::expressions::begin_eval;
use super::symbols::SymbolKind;
use super::types::{Continuation, LoopFrame, State, StmtId, StmtKind, Val};
use super::vm::VM;
use crate::arena::StrId;

/* ===================== Dispatch ===================== */

/// Execute the statement at `pc`
pub fn execute_statement(vm: &mut VM) -> Result<(), Fault> {
    let Some(id) = vm.pc else {
        return Ok(());
    };
    let stmt = vm.heap.stmt(id);
    trace!(kind = stmt.kind.name(), line = stmt.line, "Statement");

    match stmt.kind {
        StmtKind::Nop => {
            vm.pc = stmt.next;
            Ok(())
        }

        StmtKind::Expr { plan } | StmtKind::Call { plan } => {
            begin_eval(vm, plan, Continuation::Discard { next: stmt.next })
        }

        StmtKind::Assign { var, plan } => begin_eval(
            vm,
            plan,
            Continuation::Assign {
                var,
                next: stmt.next,
            },
        ),

        StmtKind::If { cond } => begin_eval(
            vm,
            cond,
            Continuation::Branch {
                then: stmt.next,
                otherwise: stmt.jmp,
            },
        ),

        StmtKind::For { min, .. } => begin_eval(vm, min, Continuation::LoopMin { header: id }),

        StmtKind::ForEnd { .. } => execute_for_end(vm, id),

        StmtKind::While { cond } => begin_eval(
            vm,
            cond,
            Continuation::WhileCond {
                body: stmt.jmp,
                exit: stmt.next,
            },
        ),

        StmtKind::WhileEnd => {
            vm.pc = stmt.jmp;
            Ok(())
        }

        StmtKind::FuncDecl { name, params, body } => {
            vm.symbols.define(name, SymbolKind::Function { params, body })?;
            debug!(name = vm.heap.str(name), depth = vm.symbols.depth(), "Function declared");
            vm.pc = stmt.next;
            Ok(())
        }

        StmtKind::FuncExit => execute_func_exit(vm),

        StmtKind::Return { plan } => begin_eval(vm, plan, Continuation::Return { exit: stmt.next }),
    }
}

/* ===================== Loops ===================== */

/// Set up a `FOR` loop once both bounds are known
///
/// The loop variable is created at the current depth. Zero iterations skip
/// straight past the loop.
pub fn enter_for(vm: &mut VM, header: StmtId, min: i32, max: i32) -> Result<(), Fault> {
    let stmt = vm.heap.stmt(header);
    let StmtKind::For { var, .. } = stmt.kind else {
        return Err(errors::internal("loop bounds captured for a non-FOR statement"));
    };

    let mark = vm.symbols.len();
    if min < max {
        let slot = vm.symbols.create(var, SymbolKind::Int(min))?;
        vm.loops.push(LoopFrame {
            slot,
            max,
            symbol_mark: mark,
        });
        vm.pc = stmt.jmp;
    } else {
        vm.pc = stmt.next;
    }
    vm.state = State::Running;
    Ok(())
}

/// Increment the loop variable and either repeat the body or leave the loop
fn execute_for_end(vm: &mut VM, id: StmtId) -> Result<(), Fault> {
    let stmt = vm.heap.stmt(id);
    let Some(frame) = vm.loops.last().copied() else {
        return Err(errors::internal("FOR loop end reached without an active loop"));
    };

    let current = match vm.symbols.get(frame.slot).kind {
        SymbolKind::Int(n) => n,
        _ => {
            return Err(Fault::runtime(
                errors::TYPE_MISMATCH,
                "FOR loop variable no longer holds a number",
            ))
        }
    };

    match current.checked_add(1).filter(|n| *n < frame.max) {
        Some(n) => {
            vm.symbols.get_mut(frame.slot).kind = SymbolKind::Int(n);
            let Some(header) = stmt.jmp else {
                return Err(errors::internal("FOR loop end is not linked to its header"));
            };
            vm.pc = vm.heap.stmt(header).jmp;
        }
        None => {
            vm.symbols.truncate(frame.symbol_mark);
            vm.loops.pop();
            vm.pc = stmt.next;
        }
    }
    Ok(())
}

/* ===================== Functions ===================== */

/// Shared unwind for every way out of a called function, native or user
pub fn execute_func_exit(vm: &mut VM) -> Result<(), Fault> {
    let Some(call) = vm.calls.pop() else {
        return Err(errors::internal("function exit without an active call"));
    };

    vm.symbols.truncate(call.symbol_mark);
    vm.symbols.leave_scope();
    vm.loops.truncate(call.loop_mark);
    vm.pc = call.return_to;

    let value = std::mem::take(&mut vm.return_value);
    if call.expr_call {
        if vm.frames.is_empty() {
            return Err(errors::internal("expression call returned without a parked frame"));
        }
        vm.push(value)?;
        vm.state = State::ExprEvaluation;
    } else {
        vm.state = State::Running;
    }

    debug!(depth = vm.symbols.depth(), expr_call = call.expr_call, "Function returned");
    Ok(())
}

/// Store a value into the variable visible at the current depth
pub fn assign(vm: &mut VM, var: StrId, value: Val) -> Result<(), Fault> {
    if let Some(id) = vm.symbols.lookup_local(var) {
        if !vm.symbols.get(id).kind.is_variable() {
            return Err(Fault::runtime(
                errors::NOT_A_VARIABLE,
                format!("Cannot assign to function '{}'", vm.heap.str(var)),
            ));
        }
        vm.symbols.get_mut(id).kind = SymbolKind::from_value(value);
        return Ok(());
    }
    vm.symbols.create(var, SymbolKind::from_value(value))?;
    Ok(())
}
