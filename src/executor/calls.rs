//! Function calls
//!
//! Natives run to completion inside a single step, then leave through the
//! same function exit unwind as user functions. User functions never run
//! inside the stepper: the call binds the parameters, records a `ReturnCall`
//! and moves the program counter into the body. The function exit node undoes
//! all of it.

use tracing::debug;

use super::errors::{self, Fault};
use super::statements::execute_func_exit;
use super::symbols::{Arity, NativeFn, SymbolKind};
use super::types::{NameList, ReturnCall, State, StmtId, Val};
use super::vm::VM;
use crate::arena::StrId;

/// Execute a call micro-op with `argc` arguments on the stack
///
/// `stmt` marks a bare call statement: its frame is dropped instead of parked
/// and the callee returns straight to the following statement.
pub fn call(vm: &mut VM, name: StrId, argc: usize, stmt: bool) -> Result<(), Fault> {
    let Some(id) = vm.symbols.lookup(name) else {
        return Err(Fault::runtime(
            errors::UNKNOWN_SYMBOL,
            format!("Unknown function '{}'", vm.heap.str(name)),
        ));
    };

    let base = vm.frames.last().map_or(0, |f| f.base);
    if vm.stack.len() < base + argc {
        return Err(Fault::runtime(
            errors::STACK_UNDERFLOW,
            format!("Call to '{}' is missing arguments", vm.heap.str(name)),
        ));
    }

    match vm.symbols.get(id).kind {
        SymbolKind::Native { func, arity } => call_native(vm, name, func, arity, argc),
        SymbolKind::Function { params, body } => call_function(vm, name, params, body, argc, stmt),
        SymbolKind::Int(_) | SymbolKind::Str(_) => Err(Fault::runtime(
            errors::NOT_A_FUNCTION,
            format!("'{}' is not a function", vm.heap.str(name)),
        )),
    }
}

fn wrong_arg_count(vm: &VM, name: StrId, expected: usize, got: usize) -> Fault {
    Fault::runtime(
        errors::WRONG_ARG_COUNT,
        format!(
            "'{}' expects {} argument(s), got {}",
            vm.heap.str(name),
            expected,
            got
        ),
    )
}

/* ===================== Natives ===================== */

fn call_native(
    vm: &mut VM,
    name: StrId,
    func: NativeFn,
    arity: Arity,
    argc: usize,
) -> Result<(), Fault> {
    if !arity.accepts(argc) {
        let Arity::Fixed(expected) = arity else {
            return Err(errors::internal("variadic function rejected its arguments"));
        };
        return Err(wrong_arg_count(vm, name, expected, argc));
    }

    let args_base = vm.stack.len() - argc;
    vm.native_base = args_base;
    vm.native_result = None;

    let outcome = func(vm);

    vm.native_base = 0;
    vm.stack.truncate(args_base);
    outcome?;

    // Leave through the same exit a user function takes: the result becomes
    // the return value and the calling frame resumes with it
    vm.return_value = vm.native_result.take().unwrap_or_default();
    vm.calls.push(ReturnCall {
        return_to: vm.pc,
        symbol_mark: vm.symbols.len(),
        loop_mark: vm.loops.len(),
        expr_call: true,
    });
    vm.symbols.enter_scope();
    execute_func_exit(vm)
}

/* ===================== User functions ===================== */

fn call_function(
    vm: &mut VM,
    name: StrId,
    params: NameList,
    body: StmtId,
    argc: usize,
    stmt: bool,
) -> Result<(), Fault> {
    if params.len() != argc {
        return Err(wrong_arg_count(vm, name, params.len(), argc));
    }
    if vm.calls.len() >= vm.limits.max_call_depth {
        return Err(Fault::runtime(
            errors::STACK_OVERFLOW,
            format!("Call depth limit of {} exceeded", vm.limits.max_call_depth),
        ));
    }

    let args_base = vm.stack.len() - argc;
    let args: Vec<Val> = vm.stack.drain(args_base..).collect();

    let return_to = if stmt {
        // The call is the last op of its statement: nothing left to resume
        if let Some(frame) = vm.frames.pop() {
            vm.stack.truncate(frame.base);
        }
        vm.pc.and_then(|pc| vm.heap.stmt(pc).next)
    } else {
        vm.pc
    };

    vm.calls.push(ReturnCall {
        return_to,
        symbol_mark: vm.symbols.len(),
        loop_mark: vm.loops.len(),
        expr_call: !stmt,
    });

    vm.symbols.enter_scope();
    for (i, value) in args.into_iter().enumerate() {
        let param = vm.heap.name(params, i);
        vm.symbols.create(param, SymbolKind::from_value(value))?;
    }

    debug!(
        name = vm.heap.str(name),
        depth = vm.symbols.depth(),
        expr_call = !stmt,
        "Calling function"
    );

    vm.pc = Some(body);
    vm.state = State::Running;
    Ok(())
}
