//! Core execution loop
//!
//! `step()` is the single entry point hosts call, once or many times per
//! tick. Every call does one small unit of work:
//! - Running: dispatch the statement at `pc`
//! - ExprEvaluation: execute one micro-op, or resolve the continuation of a
//!   finished plan
//! - Sleeping: nothing, until elapsed time reaches the wake-up time
//!
//! Faults abort the step, tear the VM down and leave it Finished.

use tracing::debug;

use super::errors::{self, Fault};
use super::expressions::step_expression;
use super::statements::execute_statement;
use super::types::State;
use super::vm::VM;

/* ===================== Public API ===================== */

/// Run one unit of work; returns whether the script is still running
pub fn step(vm: &mut VM) -> bool {
    if vm.state == State::Finished {
        return false;
    }

    if let Err(fault) = advance(vm) {
        vm.fail(fault);
    }

    vm.state != State::Finished
}

/// Step until the script finishes or goes to sleep
///
/// Returns whether the script is still running (it can only be sleeping).
pub fn run_until_done(vm: &mut VM) -> bool {
    while step(vm) {
        if vm.state == State::Sleeping {
            return true;
        }
    }
    false
}

/* ===================== Scheduling ===================== */

fn advance(vm: &mut VM) -> Result<(), Fault> {
    if vm.state == State::Sleeping {
        if vm.elapsed < vm.wake_at {
            return Ok(());
        }
        debug!(elapsed = vm.elapsed, "Woke up");
        vm.state = vm.resume_state;
    }

    match vm.state {
        State::Running => execute_statement(vm)?,
        State::ExprEvaluation => step_expression(vm)?,
        State::Sleeping | State::Finished => {}
    }

    if vm.sleep_requested {
        vm.sleep_requested = false;
        vm.resume_state = vm.state;
        vm.state = State::Sleeping;
        debug!(wake_at = vm.wake_at, "Sleeping");
    }

    if vm.state == State::Running && vm.pc.is_none() {
        finish(vm)?;
    }

    Ok(())
}

/// The program counter ran off the end of the graph
fn finish(vm: &mut VM) -> Result<(), Fault> {
    if !vm.frames.is_empty() || !vm.calls.is_empty() {
        return Err(Fault::runtime(
            errors::INTERNAL_ERROR,
            format!(
                "Program ended with {} expression frame(s) and {} call(s) active",
                vm.frames.len(),
                vm.calls.len()
            ),
        ));
    }
    vm.teardown();
    Ok(())
}

impl VM {
    /// Method form of [`step`]
    pub fn step(&mut self) -> bool {
        step(self)
    }
}
