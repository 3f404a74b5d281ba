//! Test helpers for executor tests
//!
//! Common utilities for compiling scripts and driving VMs

use crate::config::RuntimeConfig;
use crate::executor::{Transcript, Val, VM};
use std::collections::HashMap;

/// Step budget for scripts that are expected to finish
pub const MAX_STEPS: usize = 1_000_000;

/// Compile a script into a VM whose output goes to a transcript
///
/// # Arguments
/// * `source` - Script source code
/// * `globals` - Integer globals registered before the first step
///
/// # Returns
/// A VM ready to execute with `run_until_done()` or `step()`, and the
/// transcript receiving its output
pub fn build_vm(source: &str, globals: HashMap<&str, i32>) -> (VM, Transcript) {
    build_vm_with_config(source, globals, &RuntimeConfig::default())
}

pub fn build_vm_with_config(
    source: &str,
    globals: HashMap<&str, i32>,
    config: &RuntimeConfig,
) -> (VM, Transcript) {
    let transcript = Transcript::new();
    let mut vm = VM::with_config(source, config, transcript.output()).expect("Compile failed");
    for (name, value) in globals {
        vm.register_variable_int(name, value)
            .expect("Register variable failed");
    }
    (vm, transcript)
}

/// Step until the VM stops, failing the test if it never does
///
/// Returns the number of steps taken.
pub fn run_to_end(vm: &mut VM) -> usize {
    for steps in 1..=MAX_STEPS {
        if !vm.step() {
            return steps;
        }
    }
    panic!("Script still running after {} steps", MAX_STEPS);
}

/// Compile and run a script without sleeps; returns its output
pub fn run_program(source: &str) -> (VM, String) {
    let (mut vm, transcript) = build_vm(source, HashMap::new());
    run_to_end(&mut vm);
    (vm, transcript.text())
}

/// Output of a script that must finish without a fault
pub fn output_of(source: &str) -> String {
    let (vm, text) = run_program(source);
    assert_eq!(vm.last_fault(), None, "Unexpected fault, output: {}", text);
    text
}

/// Current value of a variable as seen from the running code
pub fn var(vm: &VM, name: &str) -> Option<Val> {
    let id = vm.heap.strings.find(name)?;
    let slot = vm.symbols.lookup(id)?;
    vm.symbols.get(slot).value()
}

/// Text of a string value
pub fn text(vm: &VM, value: Val) -> String {
    vm.display(value)
}
