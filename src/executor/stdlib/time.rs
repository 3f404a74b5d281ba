//! Time natives

use crate::executor::errors::Fault;
use crate::executor::vm::VM;

/// SLEEP(seconds) - suspend until the host has advanced time far enough
pub fn sleep(vm: &mut VM) -> Result<(), Fault> {
    let seconds = vm.pop_number()?;
    vm.sleep(seconds as f64);
    Ok(())
}

/// TIME() - elapsed host time in milliseconds
pub fn time(vm: &mut VM) -> Result<(), Fault> {
    let millis = (vm.elapsed() * 1000.0).min(i32::MAX as f64);
    vm.push_int(millis as i32);
    Ok(())
}
