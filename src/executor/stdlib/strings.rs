//! String natives

use crate::executor::errors::Fault;
use crate::executor::vm::VM;

/// LEN(s) - length of a string in bytes
pub fn len(vm: &mut VM) -> Result<(), Fault> {
    let s = vm.pop_string()?;
    vm.push_int(s.len().min(i32::MAX as usize) as i32);
    Ok(())
}

/// STR(n) - decimal text of a number
pub fn str(vm: &mut VM) -> Result<(), Fault> {
    let value = vm.pop_value()?;
    let text = vm.display(value);
    vm.push_string(&text)
}
