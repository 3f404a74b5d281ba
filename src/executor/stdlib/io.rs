//! Output natives

use crate::executor::errors::Fault;
use crate::executor::types::Val;
use crate::executor::vm::VM;

/// Pop all arguments, first argument first
fn take_args(vm: &mut VM) -> Result<Vec<Val>, Fault> {
    let mut args = Vec::with_capacity(vm.arg_count());
    while vm.arg_count() > 0 {
        args.push(vm.pop_value()?);
    }
    args.reverse();
    Ok(args)
}

fn render(vm: &mut VM) -> Result<String, Fault> {
    let args = take_args(vm)?;
    Ok(args.into_iter().map(|v| vm.display(v)).collect())
}

/// PRINT(...) - arguments concatenated onto a new line
pub fn print(vm: &mut VM) -> Result<(), Fault> {
    let text = render(vm)?;
    vm.print(&text);
    Ok(())
}

/// APPEND(...) - arguments concatenated onto the current line
pub fn append(vm: &mut VM) -> Result<(), Fault> {
    let text = render(vm)?;
    vm.append_print(&text);
    Ok(())
}

/// PRINTN(n) - a number on a new line
pub fn printn(vm: &mut VM) -> Result<(), Fault> {
    let n = vm.pop_number()?;
    vm.print(&n.to_string());
    Ok(())
}
