//! Standard library natives
//!
//! Every interpreter starts with these registered as globals. Hosts add
//! their own with `VM::register_function`.

pub mod io;
pub mod process;
pub mod strings;
pub mod time;

use super::errors::Fault;
use super::symbols::NativeFn;
use super::vm::VM;

/// Name, implementation and arity (negative = variadic) of each native
const NATIVES: &[(&str, NativeFn, i32)] = &[
    ("PRINT", io::print, -1),
    ("APPEND", io::append, -1),
    ("PRINTN", io::printn, 1),
    ("SLEEP", time::sleep, 1),
    ("TIME", time::time, 0),
    ("EXIT", process::exit, 0),
    ("LEN", strings::len, 1),
    ("STR", strings::str, 1),
];

/* ===================== Environment Injection ===================== */

/// Register the standard library as globals
pub fn inject_stdlib(vm: &mut VM) -> Result<(), Fault> {
    for (name, func, arity) in NATIVES {
        vm.register_function(name, *func, *arity)?;
    }
    Ok(())
}
