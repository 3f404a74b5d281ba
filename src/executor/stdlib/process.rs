//! Process control natives

use crate::executor::errors::Fault;
use crate::executor::vm::VM;

/// EXIT() - stop the script without reporting an error
pub fn exit(_vm: &mut VM) -> Result<(), Fault> {
    Err(Fault::Exit)
}
