//! Virtual Machine state
//!
//! The VM holds all execution state of one script:
//! - heap: arenas for the statement graph, plans and strings
//! - symbols: the symbol table
//! - stack: the value stack shared by plans and native functions
//! - frames: expression frames; the top one is active during evaluation,
//!   the ones below are parked behind calls
//! - calls: active user function invocations
//! - pc: the statement being executed

use tracing::info;

use super::errors::{self, Fault};
use super::heap::{Heap, HeapUsage};
use super::output::Output;
use super::stdlib::inject_stdlib;
use super::symbols::{Arity, NativeFn, SymbolKind, SymbolTable};
use super::types::{ExprFrame, LoopFrame, ReturnCall, State, StmtId, Val};
use crate::compiler;
use crate::config::RuntimeConfig;

/* ===================== VM ===================== */

#[derive(Debug)]
pub struct VM {
    pub(crate) heap: Heap,
    pub(crate) symbols: SymbolTable,
    pub(crate) stack: Vec<Val>,
    pub(crate) frames: Vec<ExprFrame>,
    pub(crate) calls: Vec<ReturnCall>,
    pub(crate) loops: Vec<LoopFrame>,

    pub(crate) pc: Option<StmtId>,
    pub(crate) state: State,
    /// State to go back to when a sleep ends
    pub(crate) resume_state: State,

    pub(crate) elapsed: f64,
    pub(crate) wake_at: f64,
    pub(crate) sleep_requested: bool,

    /// Value of the last `RETURN`, consumed by the function exit node
    pub(crate) return_value: Val,
    /// Stack length below the arguments of the running native function
    pub(crate) native_base: usize,
    pub(crate) native_result: Option<Val>,

    pub(crate) limits: RuntimeConfig,
    output: Output,
    last_fault: Option<Fault>,
}

impl VM {
    /// Compile `source` with default limits and get ready to run it
    ///
    /// `print` receives each new output line, `append` text that continues the
    /// current line. A compile error is reported through `print` and returned.
    pub fn init(
        source: &str,
        print: impl FnMut(&str) + 'static,
        append: impl FnMut(&str) + 'static,
    ) -> Result<VM, Fault> {
        Self::with_config(source, &RuntimeConfig::default(), Output::new(print, append))
    }

    pub fn with_config(source: &str, config: &RuntimeConfig, output: Output) -> Result<VM, Fault> {
        let mut vm = VM {
            heap: Heap::new(config),
            symbols: SymbolTable::new(config.max_symbols),
            stack: Vec::new(),
            frames: Vec::new(),
            calls: Vec::new(),
            loops: Vec::new(),
            pc: None,
            state: State::Running,
            resume_state: State::Running,
            elapsed: 0.0,
            wake_at: 0.0,
            sleep_requested: false,
            return_value: Val::default(),
            native_base: 0,
            native_result: None,
            limits: config.clone(),
            output,
            last_fault: None,
        };

        let loaded = inject_stdlib(&mut vm).and_then(|_| compiler::compile(source, &mut vm.heap));
        match loaded {
            Ok(root) => {
                vm.pc = root;
                let usage = vm.heap.usage();
                info!(
                    statements = usage.statement_nodes.0,
                    plan_ops = usage.plan_ops.0,
                    "Script loaded"
                );
                Ok(vm)
            }
            Err(fault) => {
                vm.output.print(&fault.to_string());
                vm.teardown();
                Err(fault)
            }
        }
    }

    /* ===================== Host API ===================== */

    /// Register a native function; a negative `arity` accepts any argument count
    pub fn register_function(&mut self, name: &str, func: NativeFn, arity: i32) -> Result<(), Fault> {
        let arity = Arity::from_count(arity);
        self.define_global(name, SymbolKind::Native { func, arity })
    }

    pub fn register_variable_int(&mut self, name: &str, value: i32) -> Result<(), Fault> {
        self.define_global(name, SymbolKind::Int(value))
    }

    pub fn register_variable_string(&mut self, name: &str, value: &str) -> Result<(), Fault> {
        let value = self.heap.strings.alloc(value)?;
        self.define_global(name, SymbolKind::Str(value))
    }

    fn define_global(&mut self, name: &str, kind: SymbolKind) -> Result<(), Fault> {
        if self.symbols.depth() != 0 {
            return Err(errors::internal("globals can only be registered at top level"));
        }
        let name = self.heap.strings.intern(name)?;
        self.symbols.define(name, kind)?;
        Ok(())
    }

    /// Feed host time into the interpreter
    pub fn advance_time(&mut self, delta_seconds: f64) {
        self.elapsed += delta_seconds;
    }

    /// Seconds of host time seen so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != State::Finished
    }

    /// Fault that stopped the script, if any (`Fault::Exit` after `EXIT()`)
    pub fn last_fault(&self) -> Option<&Fault> {
        self.last_fault.as_ref()
    }

    pub fn usage(&self) -> HeapUsage {
        self.heap.usage()
    }

    /// Stop the script and release everything it allocated
    pub fn destroy(&mut self) {
        if self.state != State::Finished {
            self.teardown();
        }
    }

    /* ===================== Native calling convention ===================== */

    /// Arguments of the running native function not popped yet
    pub fn arg_count(&self) -> usize {
        self.stack.len().saturating_sub(self.native_base)
    }

    pub fn pop_value(&mut self) -> Result<Val, Fault> {
        if self.stack.len() <= self.native_base {
            return Err(Fault::runtime(errors::STACK_UNDERFLOW, "Missing function argument"));
        }
        self.pop()
    }

    pub fn pop_number(&mut self) -> Result<i32, Fault> {
        match self.pop_value()? {
            Val::Int(n) => Ok(n),
            other => Err(Fault::runtime(
                errors::TYPE_MISMATCH,
                format!("Expected a number argument, got {}", other.type_name()),
            )),
        }
    }

    pub fn pop_string(&mut self) -> Result<String, Fault> {
        match self.pop_value()? {
            Val::Str(s) => Ok(self.heap.str(s).to_string()),
            other => Err(Fault::runtime(
                errors::TYPE_MISMATCH,
                format!("Expected a string argument, got {}", other.type_name()),
            )),
        }
    }

    /// Result of the running native function
    pub fn push_int(&mut self, value: i32) {
        self.native_result = Some(Val::Int(value));
    }

    pub fn push_string(&mut self, value: &str) -> Result<(), Fault> {
        let id = self.heap.strings.alloc(value)?;
        self.native_result = Some(Val::Str(id));
        Ok(())
    }

    /// Suspend the script once the running native function returns
    pub fn sleep(&mut self, seconds: f64) {
        self.wake_at = self.elapsed + seconds.max(0.0);
        self.sleep_requested = true;
    }

    /// Start a new output line
    pub fn print(&mut self, text: &str) {
        self.output.print(text);
    }

    /// Continue the current output line
    pub fn append_print(&mut self, text: &str) {
        self.output.append(text);
    }

    /// Text form of a value
    pub fn display(&self, value: Val) -> String {
        match value {
            Val::Int(n) => n.to_string(),
            Val::Str(s) => self.heap.str(s).to_string(),
        }
    }

    /* ===================== Internals ===================== */

    pub(crate) fn push(&mut self, value: Val) -> Result<(), Fault> {
        if self.stack.len() >= self.limits.max_value_stack {
            return Err(Fault::runtime(
                errors::STACK_OVERFLOW,
                format!("Value stack limit of {} exceeded", self.limits.max_value_stack),
            ));
        }
        self.stack.push(value);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Result<Val, Fault> {
        self.stack
            .pop()
            .ok_or_else(|| Fault::runtime(errors::STACK_UNDERFLOW, "Value stack underflow"))
    }

    /// Source line of the statement being executed
    pub(crate) fn current_line(&self) -> Option<usize> {
        self.pc.map(|id| self.heap.stmt(id).line as usize)
    }

    /// Stop for good: report the fault and release everything
    pub(crate) fn fail(&mut self, fault: Fault) {
        let fault = match self.current_line() {
            Some(line) => fault.at_line(line),
            None => fault,
        };
        if !fault.is_exit() {
            tracing::warn!(error = %fault, "Script failed");
            self.output.print(&fault.to_string());
        }
        self.last_fault = Some(fault);
        self.teardown();
    }

    pub(crate) fn teardown(&mut self) {
        self.heap.reset();
        self.symbols.clear();
        self.stack.clear();
        self.frames.clear();
        self.calls.clear();
        self.loops.clear();
        self.pc = None;
        self.state = State::Finished;
        self.sleep_requested = false;
        self.native_result = None;
        info!(elapsed = self.elapsed, "Interpreter torn down");
    }
}
