//! Statement graph node types
//!
//! Statements are not a tree. Each node carries two links:
//! - `next`: fall-through successor
//! - `jmp`: alternate successor (else-branch for `If`, body entry for loop
//!   headers, loop header for loop end nodes)
//!
//! Loops and conditionals always end at a shared `Nop` join node, so code
//! following them is attached exactly once.

use super::plan::Plan;
use crate::arena::{Block, StrId};

/// Handle to a statement node in the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StmtId(pub(crate) Block);

/// Parameter names of a function, stored in the name arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NameList {
    pub block: Block,
    pub len: u32,
}

impl NameList {
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StmtKind {
    /// Join point / placeholder
    #[default]
    Nop,
    /// Expression evaluated for its side effects
    Expr { plan: Plan },
    /// Bare call statement; the plan ends in a statement-call op
    Call { plan: Plan },
    If { cond: Plan },
    For { var: StrId, min: Plan, max: Plan },
    ForEnd { var: StrId },
    While { cond: Plan },
    WhileEnd,
    Assign { var: StrId, plan: Plan },
    FuncDecl {
        name: StrId,
        params: NameList,
        body: StmtId,
    },
    FuncExit,
    Return { plan: Plan },
}

impl StmtKind {
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Nop => "Nop",
            StmtKind::Expr { .. } => "Expr",
            StmtKind::Call { .. } => "Call",
            StmtKind::If { .. } => "If",
            StmtKind::For { .. } => "For",
            StmtKind::ForEnd { .. } => "ForEnd",
            StmtKind::While { .. } => "While",
            StmtKind::WhileEnd => "WhileEnd",
            StmtKind::Assign { .. } => "Assign",
            StmtKind::FuncDecl { .. } => "FuncDecl",
            StmtKind::FuncExit => "FuncExit",
            StmtKind::Return { .. } => "Return",
        }
    }
}

/// One node of the statement graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stmt {
    pub kind: StmtKind,
    /// Source line, for diagnostics
    pub line: u32,
    pub next: Option<StmtId>,
    pub jmp: Option<StmtId>,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Stmt {
            kind,
            line: line as u32,
            next: None,
            jmp: None,
        }
    }
}
