//! Arena-backed storage for a loaded program
//!
//! The heap owns every arena of one interpreter: string bytes, statement
//! nodes, plan micro-ops and parameter name lists. Teardown resets all of them
//! at once.

use serde::Serialize;

use super::types::{NameList, Plan, PlanOp, Stmt, StmtId};
use crate::arena::{Arena, ArenaResult, StrId, StringStore};
use crate::config::RuntimeConfig;

#[derive(Debug, Clone)]
pub struct Heap {
    pub strings: StringStore,
    pub nodes: Arena<Stmt>,
    pub ops: Arena<PlanOp>,
    pub names: Arena<StrId>,
}

/// Used/capacity pair for each arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeapUsage {
    pub string_bytes: (usize, usize),
    pub statement_nodes: (usize, usize),
    pub plan_ops: (usize, usize),
    pub name_slots: (usize, usize),
}

impl Heap {
    pub fn new(config: &RuntimeConfig) -> Self {
        Heap {
            strings: StringStore::with_capacity(config.string_bytes),
            nodes: Arena::with_capacity(config.statement_nodes),
            ops: Arena::with_capacity(config.plan_ops),
            names: Arena::with_capacity(config.name_slots),
        }
    }

    /* ===================== Statement nodes ===================== */

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> ArenaResult<StmtId> {
        let block = self.nodes.allocate(1)?;
        self.nodes.get_mut(block)[0] = stmt;
        Ok(StmtId(block))
    }

    pub fn stmt(&self, id: StmtId) -> Stmt {
        self.nodes.get(id.0)[0]
    }

    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.nodes.get_mut(id.0)[0]
    }

    /* ===================== Plans ===================== */

    /// Micro-op at `index`; past the end of the plan reads as `Nop`
    pub fn plan_op(&self, plan: Plan, index: usize) -> PlanOp {
        self.plan_ops(plan).get(index).copied().unwrap_or_default()
    }

    pub fn plan_ops(&self, plan: Plan) -> &[PlanOp] {
        &self.ops.get(plan.block)[..plan.len()]
    }

    /* ===================== Names ===================== */

    pub fn alloc_names(&mut self, names: &[StrId]) -> ArenaResult<NameList> {
        let block = self.names.allocate(names.len())?;
        self.names.get_mut(block)[..names.len()].copy_from_slice(names);
        Ok(NameList {
            block,
            len: names.len() as u32,
        })
    }

    pub fn name(&self, list: NameList, index: usize) -> StrId {
        self.names.get(list.block)[index]
    }

    pub fn str(&self, id: StrId) -> &str {
        self.strings.get(id)
    }

    /* ===================== Lifecycle ===================== */

    pub fn usage(&self) -> HeapUsage {
        HeapUsage {
            string_bytes: (self.strings.used(), self.strings.capacity()),
            statement_nodes: (self.nodes.used(), self.nodes.capacity()),
            plan_ops: (self.ops.used(), self.ops.capacity()),
            name_slots: (self.names.used(), self.names.capacity()),
        }
    }

    pub fn reset(&mut self) {
        self.strings.reset();
        self.nodes.reset();
        self.ops.reset();
        self.names.reset();
    }
}
