//! Value-kind dispatch
//!
//! A [`DispatchTable`] maps every [`KindTag`] to the [`EmissionStrategy`] that
//! produces read and write code for it. The table is built once, never
//! mutated during a run, and passed by reference to everything that emits
//! code. Composite strategies recurse into their element kinds through
//! [`Emission`], which resolves against the same table.

use crate::context::EmitContext;
use crate::fragment::CodeFragment;
use protogen_core::{GenerateError, GenerateResult, KindTag, ValueKind};
use std::collections::HashMap;

/// Code that reads a value: statements to run first, then an expression
/// evaluating to the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFragment {
    pub statements: CodeFragment,
    pub expr: String,
}

/// An empty container declared ahead of a read loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub statements: CodeFragment,
}

/// Emission of read/write code for one value kind.
pub trait EmissionStrategy: Send + Sync {
    /// Code writing the value of `source` to `buffer`.
    fn emit_write(
        &self,
        emission: &mut Emission<'_>,
        source: &str,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<CodeFragment>;

    /// Code reading a value from `buffer`.
    fn emit_read(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<ReadFragment>;

    /// Container initialization preceding a read loop, for composite kinds.
    fn emit_declare(
        &self,
        _emission: &mut Emission<'_>,
        _depth: usize,
        _kind: &ValueKind,
    ) -> Option<Declaration> {
        None
    }
}

/// Immutable table of emission strategies keyed by kind.
#[derive(Default)]
pub struct DispatchTable {
    strategies: HashMap<KindTag, Box<dyn EmissionStrategy>>,
}

impl DispatchTable {
    /// Table with no strategies registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table covering every kind for the JavaScript target.
    pub fn javascript() -> Self {
        crate::javascript::dispatch_table()
    }

    /// Register (or replace) the strategy for a kind.
    pub fn with_strategy(mut self, tag: KindTag, strategy: impl EmissionStrategy + 'static) -> Self {
        self.strategies.insert(tag, Box::new(strategy));
        self
    }

    /// Drop the strategy for a kind.
    pub fn without(mut self, tag: KindTag) -> Self {
        self.strategies.remove(&tag);
        self
    }

    pub fn contains(&self, tag: KindTag) -> bool {
        self.strategies.contains_key(&tag)
    }

    /// Strategy for `kind`, or [`GenerateError::UnsupportedKind`].
    pub fn resolve(&self, kind: &ValueKind) -> GenerateResult<&dyn EmissionStrategy> {
        let tag = kind.tag();
        self.strategies
            .get(&tag)
            .map(|strategy| strategy.as_ref())
            .ok_or(GenerateError::UnsupportedKind(tag))
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<KindTag> = self.strategies.keys().copied().collect();
        tags.sort();
        f.debug_struct("DispatchTable").field("kinds", &tags).finish()
    }
}

/// Recursion handle given to strategies: the dispatch table plus the
/// per-message context.
pub struct Emission<'a> {
    dispatch: &'a DispatchTable,
    context: &'a mut EmitContext,
}

impl<'a> Emission<'a> {
    pub fn new(dispatch: &'a DispatchTable, context: &'a mut EmitContext) -> Self {
        Self { dispatch, context }
    }

    /// Write code for `kind`, dispatched through the table.
    pub fn write(&mut self, kind: &ValueKind, source: &str, depth: usize) -> GenerateResult<CodeFragment> {
        let dispatch = self.dispatch;
        dispatch.resolve(kind)?.emit_write(self, source, depth, kind)
    }

    /// Read code for `kind`, dispatched through the table.
    pub fn read(&mut self, kind: &ValueKind, depth: usize) -> GenerateResult<ReadFragment> {
        let dispatch = self.dispatch;
        dispatch.resolve(kind)?.emit_read(self, depth, kind)
    }

    /// Fresh temporary name, unique within the current message.
    pub fn fresh(&mut self, prefix: &str) -> String {
        self.context.fresh(prefix)
    }
}
