//! Per-evaluation context

use crate::vm::runtime::Runtime;
use crate::vm::value::Value;

/// State of one evaluation: the runtime and the root object
///
/// Cheap to create; one per call of [`Expression::evaluate`](crate::Expression::evaluate).
pub struct EvalContext<'a> {
    runtime: &'a Runtime,
    root: Value,
}

impl<'a> EvalContext<'a> {
    /// Create a context evaluating against `root`
    pub fn new(runtime: &'a Runtime, root: Value) -> Self {
        Self { runtime, root }
    }

    /// Shared runtime
    pub fn runtime(&self) -> &'a Runtime {
        self.runtime
    }

    /// Root object of the expression
    pub fn root(&self) -> &Value {
        &self.root
    }
}
