//! Expression driver
//!
//! Ties a built AST to the two execution strategies: interpreted evaluation,
//! and source generation handed to a [`DynamicCompiler`].

use std::fmt;
use std::sync::Arc;

use crate::ast::{ExprTree, Node, NodeId};
use crate::compiler::syntax::TARGET_PARAM;
use crate::compiler::{CompilationContext, CompiledAccessor, DynamicCompiler, SourceUnit};
use crate::error::{EngineError, EngineResult};
use crate::vm::context::EvalContext;
use crate::vm::runtime::Runtime;
use crate::vm::value::Value;

/// An expression: a tree and the node it starts from
#[derive(Debug, Clone)]
pub struct Expression {
    tree: ExprTree,
    root: NodeId,
}

/// How a prepared expression is executed
#[derive(Clone)]
pub enum ExecutionStrategy {
    /// Through a backend-compiled accessor
    Compiled(Arc<dyn CompiledAccessor>),
    /// Through the interpreter
    Interpreted,
}

impl ExecutionStrategy {
    /// Whether compilation succeeded
    pub fn is_compiled(&self) -> bool {
        matches!(self, ExecutionStrategy::Compiled(_))
    }

    /// Evaluate `expression` against `root` with this strategy
    pub fn get(&self, expression: &Expression, runtime: &Runtime, root: &Value) -> EngineResult<Value> {
        match self {
            ExecutionStrategy::Compiled(accessor) => {
                let ctx = EvalContext::new(runtime, root.clone());
                accessor.get(&ctx, root)
            }
            ExecutionStrategy::Interpreted => expression.evaluate(runtime, root),
        }
    }
}

impl fmt::Debug for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Compiled(_) => f.write_str("Compiled"),
            ExecutionStrategy::Interpreted => f.write_str("Interpreted"),
        }
    }
}

impl Expression {
    /// Wrap a tree, starting evaluation at `root`
    pub fn new(tree: ExprTree, root: NodeId) -> Self {
        Self { tree, root }
    }

    /// The underlying tree
    pub fn tree(&self) -> &ExprTree {
        &self.tree
    }

    /// The starting node
    pub fn root_node(&self) -> Node<'_> {
        self.tree.node(self.root)
    }

    /// Interpret against `root`
    pub fn evaluate(&self, runtime: &Runtime, root: &Value) -> EngineResult<Value> {
        let ctx = EvalContext::new(runtime, root.clone());
        self.root_node().evaluate(&ctx, root)
    }

    /// Generate source for the getter and, when the expression is
    /// assignable, the setter
    pub fn compile(&self, runtime: &Runtime, root: &Value) -> EngineResult<SourceUnit> {
        let eval = EvalContext::new(runtime, root.clone());
        let node = self.root_node();
        let root_type = root.runtime_type();
        let target = match &root_type {
            Some(ty) => format!("(({}){})", ty, TARGET_PARAM),
            None => TARGET_PARAM.to_string(),
        };

        let mut ctx = CompilationContext::new(&eval);
        let getter = node.compile_read(&mut ctx, root)?;
        if getter.is_blank() {
            return Err(EngineError::unsupported(format!(
                "expression {} has no compiled form",
                node
            )));
        }
        let getter_body = if getter.is_statement() {
            format!("{}\nreturn {};", getter.render_statement(&target), getter.value_source())
        } else {
            format!("return {};", getter.render(&target))
        };

        let mut ctx = CompilationContext::new(&eval);
        let setter = match node.compile_write(&mut ctx, root) {
            Ok(fragment) if !fragment.is_blank() => Some(fragment.render_statement(&target)),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(expression = %node, %err, "expression has no setter");
                None
            }
        };

        Ok(SourceUnit {
            root_type,
            result_type: getter.static_type,
            getter: getter_body,
            setter,
        })
    }

    /// Compile through `backend`, falling back to interpretation on failure
    pub fn prepare(&self, runtime: &Runtime, backend: &dyn DynamicCompiler, root: &Value) -> ExecutionStrategy {
        match self.compile(runtime, root).and_then(|unit| backend.compile(&unit)) {
            Ok(accessor) => ExecutionStrategy::Compiled(accessor),
            Err(err) => {
                tracing::warn!(expression = %self, %err, "compilation failed, falling back to interpretation");
                ExecutionStrategy::Interpreted
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root_node())
    }
}
