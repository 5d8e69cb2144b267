//! Expression AST
//!
//! Nodes live in an [`ExprTree`] arena and refer to each other by [`NodeId`].
//! A node owns its ordered children; each child records its parent. The tree
//! is immutable once built: evaluation and compilation only read it, and
//! compile results are returned rather than stored on nodes.

mod arguments;
mod chain;
mod conditional;
mod constant;
mod method;
mod printer;
mod property;
mod static_method;
pub mod visitor;

use std::fmt;

use navex_types::Type;

use crate::compiler::{CompilationContext, CompiledFragment};
use crate::error::EngineResult;
use crate::vm::context::EvalContext;
use crate::vm::value::Value;

pub use method::MethodCall;
pub use visitor::NodeVisitor;

/// Index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node variants
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Literal value
    Const(Value),
    /// Field or get-accessor read
    Property(String),
    /// Instance method call; children are the arguments
    Method(MethodCall),
    /// Static method call; children are the arguments
    StaticMethod {
        /// Declaring class
        class: Type,
        /// Method name
        name: String,
    },
    /// Navigation chain; children are the steps
    Chain,
    /// Logical test `cond ? then : else`; exactly three children
    Test,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Arena holding the nodes of one or more expressions
#[derive(Debug, Clone, Default)]
pub struct ExprTree {
    nodes: Vec<NodeData>,
}

impl ExprTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in &children {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(NodeData {
            kind,
            children,
            parent: None,
        });
        id
    }

    /// Literal node
    pub fn constant(&mut self, value: impl Into<Value>) -> NodeId {
        self.push(NodeKind::Const(value.into()), Vec::new())
    }

    /// Property read node
    pub fn property(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Property(name.to_string()), Vec::new())
    }

    /// Method call node taking ownership of its argument nodes
    pub fn method(&mut self, name: &str, args: impl IntoIterator<Item = NodeId>) -> NodeId {
        let kind = NodeKind::Method(MethodCall::new(name));
        self.push(kind, args.into_iter().collect())
    }

    /// Static method call node taking ownership of its argument nodes
    pub fn static_method(&mut self, class: Type, name: &str, args: impl IntoIterator<Item = NodeId>) -> NodeId {
        let kind = NodeKind::StaticMethod {
            class,
            name: name.to_string(),
        };
        self.push(kind, args.into_iter().collect())
    }

    /// Chain node over navigation steps
    pub fn chain(&mut self, steps: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.push(NodeKind::Chain, steps.into_iter().collect())
    }

    /// Logical test node
    pub fn test(&mut self, cond: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        self.push(NodeKind::Test, vec![cond, then, otherwise])
    }

    /// Handle to a node
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.index() < self.nodes.len(), "node {:?} is not in this tree", id);
        Node { tree: self, id }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Borrowed handle to a node in a tree
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t ExprTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    /// Identifier of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Variant of this node
    pub fn kind(&self) -> &'t NodeKind {
        &self.data().kind
    }

    /// Ordered children
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| Node { tree, id })
    }

    /// Child at `index`
    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.data().children.get(index).map(|&id| Node { tree: self.tree, id })
    }

    /// Number of children
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// Parent, if this node is attached to one
    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| Node { tree: self.tree, id })
    }

    /// Whether a later step of an enclosing chain navigates from this node's result
    pub fn has_next_step(&self) -> bool {
        match self.parent() {
            Some(parent) if matches!(parent.kind(), NodeKind::Chain) => {
                parent.children().last().map(|last| last.id()) != Some(self.id)
            }
            _ => false,
        }
    }

    /// Whether this is a literal
    pub fn is_const(&self) -> bool {
        matches!(self.kind(), NodeKind::Const(_))
    }

    /// Whether this node navigates (property, method, static call or chain)
    pub fn is_sub_expression(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::Property(_) | NodeKind::Method(_) | NodeKind::StaticMethod { .. } | NodeKind::Chain
        )
    }

    /// Evaluate against `source`
    pub fn evaluate(&self, ctx: &EvalContext<'_>, source: &Value) -> EngineResult<Value> {
        match self.kind() {
            NodeKind::Const(value) => Ok(value.clone()),
            NodeKind::Property(name) => property::evaluate(name, ctx, source),
            NodeKind::Method(call) => call.evaluate(*self, ctx, source),
            NodeKind::StaticMethod { class, name } => static_method::evaluate(*self, class, name, ctx),
            NodeKind::Chain => chain::evaluate(*self, ctx, source),
            NodeKind::Test => conditional::evaluate(*self, ctx, source),
        }
    }

    /// Compile in the value-production role against `target`
    ///
    /// On success `ctx.current_type` and `ctx.current_accessor` describe the
    /// produced value. A blank fragment means the node has nothing to contribute.
    pub fn compile_read(&self, ctx: &mut CompilationContext<'_>, target: &Value) -> EngineResult<CompiledFragment> {
        let fragment = match self.kind() {
            NodeKind::Const(value) => constant::compile_read(value, ctx),
            NodeKind::Property(name) => property::compile_read(*self, name, ctx, target),
            NodeKind::Method(call) => call.compile_read(*self, ctx, target),
            NodeKind::StaticMethod { class, name } => static_method::compile(*self, class, name, ctx),
            NodeKind::Chain => chain::compile(*self, ctx, target, false),
            NodeKind::Test => conditional::compile_read(*self, ctx),
        }?;
        tracing::trace!(node = %self, code = %fragment.code, "compiled read fragment");
        Ok(fragment)
    }

    /// Compile in the value-acceptance role against `target`
    pub fn compile_write(&self, ctx: &mut CompilationContext<'_>, target: &Value) -> EngineResult<CompiledFragment> {
        let fragment = match self.kind() {
            NodeKind::Const(value) => constant::compile_write(*self, value, ctx),
            NodeKind::Property(name) => property::compile_write(name, ctx, target),
            NodeKind::Method(call) => call.compile_write(*self, ctx, target),
            NodeKind::StaticMethod { class, name } => static_method::compile(*self, class, name, ctx),
            NodeKind::Chain => chain::compile(*self, ctx, target, true),
            NodeKind::Test => conditional::compile_write(),
        }?;
        tracing::trace!(node = %self, code = %fragment.code, "compiled write fragment");
        Ok(fragment)
    }

    /// Dispatch to the visitor callback for this node's kind
    pub fn accept<V: NodeVisitor>(&self, visitor: &mut V) -> V::Output {
        match self.kind() {
            NodeKind::Const(value) => visitor.visit_const(*self, value),
            NodeKind::Property(name) => visitor.visit_property(*self, name),
            NodeKind::Method(call) => visitor.visit_method(*self, call),
            NodeKind::StaticMethod { class, name } => visitor.visit_static_method(*self, class, name),
            NodeKind::Chain => visitor.visit_chain(*self),
            NodeKind::Test => visitor.visit_test(*self),
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accept(&mut printer::Printer))
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .field("children", &self.data().children)
            .finish()
    }
}
