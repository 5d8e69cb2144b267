//! Node visitor

use navex_types::Type;

use super::{MethodCall, Node};
use crate::vm::value::Value;

/// Per-kind callbacks, dispatched by [`Node::accept`]
///
/// Visitors recurse into children themselves.
pub trait NodeVisitor {
    /// Result of visiting a node
    type Output;

    /// Literal
    fn visit_const(&mut self, node: Node<'_>, value: &Value) -> Self::Output;

    /// Property read
    fn visit_property(&mut self, node: Node<'_>, name: &str) -> Self::Output;

    /// Instance method call
    fn visit_method(&mut self, node: Node<'_>, call: &MethodCall) -> Self::Output;

    /// Static method call
    fn visit_static_method(&mut self, node: Node<'_>, class: &Type, name: &str) -> Self::Output;

    /// Navigation chain
    fn visit_chain(&mut self, node: Node<'_>) -> Self::Output;

    /// Logical test
    fn visit_test(&mut self, node: Node<'_>) -> Self::Output;
}
