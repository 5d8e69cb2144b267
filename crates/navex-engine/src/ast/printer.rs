//! Prints nodes back to expression text

use navex_types::Type;

use super::{MethodCall, Node, NodeVisitor};
use crate::compiler::syntax::literal;
use crate::vm::value::Value;

pub(super) struct Printer;

impl Printer {
    fn arguments(&mut self, node: Node<'_>) -> String {
        node.children()
            .map(|child| child.accept(self))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl NodeVisitor for Printer {
    type Output = String;

    fn visit_const(&mut self, _node: Node<'_>, value: &Value) -> String {
        literal(value).unwrap_or_else(|| format!("{:?}", value))
    }

    fn visit_property(&mut self, _node: Node<'_>, name: &str) -> String {
        name.to_string()
    }

    fn visit_method(&mut self, node: Node<'_>, call: &MethodCall) -> String {
        format!("{}({})", call.name(), self.arguments(node))
    }

    fn visit_static_method(&mut self, node: Node<'_>, class: &Type, name: &str) -> String {
        format!("@{}@{}({})", class, name, self.arguments(node))
    }

    fn visit_chain(&mut self, node: Node<'_>) -> String {
        node.children()
            .map(|step| step.accept(self))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn visit_test(&mut self, node: Node<'_>) -> String {
        let parts: Vec<String> = node.children().map(|child| child.accept(self)).collect();
        match parts.as_slice() {
            [cond, then, otherwise] => format!("({} ? {} : {})", cond, then, otherwise),
            _ => format!("(? {})", parts.join(", ")),
        }
    }
}
