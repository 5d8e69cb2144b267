//! Target-source syntax helpers

use std::fmt::Write as _;

use crate::ast::{Node, NodeKind};
use crate::vm::value::Value;

/// Absence literal
pub const NULL_LITERAL: &str = "null";

/// Statement terminator
pub const TERMINATOR: char = ';';

/// Generated-function parameter holding the expression root
pub const ROOT_PARAM: &str = "root";

/// Generated-function parameter holding the object the expression is applied to
pub const TARGET_PARAM: &str = "target";

/// Generated-setter parameter holding the assigned value
pub const VALUE_PARAM: &str = "value";

/// Source literal for a constant; `None` for values that have no literal form
pub fn literal(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => NULL_LITERAL.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Char(c) => format!("'{}'", escape(&c.to_string(), '\'')),
        Value::Byte(v) => format!("(byte){}", v),
        Value::Short(v) => format!("(short){}", v),
        Value::Int(v) => v.to_string(),
        Value::Long(v) => format!("{}L", v),
        Value::Float(v) if v.is_finite() => format!("{:?}f", v),
        Value::Double(v) if v.is_finite() => format!("{:?}", v),
        Value::Float(v) => non_finite("Float", *v as f64),
        Value::Double(v) => non_finite("Double", *v),
        Value::Str(s) => format!("\"{}\"", escape(s, '"')),
        Value::Array(_) | Value::Object(_) => return None,
    };
    Some(text)
}

fn non_finite(class: &str, v: f64) -> String {
    let name = if v.is_nan() {
        "NaN"
    } else if v > 0.0 {
        "POSITIVE_INFINITY"
    } else {
        "NEGATIVE_INFINITY"
    };
    format!("{}.{}", class, name)
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether a node's fragment may carry a pending cast and a root prefix
///
/// False for constants, and for chains that start from a constant or a
/// static call.
pub fn should_cast(node: Node<'_>) -> bool {
    match node.kind() {
        NodeKind::Const(_) => false,
        NodeKind::Chain => !node
            .child(0)
            .is_some_and(|first| matches!(first.kind(), NodeKind::Const(_) | NodeKind::StaticMethod { .. })),
        _ => true,
    }
}

/// Expression a child fragment is anchored on when it navigates from the root
///
/// Empty for nodes that do not start from an object, and when there is no root.
pub fn root_expression(node: Node<'_>, root: &Value) -> String {
    if !should_cast(node) || matches!(node.kind(), NodeKind::StaticMethod { .. } | NodeKind::Test) {
        return String::new();
    }
    match root.runtime_type() {
        Some(ty) => format!("(({}){})", ty, ROOT_PARAM),
        None => String::new(),
    }
}

/// Whether brackets are balanced and never close below zero, ignoring
/// string and char literals
pub fn balanced(s: &str) -> bool {
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in s.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(literal(&Value::Int(1)).unwrap(), "1");
        assert_eq!(literal(&Value::Long(5)).unwrap(), "5L");
        assert_eq!(literal(&Value::Double(2.5)).unwrap(), "2.5");
        assert_eq!(literal(&Value::Double(1.0)).unwrap(), "1.0");
        assert_eq!(literal(&Value::Float(2.5)).unwrap(), "2.5f");
        assert_eq!(literal(&Value::Char('c')).unwrap(), "'c'");
        assert_eq!(literal(&Value::Char('\'')).unwrap(), "'\\''");
        assert_eq!(literal(&Value::str("a\"b\n")).unwrap(), "\"a\\\"b\\n\"");
        assert_eq!(literal(&Value::Null).unwrap(), "null");
        assert_eq!(literal(&Value::Double(f64::NAN)).unwrap(), "Double.NaN");
        assert!(literal(&Value::array([])).is_none());
    }

    #[test]
    fn test_balanced() {
        assert!(balanced("a.b(c(1), d[2])"));
        assert!(balanced("x(\")(\")"));
        assert!(balanced("f(')')"));
        assert!(!balanced("a)("));
        assert!(!balanced("f(1"));
        assert!(!balanced("\"open"));
    }
}
