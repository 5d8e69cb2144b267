//! Argument coercion
//!
//! Decides when an argument fragment needs an explicit conversion to the
//! declared parameter type, and emits it.

use navex_types::Type;

use super::syntax::balanced;

/// Compile role of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The fragment produces a value
    Read,
    /// The fragment accepts an assigned value
    Write,
}

impl Role {
    /// Trailing text of an `Ops.convertValue` / `Ops.toArray` call in this role
    pub fn end_marker(self) -> &'static str {
        match self {
            Role::Read => ".class, true)",
            Role::Write => ".class)",
        }
    }
}

/// Text placed before and after a fragment converted to `to`
fn conversion(to: &Type, role: Role) -> (String, String) {
    match to {
        Type::Primitive(p) => (
            format!("(({})Ops.convertValue(", p.boxed_name()),
            format!(", {}.class, true)).{}", p.boxed_name(), p.value_getter()),
        ),
        Type::Array(element) => (
            format!("({})Ops.toArray(", to),
            format!(", {}{}", element, role.end_marker()),
        ),
        Type::Object => ("Ops.box(".to_string(), ")".to_string()),
        other => (
            format!("({})Ops.convertValue(", other),
            format!(", {}{}", other, role.end_marker()),
        ),
    }
}

/// Convert `fragment` (of inferred type `from`, `None` when unknown) to `to`
///
/// The fragment is returned unchanged when the types agree modulo boxing,
/// when a reference value is passed as `Object`, or when the fragment is
/// already this exact conversion.
pub fn coerce(fragment: &str, from: Option<&Type>, to: &Type, role: Role) -> String {
    if from.is_some_and(|from| from.same_modulo_boxing(to)) {
        return fragment.to_string();
    }
    if *to == Type::Object && !from.is_some_and(|from| from.primitive().is_some()) {
        return fragment.to_string();
    }
    if is_coerced(fragment, to, role) {
        return fragment.to_string();
    }
    let (open, close) = conversion(to, role);
    format!("{}{}{}", open, fragment, close)
}

/// Whether `fragment` is exactly the conversion of some expression to `to` in `role`
pub fn is_coerced(fragment: &str, to: &Type, role: Role) -> bool {
    let (open, close) = conversion(to, role);
    fragment
        .strip_prefix(open.as_str())
        .and_then(|rest| rest.strip_suffix(close.as_str()))
        .is_some_and(|inner| !inner.is_empty() && balanced(inner))
}
