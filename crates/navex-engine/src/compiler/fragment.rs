//! Compiled fragments

use navex_types::{PrimitiveType, Type};

use super::syntax::{NULL_LITERAL, TERMINATOR};

/// Value expression of a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExpr {
    /// The call fragment itself produces the value
    Fragment,
    /// No value; the absence literal stands in
    Absent,
}

/// What a fragment's code is attached to when rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A suffix applied to a target expression (`.compute(1)`)
    Target,
    /// Self-contained (`5L`, `Math.max(1, 2)`)
    Standalone,
}

/// Text placed around the anchored code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    /// Text before the anchored code
    pub open: String,
    /// Text after it
    pub close: String,
}

impl Wrapper {
    /// Boxed constructor of a primitive: `new Integer(` ... `)`
    pub fn boxed(p: PrimitiveType) -> Self {
        Self {
            open: format!("new {}(", p.boxed_name()),
            close: ")".to_string(),
        }
    }

    /// Put `outer` around this wrapper
    pub fn enclose(&mut self, outer: &Wrapper) {
        self.open.insert_str(0, &outer.open);
        self.close.push_str(&outer.close);
    }
}

/// Result of compiling one node in one role
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFragment {
    /// Role-specific call fragment
    pub code: String,
    /// Value expression: the fragment itself, or the absence literal
    pub value: ValueExpr,
    /// Present only when the compiled operation has no result
    pub statement: Option<String>,
    /// Static type of the produced value, when known
    pub static_type: Option<Type>,
    /// Text placed around the rendered code (boxing, narrowing casts)
    pub wrapper: Option<Wrapper>,
    /// What the code is attached to
    pub anchor: Anchor,
}

impl CompiledFragment {
    /// Nothing to contribute
    pub fn empty() -> Self {
        Self {
            code: String::new(),
            value: ValueExpr::Fragment,
            statement: None,
            static_type: None,
            wrapper: None,
            anchor: Anchor::Target,
        }
    }

    /// A value-producing suffix of the given static type
    pub fn expression(code: String, static_type: Option<Type>) -> Self {
        Self {
            code,
            static_type,
            ..Self::empty()
        }
    }

    /// A self-contained value-producing fragment
    pub fn standalone(code: String, static_type: Option<Type>) -> Self {
        Self {
            anchor: Anchor::Standalone,
            ..Self::expression(code, static_type)
        }
    }

    /// Whether the fragment contributes nothing
    pub fn is_blank(&self) -> bool {
        self.code.trim().is_empty()
    }

    /// Whether the fragment is a statement without a value
    pub fn is_statement(&self) -> bool {
        self.statement.is_some()
    }

    /// Turn a call with no result into a statement: `<call>;` with an absent value
    pub fn into_statement(mut self) -> Self {
        self.statement = Some(terminate(&self.code));
        self.value = ValueExpr::Absent;
        self.wrapper = None;
        self
    }

    /// Terminate the call fragment itself; the statement equals it and the
    /// value is absent
    pub fn terminated(mut self) -> Self {
        self.code = terminate(&self.code);
        self.statement = Some(self.code.clone());
        self.value = ValueExpr::Absent;
        self.wrapper = None;
        self
    }

    /// Source of the value expression: the code, or the absence literal
    pub fn value_source(&self) -> &str {
        match self.value {
            ValueExpr::Fragment => &self.code,
            ValueExpr::Absent => NULL_LITERAL,
        }
    }

    /// Render the code attached to `target`, with its wrapper applied
    pub fn render(&self, target: &str) -> String {
        let anchor = match self.anchor {
            Anchor::Target => target,
            Anchor::Standalone => "",
        };
        match &self.wrapper {
            Some(w) => format!("{}{}{}{}", w.open, anchor, self.code, w.close),
            None => format!("{}{}", anchor, self.code),
        }
    }

    /// Render as a complete statement
    pub fn render_statement(&self, target: &str) -> String {
        terminate(&self.render(target))
    }

    /// Append the fragment of the next navigation step
    ///
    /// A standalone step does not depend on what precedes it and replaces
    /// the accumulated code.
    pub fn append(&mut self, next: CompiledFragment) {
        if next.anchor == Anchor::Standalone || (self.is_blank() && self.wrapper.is_none()) {
            let anchor = if next.anchor == Anchor::Standalone {
                Anchor::Standalone
            } else {
                self.anchor
            };
            *self = CompiledFragment { anchor, ..next };
            return;
        }
        self.code.push_str(&next.code);
        self.value = next.value;
        self.statement = next.statement.map(|_| terminate(&self.code));
        self.static_type = next.static_type;
        if let Some(outer) = next.wrapper {
            match &mut self.wrapper {
                Some(w) => w.enclose(&outer),
                None => self.wrapper = Some(outer),
            }
        }
    }

    /// Apply a narrowing cast to everything accumulated so far
    pub fn apply_cast(&mut self, cast: &str) {
        let mut wrapper = self.wrapper.take().unwrap_or(Wrapper {
            open: String::new(),
            close: String::new(),
        });
        self.code.push_str(&wrapper.close);
        self.code.push(')');
        wrapper.close.clear();
        wrapper.open.insert_str(0, &format!("({}", cast));
        self.wrapper = Some(wrapper);
    }
}

fn terminate(code: &str) -> String {
    if code.ends_with(TERMINATOR) {
        code.to_string()
    } else {
        format!("{}{}", code, TERMINATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_forms() {
        let call = CompiledFragment::expression(".compute(1, 2)".into(), Some(Type::Void)).into_statement();
        assert_eq!(call.code, ".compute(1, 2)");
        assert_eq!(call.statement.as_deref(), Some(".compute(1, 2);"));
        assert_eq!(call.value_source(), "null");

        let setter = CompiledFragment::expression(".setX(5)".into(), None).terminated();
        assert_eq!(setter.code, ".setX(5);");
        assert_eq!(setter.statement.as_deref(), Some(".setX(5);"));
        assert_eq!(setter.value_source(), "null");
    }

    #[test]
    fn test_render_with_wrapper() {
        let mut f = CompiledFragment::expression(".setX(5)".into(), None);
        f.wrapper = Some(Wrapper::boxed(PrimitiveType::Int));
        assert_eq!(f.render("t"), "new Integer(t.setX(5))");
        assert_eq!(CompiledFragment::standalone("5L".into(), None).render("t"), "5L");
    }

    #[test]
    fn test_append_and_cast() {
        let mut acc = CompiledFragment::empty();
        acc.append(CompiledFragment::expression(".getShape()".into(), Some(Type::Object)));
        acc.apply_cast("(Square)");
        acc.append(CompiledFragment::expression(".side()".into(), None));
        assert_eq!(acc.render("t"), "((Square)t.getShape()).side()");

        let mut last = CompiledFragment::expression(".setSide(2)".into(), None);
        last.wrapper = Some(Wrapper::boxed(PrimitiveType::Int));
        acc.append(last);
        assert_eq!(acc.render("t"), "new Integer(((Square)t.getShape()).side().setSide(2))");
    }

    #[test]
    fn test_standalone_replaces() {
        let mut acc = CompiledFragment::empty();
        acc.append(CompiledFragment::expression(".a()".into(), None));
        acc.append(CompiledFragment::standalone("Math.max(1, 2)".into(), None));
        assert_eq!(acc.render("t"), "Math.max(1, 2)");
        acc.append(CompiledFragment::expression(".b()".into(), None));
        assert_eq!(acc.render("t"), "Math.max(1, 2).b()");
    }
}
