//! Compilation context
//!
//! Mutable state of one compile traversal. Nodes read the inferred type left
//! by the previous step and, before returning, describe the value their own
//! fragment produces.

use navex_types::Type;
use rustc_hash::FxHashMap;

use crate::vm::context::EvalContext;
use crate::vm::runtime::Runtime;
use crate::vm::value::Value;

/// Keys of the scratch store shared between nodes of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScratchKey {
    /// Cast a child asks its consumer to put in front of its fragment
    PreCast,
    /// Free-form hint between cooperating nodes
    Custom(&'static str),
}

/// State of one compile traversal
///
/// Owned by a single traversal; never shared between threads or passes.
pub struct CompilationContext<'a> {
    eval: &'a EvalContext<'a>,
    /// Object the current step navigates from (the last sampled value)
    pub current_object: Value,
    /// Inferred type of the value produced so far
    pub current_type: Option<Type>,
    /// Type through which the current value is accessed in source
    pub current_accessor: Option<Type>,
    /// Inferred type before the last `set_current_type`
    pub previous_type: Option<Type>,
    scratch: FxHashMap<ScratchKey, String>,
}

impl<'a> CompilationContext<'a> {
    /// Start a traversal at the root of `eval`
    pub fn new(eval: &'a EvalContext<'a>) -> Self {
        let root = eval.root();
        Self {
            eval,
            current_object: root.clone(),
            current_type: root.runtime_type(),
            current_accessor: None,
            previous_type: None,
            scratch: FxHashMap::default(),
        }
    }

    /// Evaluation context used for sample evaluations
    pub fn eval(&self) -> &'a EvalContext<'a> {
        self.eval
    }

    /// Shared runtime
    pub fn runtime(&self) -> &'a Runtime {
        self.eval.runtime()
    }

    /// Root object of the expression
    pub fn root(&self) -> &'a Value {
        self.eval.root()
    }

    /// Set the inferred type, remembering the old one as the previous type
    pub fn set_current_type(&mut self, ty: Option<Type>) {
        self.previous_type = std::mem::replace(&mut self.current_type, ty);
    }

    /// Point the traversal back at the root: current object and type from the
    /// root, accessor and previous type cleared
    pub fn reset_to_root(&mut self) {
        let root = self.root();
        self.current_object = root.clone();
        self.current_type = root.runtime_type();
        self.current_accessor = None;
        self.previous_type = None;
    }

    /// Remove and return the pending cast
    pub fn take_pre_cast(&mut self) -> Option<String> {
        self.scratch.remove(&ScratchKey::PreCast)
    }

    /// Set the pending cast
    pub fn put_pre_cast(&mut self, cast: String) {
        self.scratch.insert(ScratchKey::PreCast, cast);
    }

    /// Prepend a cast to the pending one
    pub fn add_cast(&mut self, cast: &str) {
        self.scratch
            .entry(ScratchKey::PreCast)
            .or_default()
            .insert_str(0, cast);
    }

    /// Read a scratch entry
    pub fn scratch(&self, key: ScratchKey) -> Option<&str> {
        self.scratch.get(&key).map(String::as_str)
    }

    /// Write a scratch entry, returning the old one
    pub fn put_scratch(&mut self, key: ScratchKey, value: String) -> Option<String> {
        self.scratch.insert(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::reflect::ClassRegistry;
    use crate::vm::value::Object;

    #[test]
    fn test_type_threading() {
        let runtime = Runtime::new(ClassRegistry::new());
        let eval = EvalContext::new(&runtime, Value::object(Object::new("Root")));
        let mut ctx = CompilationContext::new(&eval);
        assert_eq!(ctx.current_type, Some(Type::class("Root")));

        ctx.set_current_type(Some(Type::String));
        assert_eq!(ctx.previous_type, Some(Type::class("Root")));
        ctx.current_accessor = Some(Type::String);

        ctx.reset_to_root();
        assert_eq!(ctx.current_type, Some(Type::class("Root")));
        assert!(ctx.current_accessor.is_none());
        assert!(ctx.previous_type.is_none());
    }

    #[test]
    fn test_casts_prepend() {
        let runtime = Runtime::new(ClassRegistry::new());
        let eval = EvalContext::new(&runtime, Value::Null);
        let mut ctx = CompilationContext::new(&eval);
        assert!(ctx.current_type.is_none());

        ctx.add_cast("(B)");
        ctx.add_cast("(A)");
        assert_eq!(ctx.scratch(ScratchKey::PreCast), Some("(A)(B)"));
        assert_eq!(ctx.take_pre_cast().as_deref(), Some("(A)(B)"));
        assert!(ctx.take_pre_cast().is_none());
    }
}
