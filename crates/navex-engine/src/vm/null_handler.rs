//! Null policies
//!
//! When an interpreted call returns null, the policy registered for the
//! receiver's runtime type (or its nearest registered ancestor) decides what
//! the call evaluates to.

use std::collections::VecDeque;
use std::sync::Arc;

use navex_types::{Type, TypeHierarchy};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::vm::context::EvalContext;
use crate::vm::value::Value;

/// Substitutes a value for a null call result
pub trait NullPolicy: Send + Sync {
    /// Value to use instead of null for `receiver.name(args)`
    fn on_absence(&self, ctx: &EvalContext<'_>, receiver: &Value, name: &str, args: &[Value]) -> Value;
}

impl<F> NullPolicy for F
where
    F: Fn(&EvalContext<'_>, &Value, &str, &[Value]) -> Value + Send + Sync,
{
    fn on_absence(&self, ctx: &EvalContext<'_>, receiver: &Value, name: &str, args: &[Value]) -> Value {
        self(ctx, receiver, name, args)
    }
}

/// Keeps null results as they are
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughNull;

impl NullPolicy for PassThroughNull {
    fn on_absence(&self, _ctx: &EvalContext<'_>, _receiver: &Value, _name: &str, _args: &[Value]) -> Value {
        Value::Null
    }
}

/// Null policies keyed by receiver type
pub struct NullPolicyRegistry {
    policies: FxHashMap<Type, Arc<dyn NullPolicy>>,
    fallback: Arc<dyn NullPolicy>,
}

impl NullPolicyRegistry {
    /// Create a registry where every type passes null through
    pub fn new() -> Self {
        Self {
            policies: FxHashMap::default(),
            fallback: Arc::new(PassThroughNull),
        }
    }

    /// Register the policy for a type and its unregistered subtypes
    pub fn register(&mut self, ty: Type, policy: Arc<dyn NullPolicy>) {
        self.policies.insert(ty, policy);
    }

    /// Replace the policy used when no type in the lineage has one
    pub fn set_fallback(&mut self, policy: Arc<dyn NullPolicy>) {
        self.fallback = policy;
    }

    /// Policy for a receiver type: its own, else the nearest ancestor's, else `Object`'s
    pub fn policy_for(&self, ty: &Type, hierarchy: &dyn TypeHierarchy) -> &dyn NullPolicy {
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(next) = queue.pop_front() {
            if let Some(policy) = self.policies.get(&next) {
                return policy.as_ref();
            }
            if seen.insert(next.clone()) {
                queue.extend(hierarchy.direct_supertypes(&next));
            }
        }
        self.policies
            .get(&Type::Object)
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

impl Default for NullPolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
