//! Shared runtime state
//!
//! A [`Runtime`] bundles the collaborators every evaluation and compilation
//! needs. It is immutable once built and safe to share between threads; the
//! argument pool is the only internally mutable part.

use std::sync::Arc;

use navex_types::Type;

use crate::config::EngineConfig;
use crate::vm::context::EvalContext;
use crate::vm::invoker::{Invoker, ReflectiveInvoker};
use crate::vm::null_handler::{NullPolicy, NullPolicyRegistry};
use crate::vm::pool::ArgumentPool;
use crate::vm::reflect::ClassRegistry;
use crate::vm::resolver::{MethodResolver, RegistryResolver};
use crate::vm::value::Value;

/// Collaborators shared by all evaluations
pub struct Runtime {
    /// Registered types
    registry: Arc<ClassRegistry>,
    /// Operation lookup
    resolver: Arc<dyn MethodResolver>,
    /// Operation execution
    invoker: Arc<dyn Invoker>,
    /// Substitutes for null call results
    null_policies: NullPolicyRegistry,
    /// Reusable argument arrays
    pool: ArgumentPool,
    /// Engine settings
    config: EngineConfig,
}

impl Runtime {
    /// Create a runtime with default configuration
    pub fn new(registry: ClassRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Create a runtime with explicit configuration
    pub fn with_config(registry: ClassRegistry, config: EngineConfig) -> Self {
        let registry = Arc::new(registry);
        Self {
            resolver: Arc::new(RegistryResolver::new(registry.clone())),
            invoker: Arc::new(ReflectiveInvoker),
            null_policies: NullPolicyRegistry::new(),
            pool: ArgumentPool::new(config.pool.max_retained_per_length),
            registry,
            config,
        }
    }

    /// Replace the method resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn MethodResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the invoker
    pub fn with_invoker(mut self, invoker: Arc<dyn Invoker>) -> Self {
        self.invoker = invoker;
        self
    }

    /// Register a null policy for a receiver type
    pub fn with_null_policy<F>(mut self, ty: Type, policy: F) -> Self
    where
        F: Fn(&EvalContext<'_>, &Value, &str, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.null_policies.register(ty, Arc::new(policy));
        self
    }

    /// Register a null policy object for a receiver type
    pub fn register_null_policy(&mut self, ty: Type, policy: Arc<dyn NullPolicy>) {
        self.null_policies.register(ty, policy);
    }

    /// Registered types
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Operation lookup
    pub fn resolver(&self) -> &dyn MethodResolver {
        self.resolver.as_ref()
    }

    /// Operation execution
    pub fn invoker(&self) -> &dyn Invoker {
        self.invoker.as_ref()
    }

    /// Null policy for a receiver type
    pub fn null_policy(&self, ty: &Type) -> &dyn NullPolicy {
        self.null_policies.policy_for(ty, self.registry.as_ref())
    }

    /// Argument arrays
    pub fn pool(&self) -> &ArgumentPool {
        &self.pool
    }

    /// Engine settings
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
